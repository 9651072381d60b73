//! Catalog page source over plain HTTP
//!
//! Fetches pages with a shared `reqwest` client. Transient failures (HTTP 429,
//! 5xx, timeouts and connection errors) are retried with exponential backoff;
//! anything else, or running out of attempts, becomes `PageUnavailable`.

use crate::{
    config::Config,
    error::{AppError, AppResult},
    services::catalog::PageSource,
};
use reqwest::{Client as HttpClient, StatusCode};
use std::time::Duration;

#[derive(Clone)]
pub struct HttpPageSource {
    http_client: HttpClient,
    max_attempts: u32,
    retry_base: Duration,
}

impl HttpPageSource {
    /// Creates a page source with its own connection pool
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        max_attempts: u32,
        retry_base: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            max_attempts: max_attempts.max(1),
            retry_base,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            &config.user_agent,
            Duration::from_secs(config.fetch_timeout_secs),
            config.fetch_max_attempts,
            Duration::from_millis(config.fetch_retry_base_ms),
        )
    }

    fn is_transient_status(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    fn is_transient_error(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect()
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_base * 2u32.saturating_pow(attempt)
    }
}

#[async_trait::async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, url: &str) -> AppResult<String> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let retries_left = attempt < self.max_attempts;

            match self.http_client.get(url).send().await {
                Ok(response) if response.status().is_success() => {
                    let body = response
                        .text()
                        .await
                        .map_err(|e| AppError::page_unavailable(url, e))?;

                    tracing::debug!(url = %url, bytes = body.len(), attempt, "Fetched page");

                    return Ok(body);
                }
                Ok(response) => {
                    let status = response.status();
                    if retries_left && Self::is_transient_status(status) {
                        let backoff = self.backoff(attempt - 1);
                        tracing::warn!(
                            url = %url,
                            status = %status,
                            attempt,
                            backoff_ms = backoff.as_millis() as u64,
                            "Transient status from catalog, retrying after backoff"
                        );
                        tokio::time::sleep(backoff).await;
                        continue;
                    }

                    tracing::error!(
                        url = %url,
                        status = %status,
                        attempt,
                        "Catalog request failed"
                    );
                    return Err(AppError::page_unavailable(url, format!("status {}", status)));
                }
                Err(e) => {
                    if retries_left && Self::is_transient_error(&e) {
                        let backoff = self.backoff(attempt - 1);
                        tracing::warn!(
                            url = %url,
                            error = %e,
                            attempt,
                            backoff_ms = backoff.as_millis() as u64,
                            "Catalog request error, retrying after backoff"
                        );
                        tokio::time::sleep(backoff).await;
                        continue;
                    }

                    tracing::error!(url = %url, error = %e, attempt, "Catalog request failed");
                    return Err(AppError::page_unavailable(url, e));
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
