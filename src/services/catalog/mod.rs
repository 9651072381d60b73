//! Catalog page access
//!
//! The recommendation pipeline only ever needs two capabilities from the
//! catalog site: fetching a page by URL and pulling named fields out of it.
//! [`PageSource`] covers the first so tests and alternative transports can be
//! plugged in; [`Selectors`] and the [`extract`] functions cover the second.

use crate::error::AppResult;

pub mod extract;
pub mod http;
pub mod selectors;

pub use http::HttpPageSource;
pub use selectors::{SelectorDefinitions, Selectors};

/// Trait for anything that can hand back the HTML of a catalog page
///
/// Implementations own transport concerns: timeouts, retries and translating
/// failures into [`AppError::PageUnavailable`](crate::error::AppError).
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the raw HTML of the page at `url`
    async fn fetch_page(&self, url: &str) -> AppResult<String>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Joins a possibly relative `href` onto the catalog root
pub fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base_url, href)
    } else {
        format!("{}/{}", base_url, href)
    }
}
