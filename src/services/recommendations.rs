use std::sync::Arc;
use std::time::Instant;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{RecommendedSeries, Recommendations, SignalWeights},
    services::{
        aggregator, calibration,
        catalog::{extract, PageSource, Selectors},
        ranking, scorer, signals, user_list,
    },
};

/// Generates recommendations for a reference series
///
/// Samples the users who most recently scored the series, counts what else is
/// on their completed lists, and ranks the common titles by popularity plus
/// shared staff, genres and site recommendations.
///
/// The pipeline runs in order: sample users, build signal tables, aggregate
/// lists (concurrent), calibrate, score (concurrent), rank.
#[derive(Clone)]
pub struct Recommender {
    source: Arc<dyn PageSource>,
    selectors: Arc<Selectors>,
    weights: Arc<SignalWeights>,
    base_url: String,
    max_concurrency: usize,
}

impl Recommender {
    pub fn new(
        source: Arc<dyn PageSource>,
        selectors: Selectors,
        weights: SignalWeights,
        base_url: String,
        max_concurrency: usize,
    ) -> Self {
        tracing::info!(
            source = source.name(),
            base_url = %base_url,
            max_concurrency,
            "Recommender ready"
        );

        Self {
            source,
            selectors: Arc::new(selectors),
            weights: Arc::new(weights),
            base_url,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Builds a recommender with the configured selectors and weights
    pub fn from_config(config: &Config, source: Arc<dyn PageSource>) -> AppResult<Self> {
        Ok(Self::new(
            source,
            Selectors::compile(&config.selectors)?,
            config.signal_weights(),
            config.catalog_base_url.clone(),
            config.max_concurrent_fetches,
        ))
    }

    /// Follows any series page to the canonical series URL
    pub async fn resolve_series_url(&self, url: &str) -> AppResult<String> {
        let html = self.source.fetch_page(url).await?;
        extract::details_url(&html, &self.selectors, &self.base_url)
            .ok_or_else(|| AppError::page_unavailable(url, "series details link not found"))
    }

    /// Recommends series for the series at `series_url`
    ///
    /// Fails with `PageUnavailable` if the reference series' own pages or the
    /// user listing cannot be read. Individual user lists and candidate pages
    /// that fail are skipped. An empty result is not an error.
    pub async fn recommend(
        &self,
        series_url: &str,
        sample_size: usize,
        min_popularity: f64,
    ) -> AppResult<Recommendations> {
        let start = Instant::now();
        let source = self.source.as_ref();
        let selectors = self.selectors.as_ref();

        let series_url = self.resolve_series_url(series_url).await?;

        tracing::info!(
            series_url = %series_url,
            sample_size,
            min_popularity,
            "Starting recommendation run"
        );

        let users = user_list::last_updated_users(
            source,
            selectors,
            &self.base_url,
            &series_url,
            sample_size,
        )
        .await?;

        let reference =
            signals::load_reference(source, selectors, &self.weights, &series_url).await?;

        if reference.tables.is_empty() {
            tracing::warn!(
                title = %reference.title,
                "Reference series has no staff, genres or recommendations; ranking by popularity alone"
            );
        }

        let mut aggregation = aggregator::retrieve_series_from_users_lists(
            source,
            selectors,
            &self.base_url,
            &users,
            &reference.title,
            self.max_concurrency,
        )
        .await;

        let calibration = calibration::calibrate(
            &mut aggregation.entries,
            &reference.title,
            users.len(),
            min_popularity,
        );

        if calibration.reference_hits == 0 {
            tracing::warn!(
                title = %reference.title,
                failed_users = aggregation.failed_users,
                "Reference series not found in any sampled list, nothing to recommend"
            );
            return Ok(Recommendations {
                reference_title: reference.title,
                series: Vec::new(),
            });
        }

        let scoring = scorer::score_candidates(
            source,
            selectors,
            &reference.tables,
            aggregation.entries,
            &calibration,
            self.max_concurrency,
        )
        .await;

        let series: Vec<RecommendedSeries> = ranking::rank(scoring.entries)
            .into_iter()
            .map(RecommendedSeries::from)
            .collect();

        tracing::info!(
            title = %reference.title,
            url = %reference.url,
            users = users.len(),
            failed_users = aggregation.failed_users,
            reference_hits = calibration.reference_hits,
            adjusting_factor = calibration.adjusting_factor,
            pool_size = calibration.pool_size,
            cutoff = calibration.cutoff,
            failed_candidates = scoring.failed_candidates,
            recommendations = series.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendation run completed"
        );

        Ok(Recommendations {
            reference_title: reference.title,
            series,
        })
    }
}
