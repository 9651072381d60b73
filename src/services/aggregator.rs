use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};

use crate::{
    error::AppResult,
    models::{Entry, User},
    services::catalog::{
        extract::{self, ListedSeries},
        PageSource, Selectors,
    },
};

/// Candidate pool produced by the aggregation wave
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Every title seen, keyed by title
    pub entries: HashMap<String, Entry>,
    /// Users whose list contributed at least one title
    pub lists_read: usize,
    /// Users whose list could not be fetched
    pub failed_users: usize,
}

impl Aggregation {
    /// Records one sighting of `series`
    fn record(&mut self, series: ListedSeries) {
        match self.entries.get_mut(&series.title) {
            Some(entry) => entry.increment(),
            None => {
                let entry = Entry::new(series.title.clone(), series.url);
                self.entries.insert(series.title, entry);
            }
        }
    }
}

async fn fetch_list(
    source: &dyn PageSource,
    selectors: &Selectors,
    base_url: &str,
    user: &User,
) -> AppResult<Vec<ListedSeries>> {
    let html = source.fetch_page(user.list_url()).await?;
    Ok(extract::listed_series(&html, selectors, base_url))
}

/// Reads every user's completed list and counts how many lists each title is on
///
/// Lists are fetched concurrently, at most `max_concurrency` at a time. Each
/// list is merged into the pool as it arrives by this function alone, so no
/// increment can be lost. A title repeated within one list counts once. A
/// user whose list cannot be fetched is logged and skipped. The reference
/// title is counted like any other.
pub async fn retrieve_series_from_users_lists(
    source: &dyn PageSource,
    selectors: &Selectors,
    base_url: &str,
    users: &[User],
    reference_title: &str,
    max_concurrency: usize,
) -> Aggregation {
    let mut aggregation = Aggregation::default();

    let mut lists = stream::iter(users.iter().cloned())
        .map(|user| async move {
            let result = fetch_list(source, selectors, base_url, &user).await;
            (user, result)
        })
        .buffer_unordered(max_concurrency.max(1));

    while let Some((user, result)) = lists.next().await {
        match result {
            Ok(series) => {
                let has_reference = series.iter().any(|s| s.title == reference_title);
                tracing::debug!(
                    user = %user.username(),
                    titles = series.len(),
                    has_reference,
                    "Read user list"
                );
                if !series.is_empty() {
                    aggregation.lists_read += 1;
                }
                // A title counts once per user, however many rows list it
                let mut seen = HashSet::new();
                for listed in series {
                    if seen.insert(listed.title.clone()) {
                        aggregation.record(listed);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(user = %user.username(), error = %e, "Skipping user list");
                aggregation.failed_users += 1;
            }
        }
    }

    tracing::info!(
        users = users.len(),
        lists_read = aggregation.lists_read,
        failed = aggregation.failed_users,
        candidates = aggregation.entries.len(),
        "Aggregated user lists"
    );

    aggregation
}
