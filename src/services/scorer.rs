use std::collections::HashMap;

use futures::stream::{self, StreamExt};

use crate::{
    models::Entry,
    services::{
        calibration::Calibration,
        catalog::{extract, PageSource, Selectors},
        signals::{characters_url, SignalTables},
    },
};

/// A candidate must have been seen strictly more often than this to be scored
pub const MIN_SIGHTINGS: u32 = 3;

/// Scored candidates from the scoring wave, in completion order
#[derive(Debug, Default)]
pub struct Scoring {
    pub entries: Vec<Entry>,
    /// Candidates kept with zero bonus because their page could not be fetched
    pub failed_candidates: usize,
}

/// Whether `entry` may enter the scoring wave
///
/// Both conditions use the raw counter: more than [`MIN_SIGHTINGS`] lists,
/// and at least the calibrated cutoff.
pub fn passes_gate(entry: &Entry, cutoff: f64) -> bool {
    entry.counter() > MIN_SIGHTINGS && f64::from(entry.counter()) >= cutoff
}

/// Normalizes and scores one candidate, returning whether its page was read
async fn score_entry(
    source: &dyn PageSource,
    selectors: &Selectors,
    tables: &SignalTables,
    mut entry: Entry,
    adjusting_factor: f64,
) -> (Entry, bool) {
    entry.normalize(adjusting_factor);

    match source.fetch_page(&characters_url(entry.url())).await {
        Ok(html) => {
            let profile = extract::series_profile(&html, selectors);
            let bonus = tables.bonus_for(entry.title(), &profile);
            entry.add_bonus(bonus);
            tracing::debug!(
                title = %entry.title(),
                counter = entry.counter(),
                popularity = entry.popularity(),
                bonus,
                "Scored candidate"
            );
            (entry, true)
        }
        Err(e) => {
            tracing::warn!(
                title = %entry.title(),
                error = %e,
                "Candidate page unavailable, keeping popularity only"
            );
            (entry, false)
        }
    }
}

/// Scores every candidate that passes the gate
///
/// Gating happens before any fetch. Gated candidates are scored concurrently,
/// at most `max_concurrency` at a time, and handed back to this function,
/// which alone assembles the result list.
pub async fn score_candidates(
    source: &dyn PageSource,
    selectors: &Selectors,
    tables: &SignalTables,
    entries: HashMap<String, Entry>,
    calibration: &Calibration,
    max_concurrency: usize,
) -> Scoring {
    let gated: Vec<Entry> = entries
        .into_values()
        .filter(|entry| passes_gate(entry, calibration.cutoff))
        .collect();

    tracing::info!(
        candidates = gated.len(),
        cutoff = calibration.cutoff,
        "Scoring candidates above cutoff"
    );

    let adjusting_factor = calibration.adjusting_factor;
    let mut scored = stream::iter(gated)
        .map(|entry| score_entry(source, selectors, tables, entry, adjusting_factor))
        .buffer_unordered(max_concurrency.max(1));

    let mut scoring = Scoring::default();
    while let Some((entry, page_read)) = scored.next().await {
        if !page_read {
            scoring.failed_candidates += 1;
        }
        scoring.entries.push(entry);
    }

    tracing::info!(
        scored = scoring.entries.len(),
        failed = scoring.failed_candidates,
        "Scored candidates"
    );

    scoring
}
