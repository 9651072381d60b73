use std::collections::HashMap;

use crate::models::Entry;

/// Pool sizes at which the popularity cutoff is scaled up, largest first
const POOL_SCALING: [(usize, f64); 4] = [(2000, 3.0), (1500, 2.5), (1000, 2.0), (700, 1.5)];

/// Sample statistics that normalize popularity and gate scoring
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    /// Sampled lists that contained the reference series
    pub reference_hits: u32,
    pub sample_size: usize,
    /// `reference_hits / sample_size`
    pub adjusting_factor: f64,
    /// Distinct candidates left after removing the reference series
    pub pool_size: usize,
    /// Minimum raw counter a candidate needs to be scored
    pub cutoff: f64,
}

/// Multiplier applied to the caller's minimum popularity for a pool of `pool_size`
///
/// Larger pools come from noisier samples and dilute per-title counts, so
/// they demand more sightings.
pub fn pool_multiplier(pool_size: usize) -> f64 {
    POOL_SCALING
        .iter()
        .find(|(threshold, _)| pool_size >= *threshold)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

/// Removes the reference series from the pool and derives the run's calibration
pub fn calibrate(
    entries: &mut HashMap<String, Entry>,
    reference_title: &str,
    sample_size: usize,
    min_popularity: f64,
) -> Calibration {
    let reference_hits = entries
        .remove(reference_title)
        .map(|entry| entry.counter())
        .unwrap_or(0);

    let adjusting_factor = if sample_size == 0 {
        0.0
    } else {
        f64::from(reference_hits) / sample_size as f64
    };

    let pool_size = entries.len();
    let cutoff = min_popularity * pool_multiplier(pool_size);

    tracing::info!(
        reference_hits,
        sample_size,
        adjusting_factor,
        pool_size,
        cutoff,
        "Calibrated popularity threshold"
    );

    Calibration {
        reference_hits,
        sample_size,
        adjusting_factor,
        pool_size,
        cutoff,
    }
}
