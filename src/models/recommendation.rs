use serde::{Deserialize, Serialize};

use super::Entry;

/// Request body for the recommendations endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    /// Any page of the reference series on the catalog site
    pub series_url: String,
    /// Number of recently updated users to sample
    pub sample_size: usize,
    /// Minimum number of sampled lists a candidate must appear in, before pool scaling
    pub min_popularity: f64,
}

/// A ranked recommendation returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendedSeries {
    pub title: String,
    pub url: String,
    pub score: f64,
}

impl From<Entry> for RecommendedSeries {
    fn from(entry: Entry) -> Self {
        Self {
            score: entry.match_value(),
            title: entry.title().to_string(),
            url: entry.url().to_string(),
        }
    }
}

/// Response body for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub reference_title: String,
    pub sample_size: usize,
    pub recommendations: Vec<RecommendedSeries>,
}

/// Outcome of one recommendation run
#[derive(Debug, Clone)]
pub struct Recommendations {
    pub reference_title: String,
    pub series: Vec<RecommendedSeries>,
}
