use serde::Deserialize;

use crate::{models::SignalWeights, services::catalog::SelectorDefinitions};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Root of the catalog site, without a trailing slash
    #[serde(default = "default_catalog_base_url")]
    pub catalog_base_url: String,

    /// User agent sent with every catalog request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout for catalog pages
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Attempts per page before giving up on transient failures
    #[serde(default = "default_fetch_max_attempts")]
    pub fetch_max_attempts: u32,

    /// Base delay for retry backoff, doubled on each attempt
    #[serde(default = "default_fetch_retry_base_ms")]
    pub fetch_retry_base_ms: u64,

    /// Upper bound on in-flight page fetches within one wave
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Largest sample size a caller may request
    #[serde(default = "default_max_sample_size")]
    pub max_sample_size: usize,

    #[serde(default = "default_genre_weight")]
    pub genre_weight: f64,

    #[serde(default)]
    pub genre_weight_decrement: f64,

    #[serde(default = "default_rec_weight_initial")]
    pub rec_weight_initial: f64,

    #[serde(default = "default_rec_weight_decrement")]
    pub rec_weight_decrement: f64,

    #[serde(default)]
    pub rec_weight_floor: f64,

    /// Page selectors, read from `SELECTOR_*` variables
    #[serde(skip)]
    pub selectors: SelectorDefinitions,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_catalog_base_url() -> String {
    "https://myanimelist.net".to_string()
}

fn default_user_agent() -> String {
    concat!("watchthis/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    20
}

fn default_fetch_max_attempts() -> u32 {
    3
}

fn default_fetch_retry_base_ms() -> u64 {
    500
}

fn default_max_concurrent_fetches() -> usize {
    16
}

fn default_max_sample_size() -> usize {
    500
}

fn default_genre_weight() -> f64 {
    16.0
}

fn default_rec_weight_initial() -> f64 {
    80.0
}

fn default_rec_weight_decrement() -> f64 {
    5.0
}

/// Default selectors with any `SELECTOR_*` overrides from `vars` applied
fn load_selectors<I>(vars: I) -> anyhow::Result<SelectorDefinitions>
where
    I: IntoIterator<Item = (String, String)>,
{
    envy::prefixed("SELECTOR_")
        .from_iter(vars)
        .map_err(|e| anyhow::anyhow!("Failed to load selector overrides: {}", e))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.selectors = load_selectors(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.max_concurrent_fetches == 0 {
            anyhow::bail!("MAX_CONCURRENT_FETCHES must be at least 1");
        }
        if self.fetch_max_attempts == 0 {
            anyhow::bail!("FETCH_MAX_ATTEMPTS must be at least 1");
        }
        if self.catalog_base_url.ends_with('/') {
            anyhow::bail!("CATALOG_BASE_URL must not end with a slash");
        }
        Ok(())
    }

    /// Weight schedule for the signal tables, defaults overridden by the
    /// rank-sensitive settings above
    pub fn signal_weights(&self) -> SignalWeights {
        SignalWeights {
            genre_initial: self.genre_weight,
            genre_decrement: self.genre_weight_decrement,
            rec_initial: self.rec_weight_initial,
            rec_decrement: self.rec_weight_decrement,
            rec_floor: self.rec_weight_floor,
            ..SignalWeights::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::Selectors;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>();
        envy::from_iter::<_, Config>(vars).unwrap()
    }

    #[test]
    fn test_defaults_apply_when_env_is_empty() {
        let config = from_pairs(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.catalog_base_url, "https://myanimelist.net");
        assert_eq!(config.max_concurrent_fetches, 16);
        assert_eq!(config.genre_weight_decrement, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_weight_overrides_flow_into_signal_weights() {
        let config = from_pairs(&[("GENRE_WEIGHT_DECREMENT", "2"), ("REC_WEIGHT_FLOOR", "10")]);
        let weights = config.signal_weights();
        assert_eq!(weights.genre_initial, 16.0);
        assert_eq!(weights.genre_decrement, 2.0);
        assert_eq!(weights.rec_floor, 10.0);
        assert_eq!(weights.main_voice_actor, 2.0);
    }

    #[test]
    fn test_selector_overrides_replace_only_named_fields() {
        let selectors = load_selectors(vec![
            ("SELECTOR_GENRE_LABEL".to_string(), "Genres".to_string()),
            ("SELECTOR_LIST_TITLE_LINKS".to_string(), "td.title > a".to_string()),
            ("GENRE_WEIGHT".to_string(), "20".to_string()),
        ])
        .unwrap();

        let defaults = SelectorDefinitions::default();
        assert_eq!(selectors.genre_label, "Genres");
        assert_eq!(selectors.list_title_links, "td.title > a");
        assert_eq!(selectors.details_link, defaults.details_link);
        assert!(Selectors::compile(&selectors).is_ok());
    }

    #[test]
    fn test_unset_selectors_keep_catalog_defaults() {
        let config = from_pairs(&[]);
        let selectors = load_selectors(Vec::new()).unwrap();
        assert_eq!(config.selectors.series_title, selectors.series_title);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let config = from_pairs(&[("MAX_CONCURRENT_FETCHES", "0")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trailing_slash_base_url_is_rejected() {
        let config = from_pairs(&[("CATALOG_BASE_URL", "https://example.test/")]);
        assert!(config.validate().is_err());
    }
}
