//! Configuration for the resolution client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// PubChem PUG REST root.
pub const PUBCHEM_PUG_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";

/// Configuration for [`crate::ResolutionClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// PUG REST root URL
    pub base_url: String,

    /// Seconds slept between names, and the unit of retry backoff (default: 0.1)
    pub query_rate: f64,

    /// Retry attempts after a 503 (default: 3)
    pub max_retries: u32,

    /// Cache directory. Carried for compatibility; nothing is cached.
    pub cache_dir: String,

    /// Per-request timeout. `None` keeps the HTTP client default.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: PUBCHEM_PUG_URL.to_string(),
            query_rate: 0.1,
            max_retries: 3,
            cache_dir: "data".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ResolverConfig {
    /// Query rate as a duration. Negative or non-finite rates become zero.
    pub fn query_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.query_rate).unwrap_or(Duration::ZERO)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_query_rate(mut self, seconds: f64) -> Self {
        self.query_rate = seconds;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pubchem_politeness() {
        let config = ResolverConfig::default();
        assert_eq!(config.base_url, PUBCHEM_PUG_URL);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.query_delay(), Duration::from_millis(100));
        assert!(config.request_timeout_secs.is_none());
    }

    #[test]
    fn test_bad_query_rate_clamps_to_zero() {
        assert_eq!(ResolverConfig::default().with_query_rate(-1.0).query_delay(), Duration::ZERO);
        assert_eq!(ResolverConfig::default().with_query_rate(f64::NAN).query_delay(), Duration::ZERO);
    }
}
