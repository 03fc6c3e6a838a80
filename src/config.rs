//! Runtime configuration for the greetings API client.
//!
//! Values come from the environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `GREETINGS_API_BASE_URL` | `http://localhost:3000` | Service origin |
//! | `GREETINGS_API_TIMEOUT_MS` | `10000` | Per-request timeout, must be positive |
//! | `GREETINGS_MODE` | `development` | `development`, `production` or `test` |
//! | `GREETINGS_CACHE_GC_MS` | `300000` | Idle time before an unused cache entry is evicted |

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const BASE_URL_VAR: &str = "GREETINGS_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "GREETINGS_API_TIMEOUT_MS";
pub const MODE_VAR: &str = "GREETINGS_MODE";
pub const CACHE_GC_VAR: &str = "GREETINGS_CACHE_GC_MS";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_CACHE_GC_MS: u64 = 300_000;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Deployment mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
    Test,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Mode::Development),
            "production" => Ok(Mode::Production),
            "test" => Ok(Mode::Test),
            other => Err(ConfigError::Invalid {
                var: MODE_VAR,
                reason: format!("unknown mode '{other}'"),
            }),
        }
    }
}

/// Settings for [`HttpGreetingRepository`](crate::repository::HttpGreetingRepository).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub mode: Mode,
    pub cache_gc_time: Duration,
}

impl ApiConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads settings through `lookup`; unset variables fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(raw_url.trim()).map_err(|e| ConfigError::Invalid {
            var: BASE_URL_VAR,
            reason: e.to_string(),
        })?;

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or_else(|| ConfigError::Invalid {
                    var: TIMEOUT_VAR,
                    reason: format!("expected a positive number of milliseconds, got '{raw}'"),
                })?,
            None => Duration::from_millis(DEFAULT_TIMEOUT_MS),
        };

        let mode = match lookup(MODE_VAR) {
            Some(raw) => raw.trim().parse()?,
            None => Mode::default(),
        };

        let cache_gc_time = match lookup(CACHE_GC_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::Invalid {
                    var: CACHE_GC_VAR,
                    reason: format!("expected a number of milliseconds, got '{raw}'"),
                })?,
            None => Duration::from_millis(DEFAULT_CACHE_GC_MS),
        };

        Ok(Self {
            base_url,
            timeout,
            mode,
            cache_gc_time,
        })
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache_gc_time(mut self, cache_gc_time: Duration) -> Self {
        self.cache_gc_time = cache_gc_time;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.mode, Mode::Development);
        assert_eq!(config.cache_gc_time, Duration::from_secs(300));
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "https://api.example.com"),
            (TIMEOUT_VAR, "2500"),
            (MODE_VAR, "production"),
            (CACHE_GC_VAR, "0"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.host_str(), Some("api.example.com"));
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.mode, Mode::Production);
        assert_eq!(config.cache_gc_time, Duration::ZERO);
    }

    #[test]
    fn test_rejects_bad_cache_gc_time() {
        let err = ApiConfig::from_lookup(lookup_from(&[(CACHE_GC_VAR, "-5")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: CACHE_GC_VAR, .. }));
    }

    #[test]
    fn test_rejects_non_positive_timeout() {
        let err = ApiConfig::from_lookup(lookup_from(&[(TIMEOUT_VAR, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: TIMEOUT_VAR, .. }));

        let err = ApiConfig::from_lookup(lookup_from(&[(TIMEOUT_VAR, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: TIMEOUT_VAR, .. }));
    }

    #[test]
    fn test_rejects_bad_url_and_mode() {
        let err = ApiConfig::from_lookup(lookup_from(&[(BASE_URL_VAR, "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: BASE_URL_VAR, .. }));

        let err = ApiConfig::from_lookup(lookup_from(&[(MODE_VAR, "staging")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid GREETINGS_MODE: unknown mode 'staging'");
    }
}
