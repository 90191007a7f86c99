//! Environment-driven runtime settings.
//!
//! Every knob has a built-in default, so a bare environment runs against a
//! local backend out of the box. `.env` loading happens in the binaries
//! before this module is consulted.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("environment variable {key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Resolved configuration for the refresh engine and its integrations.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the backend aggregation endpoint (`DASH_API_BASE`).
    pub api_base_url: String,
    /// Pause between periodic refresh cycles (`DASH_UPDATE_INTERVAL_SECS`).
    pub update_interval: Duration,
    /// Age limit for cached resource values (`DASH_CACHE_TTL_SECS`); zero
    /// disables caching.
    pub cache_ttl: Duration,
    /// Consecutive probe failures before the engine goes offline
    /// (`DASH_MAX_RETRIES`).
    pub max_retries: u32,
    /// Per-resource fetch deadline (`DASH_FETCH_TIMEOUT_SECS`).
    pub fetch_timeout: Duration,
    /// Entries shown per threat-feed card (`DASH_FEED_LIMIT`).
    pub feed_limit: usize,
    /// Directory for the daemon's JSON snapshot files (`DASH_STATE_DIR`).
    pub state_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000/api/dashboard/".to_string(),
            update_interval: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(300),
            max_retries: 3,
            fetch_timeout: Duration::from_secs(10),
            feed_limit: 10,
            state_dir: PathBuf::from("state"),
        }
    }
}

impl Settings {
    /// Reads the `DASH_*` variables, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self, SettingsError> {
        let defaults = Settings::default();
        Ok(Settings {
            api_base_url: env::var("DASH_API_BASE").unwrap_or(defaults.api_base_url),
            update_interval: Duration::from_secs(parse_value(
                "DASH_UPDATE_INTERVAL_SECS",
                env::var("DASH_UPDATE_INTERVAL_SECS").ok(),
                defaults.update_interval.as_secs(),
            )?),
            cache_ttl: Duration::from_secs(parse_value(
                "DASH_CACHE_TTL_SECS",
                env::var("DASH_CACHE_TTL_SECS").ok(),
                defaults.cache_ttl.as_secs(),
            )?),
            max_retries: parse_value(
                "DASH_MAX_RETRIES",
                env::var("DASH_MAX_RETRIES").ok(),
                defaults.max_retries,
            )?,
            fetch_timeout: Duration::from_secs(parse_value(
                "DASH_FETCH_TIMEOUT_SECS",
                env::var("DASH_FETCH_TIMEOUT_SECS").ok(),
                defaults.fetch_timeout.as_secs(),
            )?),
            feed_limit: parse_value(
                "DASH_FEED_LIMIT",
                env::var("DASH_FEED_LIMIT").ok(),
                defaults.feed_limit,
            )?,
            state_dir: env::var("DASH_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_dir),
        })
    }
}

/// Parses `raw` when present, keeping the failing input in the error.
fn parse_value<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, SettingsError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => {
            let parsed = raw.trim().parse::<T>();
            parsed.map_err(|e| SettingsError::Invalid {
                key,
                value: raw,
                reason: e.to_string(),
            })
        }
        None => Ok(default),
    }
}
