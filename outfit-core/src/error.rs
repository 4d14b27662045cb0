//! Error taxonomy for the recommendation pipeline.
//!
//! Every failure belongs to exactly one class (configuration, network, parse or
//! data sufficiency) and its message starts with that class, so the CLI can
//! print it as is.

use std::{io, path::PathBuf, time::Duration};

use chrono::NaiveDate;
use thiserror::Error;

use crate::provider::ProviderId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Insufficient forecast data for {day}: no forecast point for {missing}")]
    InsufficientData { day: NaiveDate, missing: String },
}

/// Missing or unusable settings, and failures reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine platform config directory")]
    NoConfigDir,

    #[error("failed to read config file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("failed to serialize configuration to TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("no location configured.\nHint: run `outfit set <latitude> <longitude> [altitude]` first.")]
    MissingLocation,

    #[error("{name} {value} is out of range ({min}..={max})")]
    CoordinateOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("timeout_secs must be at least 1")]
    ZeroTimeout,

    #[error("unknown provider '{0}'. Supported providers: metno, openweather.")]
    UnknownProvider(String),

    #[error("no API key configured for provider '{0}'.\nHint: run `outfit configure {0}` and enter your API key.")]
    MissingApiKey(ProviderId),
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{provider} request timed out after {timeout:?}")]
    Timeout {
        provider: ProviderId,
        timeout: Duration,
    },

    #[error("{provider} request failed with status {status}: {body}")]
    Status {
        provider: ProviderId,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to reach {provider}: {source}")]
    Transport {
        provider: ProviderId,
        source: reqwest::Error,
    },
}

impl NetworkError {
    /// Sort a reqwest failure into the timeout or transport bucket.
    pub(crate) fn from_reqwest(
        provider: ProviderId,
        timeout: Duration,
        err: reqwest::Error,
    ) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout { provider, timeout }
        } else {
            NetworkError::Transport {
                provider,
                source: err,
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed {provider} response: {source}")]
    Json {
        provider: ProviderId,
        source: serde_json::Error,
    },

    #[error("{provider} response contains an invalid timestamp {value}")]
    Timestamp { provider: ProviderId, value: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_their_class() {
        let config: Error = ConfigError::MissingLocation.into();
        assert!(config.to_string().starts_with("Configuration error:"));

        let network: Error = NetworkError::Timeout {
            provider: ProviderId::MetNo,
            timeout: Duration::from_secs(10),
        }
        .into();
        assert_eq!(
            network.to_string(),
            "Network error: metno request timed out after 10s"
        );

        let parse: Error = ParseError::Timestamp {
            provider: ProviderId::OpenWeather,
            value: -1,
        }
        .into();
        assert!(parse.to_string().starts_with("Parse error:"));

        let insufficient = Error::InsufficientData {
            day: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            missing: "noon, afternoon".into(),
        };
        assert_eq!(
            insufficient.to_string(),
            "Insufficient forecast data for 2026-10-18: no forecast point for noon, afternoon"
        );
    }

    #[test]
    fn missing_api_key_hints_at_configure() {
        let err = ConfigError::MissingApiKey(ProviderId::OpenWeather);
        assert!(err.to_string().contains("outfit configure openweather"));
    }
}
