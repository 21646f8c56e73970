//! Configuration management for Marginalia

use serde::Deserialize;
use std::env;

use crate::error::{Error, Result};
use crate::merge::MergeConfig;

const DEFAULT_LOG_FILTER: &str = "marginalia=info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub merge: MergeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            merge: MergeConfig::default(),
            logging: LoggingConfig {
                filter: DEFAULT_LOG_FILTER.to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = MergeConfig::default();

        Ok(Config {
            merge: MergeConfig {
                position_threshold: threshold_from_env(
                    "MARGINALIA_POSITION_THRESHOLD",
                    defaults.position_threshold,
                )?,
                time_threshold_secs: threshold_from_env(
                    "MARGINALIA_TIME_THRESHOLD_SECS",
                    defaults.time_threshold_secs,
                )?,
            },
            logging: LoggingConfig {
                filter: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            },
        })
    }
}

fn threshold_from_env(key: &str, default: f64) -> Result<f64> {
    match env::var(key) {
        Ok(value) => parse_threshold(key, &value),
        Err(_) => Ok(default),
    }
}

/// Thresholds must be finite and non-negative
fn parse_threshold(key: &str, value: &str) -> Result<f64> {
    let invalid = || Error::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    };

    let threshold: f64 = value.trim().parse().map_err(|_| invalid())?;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(invalid());
    }
    Ok(threshold)
}
