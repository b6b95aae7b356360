//! Configuration management for the `seatmap` binary.
//!
//! Loads configuration from environment variables (after `.env`) with
//! sensible defaults.

use seatmap_runtime::persistence::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default directory for the file-backed store
pub const DEFAULT_DATA_DIR: &str = ".seatmap";

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors produced while reading configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but empty
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// A variable could not be parsed
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
        /// Parser message
        reason: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where the current map is stored
    pub storage: StorageConfig,
    /// Log filter used when `RUST_LOG` is unset (trace, debug, info, warn, error)
    pub log_level: String,
    /// Seed for template seat availability; `None` seeds from entropy
    pub template_seed: Option<u64>,
}

/// File-backed key/value store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the store
    pub data_dir: PathBuf,
    /// Key (file stem) of the current map
    pub key: String,
}

impl Config {
    /// Reads `SEATMAP_*` variables from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("SEATMAP_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        if data_dir.trim().is_empty() {
            return Err(ConfigError::Empty("SEATMAP_DATA_DIR"));
        }

        let key = lookup("SEATMAP_STORAGE_KEY").unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        if key.trim().is_empty() {
            return Err(ConfigError::Empty("SEATMAP_STORAGE_KEY"));
        }

        let template_seed = lookup("SEATMAP_TEMPLATE_SEED")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::Invalid {
                        var: "SEATMAP_TEMPLATE_SEED",
                        value: value.clone(),
                        reason: e.to_string(),
                    })
            })
            .transpose()?;

        Ok(Self {
            storage: StorageConfig {
                data_dir: PathBuf::from(data_dir),
                key,
            },
            log_level: lookup("SEATMAP_LOG_LEVEL")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            template_seed,
        })
    }
}
