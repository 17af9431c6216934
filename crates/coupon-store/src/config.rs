//! Coupon store configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;

/// Coupon store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// JSON file holding an array of coupons to load at startup (optional)
    pub seed_file: Option<PathBuf>,

    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,

    /// Fail startup when no seed file is configured
    pub require_seed: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            seed_file: None,
            log_filter: "info".to_string(),
            require_seed: false,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = StoreConfig {
            seed_file: lookup("COUPON_SEED_FILE")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),

            log_filter: lookup("COUPON_LOG").unwrap_or_else(|| "info".to_string()),

            require_seed: lookup("COUPON_REQUIRE_SEED")
                .unwrap_or_else(|| "false".to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("COUPON_REQUIRE_SEED".to_string()))?,
        };

        if config.require_seed && config.seed_file.is_none() {
            return Err(ConfigError::MissingRequired("COUPON_SEED_FILE".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
