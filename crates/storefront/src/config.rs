//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `POCKETSHOP_DATA_DIR` - Directory for persisted state (default: .pocketshop)
//! - `POCKETSHOP_FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is free (default: 50)
//! - `POCKETSHOP_FLAT_SHIPPING_FEE` - Shipping charged otherwise (default: 10)
//! - `POCKETSHOP_PAYMENT_DELAY_MS` - Simulated payment time (default: 2000)
//! - `POCKETSHOP_LOG_FORMAT` - `pretty` or `json` (default: pretty)

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use pocketshop_core::Price;

use crate::services::checkout::CheckoutConfig;

const DEFAULT_DATA_DIR: &str = ".pocketshop";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Where the file-backed store keeps its JSON files
    pub data_dir: PathBuf,
    /// Checkout pricing and payment settings
    pub checkout: CheckoutConfig,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            checkout: CheckoutConfig::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);
        let defaults = CheckoutConfig::default();

        let data_dir = PathBuf::from(env.get_or_default("POCKETSHOP_DATA_DIR", DEFAULT_DATA_DIR));

        let free_shipping_threshold = env
            .get_parsed::<Price>("POCKETSHOP_FREE_SHIPPING_THRESHOLD")?
            .unwrap_or(defaults.free_shipping_threshold);
        let flat_shipping_fee = env
            .get_parsed::<Price>("POCKETSHOP_FLAT_SHIPPING_FEE")?
            .unwrap_or(defaults.flat_shipping_fee);
        let payment_delay = env
            .get_parsed::<u64>("POCKETSHOP_PAYMENT_DELAY_MS")?
            .map_or(defaults.payment_delay, Duration::from_millis);
        let log_format = env
            .get_parsed::<LogFormat>("POCKETSHOP_LOG_FORMAT")?
            .unwrap_or_default();

        Ok(Self {
            data_dir,
            checkout: CheckoutConfig {
                free_shipping_threshold,
                flat_shipping_fee,
                payment_delay,
                ..defaults
            },
            log_format,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable, treating blank values as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get and parse an optional variable.
    fn get_parsed<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get_optional(key)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
            })
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.data_dir, PathBuf::from(".pocketshop"));
        assert_eq!(config.checkout, CheckoutConfig::default());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("POCKETSHOP_DATA_DIR", "/tmp/shop"),
            ("POCKETSHOP_FREE_SHIPPING_THRESHOLD", "75"),
            ("POCKETSHOP_FLAT_SHIPPING_FEE", "$4.99"),
            ("POCKETSHOP_PAYMENT_DELAY_MS", "0"),
            ("POCKETSHOP_LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/shop"));
        assert_eq!(config.checkout.free_shipping_threshold, Price::from_dollars(75));
        assert_eq!(config.checkout.flat_shipping_fee, Price::from_cents(499));
        assert_eq!(config.checkout.payment_delay, Duration::ZERO);
        assert_eq!(config.checkout.coupon_code, "SAVE10");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("POCKETSHOP_DATA_DIR", "  ")]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".pocketshop"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = load(&[("POCKETSHOP_PAYMENT_DELAY_MS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "POCKETSHOP_PAYMENT_DELAY_MS"));

        let err = load(&[("POCKETSHOP_FLAT_SHIPPING_FEE", "-3")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));

        let err = load(&[("POCKETSHOP_LOG_FORMAT", "xml")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));
    }
}
