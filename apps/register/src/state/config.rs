//! # Configuration
//!
//! Application configuration loaded once at startup from the environment.
//!
//! ## Environment Variables
//! ```text
//! CARIBE_DB_PATH             required   SQLite file path
//! CARIBE_BUSINESS_NAME       optional   "Parada Caribe"
//! CARIBE_TAGLINE             optional   "Your favourite Caribbean flavour"
//! CARIBE_CURRENCY_SYMBOL     optional   "$"
//! CARIBE_DB_MAX_CONNECTIONS  optional   5
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use caribe_core::document::BusinessInfo;
use caribe_db::DbConfig;
use serde::Serialize;

const DEFAULT_BUSINESS_NAME: &str = "Parada Caribe";
const DEFAULT_TAGLINE: &str = "Your favourite Caribbean flavour";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Application configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// SQLite database file.
    pub db_path: PathBuf,

    /// Business name (receipt header and summaries)
    pub business_name: String,

    /// Receipt tagline
    pub tagline: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Pool size
    pub db_max_connections: u32,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars().collect())
    }

    /// Loads configuration from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let db_path = get("CARIBE_DB_PATH")
            .map(PathBuf::from)
            .ok_or_else(|| ConfigError::MissingRequired("CARIBE_DB_PATH".to_string()))?;

        let db_max_connections = match get("CARIBE_DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue("CARIBE_DB_MAX_CONNECTIONS".to_string()))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(AppConfig {
            db_path,
            business_name: get("CARIBE_BUSINESS_NAME")
                .unwrap_or(DEFAULT_BUSINESS_NAME)
                .to_string(),
            tagline: get("CARIBE_TAGLINE").unwrap_or(DEFAULT_TAGLINE).to_string(),
            currency_symbol: get("CARIBE_CURRENCY_SYMBOL").unwrap_or("$").to_string(),
            db_max_connections,
        })
    }

    /// Configuration for tests: defaults around an explicit path.
    pub fn with_db_path(path: impl Into<PathBuf>) -> Self {
        AppConfig {
            db_path: path.into(),
            business_name: DEFAULT_BUSINESS_NAME.to_string(),
            tagline: DEFAULT_TAGLINE.to_string(),
            currency_symbol: "$".to_string(),
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Pool configuration for this register.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path).max_connections(self.db_max_connections)
    }

    /// Header printed on receipts and summaries.
    pub fn business(&self) -> BusinessInfo {
        BusinessInfo {
            name: self.business_name.clone(),
            tagline: self.tagline.clone(),
        }
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            (cents / 100).abs(),
            (cents % 100).abs()
        )
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
