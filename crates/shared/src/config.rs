//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::money::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Transfer reconciliation configuration.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// The single posting currency accepted at transaction creation.
    #[serde(default = "default_posting_currency")]
    pub posting_currency: Currency,
    /// Whether bank imports are posted immediately after creation.
    #[serde(default = "default_auto_post_imports")]
    pub auto_post_imports: bool,
}

fn default_posting_currency() -> Currency {
    Currency::Eur
}

fn default_auto_post_imports() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            posting_currency: default_posting_currency(),
            auto_post_imports: default_auto_post_imports(),
        }
    }
}

/// Transfer reconciliation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconciliationConfig {
    /// Maximum booking-date distance for fuzzy transfer matching.
    #[serde(default = "default_transfer_match_tolerance_days")]
    pub transfer_match_tolerance_days: i64,
    /// Minimum classifier confidence before a suggested category is used.
    #[serde(default = "default_classifier_min_confidence")]
    pub classifier_min_confidence: Decimal,
}

fn default_transfer_match_tolerance_days() -> i64 {
    2
}

fn default_classifier_min_confidence() -> Decimal {
    Decimal::new(75, 2) // 0.75
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            transfer_match_tolerance_days: default_transfer_match_tolerance_days(),
            classifier_min_confidence: default_classifier_min_confidence(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BUCHFINK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            reconciliation: ReconciliationConfig::default(),
        }
    }
}
