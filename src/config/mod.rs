//! Configuration management for the funding rate monitor.
//!
//! Loads settings from an optional config file, `FRM__`-prefixed environment
//! variables and the Telegram credentials in `TELEGRAM_BOT_TOKEN` /
//! `TELEGRAM_CHAT_ID`.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Exchange endpoints and request timeouts
    #[serde(default)]
    pub exchange: ExchangeConfig,
    /// Threshold, batching and cadence
    #[serde(default)]
    pub scan: ScanConfig,
    /// Telegram delivery settings
    #[serde(default)]
    pub telegram: TelegramConfig,
    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// REST base URL for public market data
    #[serde(default = "default_exchange_base_url")]
    pub base_url: String,
    /// Product line queried for contracts and funding rates
    #[serde(default = "default_product_type")]
    pub product_type: String,
    /// Timeout for the contract listing request
    #[serde(default = "default_list_timeout")]
    pub list_timeout_secs: u64,
    /// Timeout for each per-symbol funding rate request
    #[serde(default = "default_rate_timeout")]
    pub rate_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Absolute funding rate (in percent) at or above which a symbol is reported
    #[serde(default = "default_threshold_pct")]
    pub threshold_pct: Decimal,
    /// Symbols fetched concurrently per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Pause after each batch, in milliseconds
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
    /// Sleep between completed cycles
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// Sleep after a cycle whose symbol listing came back empty
    #[serde(default = "default_listing_backoff")]
    pub listing_backoff_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token embedded in the send URL
    #[serde(default)]
    pub bot_token: String,
    /// Destination chat id
    #[serde(default)]
    pub chat_id: String,
    /// Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_base_url: String,
    /// Timeout for the sendMessage request
    #[serde(default = "default_telegram_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for the daily rolling log file
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// `EnvFilter` directives used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of the human-readable format
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_exchange_base_url() -> String {
    "https://api.bitget.com".to_string()
}

fn default_product_type() -> String {
    "usdt-futures".to_string()
}

fn default_list_timeout() -> u64 {
    10
}

fn default_rate_timeout() -> u64 {
    5
}

fn default_threshold_pct() -> Decimal {
    Decimal::new(15, 1) // 1.5%
}

fn default_batch_size() -> usize {
    20
}

fn default_batch_delay_ms() -> u64 {
    1100 // keeps ~20 symbols per 1.1s under the public rate limit
}

fn default_interval() -> u64 {
    300
}

fn default_listing_backoff() -> u64 {
    300
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_telegram_timeout() -> u64 {
    5
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_filter() -> String {
    "info,funding_rate_monitor=debug".to_string()
}

impl Config {
    /// Load configuration from environment variables and config files.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::default().separator("__").prefix("FRM"))
            .set_override_option("telegram.bot_token", std::env::var("TELEGRAM_BOT_TOKEN").ok())
            .context("Failed to apply TELEGRAM_BOT_TOKEN")?
            .set_override_option("telegram.chat_id", std::env::var("TELEGRAM_CHAT_ID").ok())
            .context("Failed to apply TELEGRAM_CHAT_ID")?
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Validate configuration values.
    ///
    /// Telegram credentials are not checked; a missing token shows up as a
    /// logged send failure.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.scan.batch_size >= 1, "batch_size must be at least 1");

        anyhow::ensure!(
            self.scan.threshold_pct >= Decimal::ZERO,
            "threshold_pct must not be negative"
        );

        anyhow::ensure!(
            self.exchange.list_timeout_secs > 0
                && self.exchange.rate_timeout_secs > 0
                && self.telegram.timeout_secs > 0,
            "request timeouts must be greater than zero"
        );

        anyhow::ensure!(!self.logging.dir.trim().is_empty(), "logging.dir must not be empty");

        Ok(())
    }
}

impl ExchangeConfig {
    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }

    pub fn rate_timeout(&self) -> Duration {
        Duration::from_secs(self.rate_timeout_secs)
    }
}

impl ScanConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn listing_backoff(&self) -> Duration {
        Duration::from_secs(self.listing_backoff_secs)
    }
}

impl TelegramConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exchange: ExchangeConfig::default(),
            scan: ScanConfig::default(),
            telegram: TelegramConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_exchange_base_url(),
            product_type: default_product_type(),
            list_timeout_secs: default_list_timeout(),
            rate_timeout_secs: default_rate_timeout(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            threshold_pct: default_threshold_pct(),
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
            interval_secs: default_interval(),
            listing_backoff_secs: default_listing_backoff(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base_url: default_telegram_api_url(),
            timeout_secs: default_telegram_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_ok!(config.validate());
    }

    #[test]
    fn test_default_cadence() {
        let config = Config::default();
        assert_eq!(config.scan.threshold_pct, dec!(1.5));
        assert_eq!(config.scan.batch_size, 20);
        assert_eq!(config.scan.batch_delay(), Duration::from_millis(1100));
        assert_eq!(config.scan.interval(), Duration::from_secs(300));
        assert_eq!(config.scan.listing_backoff(), Duration::from_secs(300));
        assert_eq!(config.exchange.list_timeout(), Duration::from_secs(10));
        assert_eq!(config.exchange.rate_timeout(), Duration::from_secs(5));
        assert_eq!(config.telegram.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = Config::default();
        config.scan.batch_size = 0;
        assert_err!(config.validate());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let mut config = Config::default();
        config.scan.threshold_pct = dec!(-0.5);
        assert_err!(config.validate());
    }

    #[test]
    fn test_default_logging() {
        let config = Config::default();
        assert_eq!(config.logging.dir, "logs");
        assert_eq!(config.logging.filter, "info,funding_rate_monitor=debug");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_blank_log_dir_rejected() {
        let mut config = Config::default();
        config.logging.dir = "  ".to_string();
        assert_err!(config.validate());
    }

    #[test]
    fn test_missing_credentials_still_valid() {
        let config = Config::default();
        assert!(config.telegram.bot_token.is_empty());
        assert!(config.validate().is_ok());
    }
}
