//! Application configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Configuration can be loaded from environment variables and config files.

use chrono_tz::Tz;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;

use crate::error::AppError;
use crate::models::RateTable;
use crate::AppResult;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub billing: BillingConfig,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Comma-separated list of allowed CORS origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_timeout() -> u64 {
    30
}

fn default_cors_origins() -> String {
    "http://localhost:3000,http://127.0.0.1:3000".to_string()
}

/// Database configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Idle connection timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Apply pending migrations at startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_run_migrations() -> bool {
    true
}

/// Billing configuration
///
/// Rates are optional at this layer so that a missing one is reported by
/// [`BillingConfig::rate_table`] instead of silently defaulting.
#[derive(Debug, Deserialize, Clone)]
pub struct BillingConfig {
    /// IANA time zone in which calendar days are counted
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Nightly rate Monday to Friday
    #[serde(default)]
    pub daily_working_day: Option<Decimal>,

    /// Nightly rate Saturday and Sunday
    #[serde(default)]
    pub daily_weekend: Option<Decimal>,

    /// Garage rate per night Monday to Friday
    #[serde(default)]
    pub garage_working_day: Option<Decimal>,

    /// Garage rate per night Saturday and Sunday
    #[serde(default)]
    pub garage_weekend: Option<Decimal>,

    /// Longest stay, in nights, the calculator will walk
    #[serde(default = "default_max_stay_nights")]
    pub max_stay_nights: u32,
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

fn default_max_stay_nights() -> u32 {
    366
}

impl BillingConfig {
    /// Build the validated rate table
    pub fn rate_table(&self) -> AppResult<RateTable> {
        RateTable::from_parts(
            self.daily_working_day,
            self.daily_weekend,
            self.garage_working_day,
            self.garage_weekend,
        )
    }

    /// Parse the configured time zone
    pub fn time_zone(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| AppError::Config(format!("Invalid timezone '{}': {}", self.timezone, e)))
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        let rates = RateTable::default();
        Self {
            timezone: default_timezone(),
            daily_working_day: Some(rates.daily_working_day()),
            daily_weekend: Some(rates.daily_weekend()),
            garage_working_day: Some(rates.garage_working_day()),
            garage_weekend: Some(rates.garage_weekend()),
            max_stay_nights: default_max_stay_nights(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::builder(&run_mode)?
            // Plain DATABASE_URL wins, as sqlx tooling expects it
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?
            .try_deserialize()
    }

    /// Layered sources: defaults, config files, then `GUESTHOUSE__*` variables
    ///
    /// Billing rates have no defaults here; they must come from a file or the
    /// environment.
    fn builder(run_mode: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("server.timeout_secs", 30)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.run_migrations", true)?
            .set_default("billing.timezone", "America/Sao_Paulo")?
            .set_default("billing.max_stay_nights", 366)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with GUESTHOUSE_ prefix
            .add_source(
                Environment::with_prefix("GUESTHOUSE")
                    .separator("__")
                    .try_parsing(true),
            ))
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_billing_config() {
        let config = BillingConfig::default();
        assert_eq!(config.max_stay_nights, 366);
        assert_eq!(config.time_zone().unwrap(), chrono_tz::America::Sao_Paulo);
        assert_eq!(config.rate_table().unwrap(), RateTable::default());
    }

    #[test]
    fn test_invalid_timezone() {
        let config = BillingConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.time_zone(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_missing_rate() {
        let config = BillingConfig {
            daily_weekend: None,
            ..Default::default()
        };
        assert!(matches!(
            config.rate_table(),
            Err(AppError::InvalidRateTable(_))
        ));
    }

    #[test]
    fn test_billing_section_from_source() {
        let config = Config::builder()
            .set_default("timezone", "Europe/Lisbon")
            .unwrap()
            .set_default("daily_working_day", "99.50")
            .unwrap()
            .set_default("daily_weekend", 130)
            .unwrap()
            .set_default("garage_working_day", "10")
            .unwrap()
            .set_default("garage_weekend", "12.5")
            .unwrap()
            .build()
            .unwrap();

        let billing: BillingConfig = config.try_deserialize().unwrap();
        let rates = billing.rate_table().unwrap();

        assert_eq!(billing.max_stay_nights, 366);
        assert_eq!(rates.daily_working_day(), dec!(99.50));
        assert_eq!(rates.daily_weekend(), dec!(130));
        assert_eq!(rates.garage_weekend(), dec!(12.5));
    }

    #[test]
    fn test_layered_config_has_no_rate_defaults() {
        let config: AppConfig = AppConfig::builder("test")
            .unwrap()
            .set_override("database.url", "postgresql://localhost/guesthouse")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.billing.max_stay_nights, 366);
        assert_eq!(config.billing.daily_working_day, None);
        assert!(matches!(
            config.billing.rate_table(),
            Err(AppError::InvalidRateTable(msg)) if msg.contains("daily_working_day")
        ));
    }

    #[test]
    fn test_layered_config_reads_configured_rates() {
        let config: AppConfig = AppConfig::builder("test")
            .unwrap()
            .set_override("database.url", "postgresql://localhost/guesthouse")
            .unwrap()
            .set_override("billing.daily_working_day", "110")
            .unwrap()
            .set_override("billing.daily_weekend", "140")
            .unwrap()
            .set_override("billing.garage_working_day", "12")
            .unwrap()
            .set_override("billing.garage_weekend", "18")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let rates = config.billing.rate_table().unwrap();
        assert_eq!(rates.daily_working_day(), dec!(110));
        assert_eq!(rates.garage_weekend(), dec!(18));
    }
}
