//! Configuration management for the Harvest Insights Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with HARVEST__ prefix

use std::path::PathBuf;
use std::time::Duration;

use chrono::FixedOffset;
use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::InsightThresholds;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// UTC offset applied to record timestamps, e.g. "-03:00"
    pub timezone_offset: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Audit log and store timeouts
    pub storage: StorageConfig,

    /// Insight rule thresholds
    #[serde(default)]
    pub insights: InsightThresholds,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL; records are kept in memory when unset
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,

    /// Apply bundled migrations at startup
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file holding the audit trail
    pub audit_log_path: PathBuf,

    /// Upper bound for any single store operation
    pub operation_timeout_secs: u64,
}

impl StorageConfig {
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("HARVEST_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("timezone_offset", "-03:00")?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.run_migrations", environment == "development")?
            .set_default("storage.audit_log_path", "harvest_history.json")?
            .set_default("storage.operation_timeout_secs", 30)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (HARVEST__ prefix)
            .add_source(
                Environment::with_prefix("HARVEST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.utc_offset()?;
        Ok(config)
    }

    /// Parse the configured UTC offset
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        self.timezone_offset.parse::<FixedOffset>().map_err(|e| {
            ConfigError::Message(format!(
                "invalid timezone_offset {:?}: {}",
                self.timezone_offset, e
            ))
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}
