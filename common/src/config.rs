// Configuration management with layered configuration (file, env)
// Credentials are never compiled in; production values come from APP__* variables.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::path::Path;
use std::time::Duration;

/// Main settings structure containing all configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Database name
    pub name: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
    #[serde(default = "default_query_timeout")]
    pub query_timeout_seconds: u64,
}

fn default_port() -> u16 {
    5432
}

fn default_query_timeout() -> u64 {
    30
}

impl DatabaseConfig {
    /// Connection options for sqlx, built from discrete fields so the
    /// password never has to be URL-encoded into a connection string
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub metrics_port: Option<u16>,
    pub tracing_endpoint: Option<String>,
}

impl Settings {
    /// Load configuration with layered precedence: defaults → file → env
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let defaults = Settings::default();

        let builder = Config::builder()
            // Built-in defaults so a partial file is enough
            .set_default("database.host", defaults.database.host)?
            .set_default("database.port", defaults.database.port as i64)?
            .set_default("database.name", defaults.database.name)?
            .set_default("database.user", defaults.database.user)?
            .set_default("database.password", defaults.database.password)?
            .set_default(
                "database.max_connections",
                defaults.database.max_connections as i64,
            )?
            .set_default(
                "database.min_connections",
                defaults.database.min_connections as i64,
            )?
            .set_default(
                "database.connect_timeout_seconds",
                defaults.database.connect_timeout_seconds as i64,
            )?
            .set_default(
                "database.query_timeout_seconds",
                defaults.database.query_timeout_seconds as i64,
            )?
            .set_default("observability.log_level", defaults.observability.log_level)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add local configuration (not committed to git)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        if self.database.host.is_empty() {
            return Err("Database host cannot be empty".to_string());
        }
        if self.database.name.is_empty() {
            return Err("Database name cannot be empty".to_string());
        }
        if self.database.user.is_empty() {
            return Err("Database user cannot be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(
                "Database min_connections cannot exceed max_connections".to_string(),
            );
        }
        if self.database.query_timeout_seconds == 0 {
            return Err("Database query_timeout_seconds must be greater than 0".to_string());
        }

        if matches!(self.observability.metrics_port, Some(0)) {
            return Err("Metrics port must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 5432,
                name: "lightbnb".to_string(),
                user: "lightbnb".to_string(),
                password: String::new(),
                max_connections: 10,
                min_connections: 1,
                connect_timeout_seconds: 30,
                query_timeout_seconds: 30,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                metrics_port: None,
                tracing_endpoint: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_catches_empty_database_name() {
        let mut settings = Settings::default();
        settings.database.name = String::new();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_catches_inverted_pool_bounds() {
        let mut settings = Settings::default();
        settings.database.min_connections = 20;
        settings.database.max_connections = 5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_catches_zero_query_timeout() {
        let mut settings = Settings::default();
        settings.database.query_timeout_seconds = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_password_is_not_serialized() {
        let mut settings = Settings::default();
        settings.database.password = "s3cret".to_string();
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("s3cret"));
    }

    #[test]
    fn test_query_timeout_duration() {
        let settings = Settings::default();
        assert_eq!(settings.database.query_timeout(), Duration::from_secs(30));
    }
}
