//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! match-analytics service, including environment variable loading, TOML
//! file loading and validation.

use crate::error::MatchAnalyticsError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

fn config_error(message: impl Into<String>) -> anyhow::Error {
    MatchAnalyticsError::ConfigurationError {
        message: message.into(),
    }
    .into()
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub http: HttpSettings,
    pub storage: StorageSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Interface to bind to
    pub host: String,
    /// Port for the REST API, health and metrics endpoints
    pub port: u16,
}

/// Which storage implementation backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(config_error(format!("Unknown storage backend: {}", other))),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// SQLite database file, used by the sqlite backend
    pub database_path: PathBuf,
    /// Seed one demo match and its squads when the store is empty
    pub seed_demo_data: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "match-analytics".to_string(),
            log_level: "info".to_string(),
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            database_path: PathBuf::from("data/match-analytics.db"),
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still take precedence
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse configuration from TOML text. Missing fields use defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| config_error(format!("Failed to parse configuration: {}", e)))
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            self.service.shutdown_timeout_seconds = timeout.parse().map_err(|_| {
                config_error(format!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))
            })?;
        }

        // HTTP settings
        if let Ok(host) = env::var("HTTP_HOST") {
            self.http.host = host;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            self.http.port = port
                .parse()
                .map_err(|_| config_error(format!("Invalid HTTP_PORT value: {}", port)))?;
        }

        // Storage settings
        if let Ok(backend) = env::var("STORAGE_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Ok(path) = env::var("DATABASE_PATH") {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Ok(seed) = env::var("SEED_DEMO_DATA") {
            self.storage.seed_demo_data = seed
                .parse()
                .map_err(|_| config_error(format!("Invalid SEED_DEMO_DATA value: {}", seed)))?;
        }

        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Address string for the HTTP listener
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => {
            return Err(config_error(format!(
                "Invalid log level: {}",
                config.service.log_level
            )))
        }
    }

    if config.service.name.is_empty() {
        return Err(config_error("Service name cannot be empty"));
    }
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(config_error("Shutdown timeout must be greater than 0"));
    }

    if config.http.host.is_empty() {
        return Err(config_error("HTTP host cannot be empty"));
    }
    if config.http.port == 0 {
        return Err(config_error("HTTP port cannot be 0"));
    }

    if config.storage.backend == StorageBackend::Sqlite
        && config.storage.database_path.as_os_str().is_empty()
    {
        return Err(config_error(
            "Database path cannot be empty for the sqlite backend",
        ));
    }

    Ok(())
}
