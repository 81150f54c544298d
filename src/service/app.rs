//! Main application state and service composition
//!
//! Every component is wired explicitly here: the repositories, the stat
//! updater that shares the player repository, and the metrics collector.
//! Request handlers receive an `Arc<AppState>` and nothing else.

use crate::config::AppConfig;
use crate::metrics::MetricsCollector;
use crate::seed::seed_if_empty;
use crate::stats::StatUpdater;
use crate::storage::{EventRepository, MatchRepository, PlayerRepository, Repositories};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Storage initialization error: {message}")]
    Storage { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("HTTP server error: {message}")]
    Server { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Storage handles
    repos: Repositories,

    /// Applies stored events to player statistics
    stat_updater: StatUpdater,

    /// Metrics for monitoring and health checks
    metrics: Arc<MetricsCollector>,

    /// When the state was created
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Initialize the application with the storage backend from configuration
    pub fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!(
            "Initializing {} with {} storage",
            config.service.name, config.storage.backend
        );

        let repos = Repositories::open(&config.storage).map_err(|e| ServiceError::Storage {
            message: format!("{:#}", e),
        })?;

        if config.storage.seed_demo_data {
            seed_if_empty(&repos).map_err(|e| ServiceError::Storage {
                message: format!("Failed to seed demo data: {:#}", e),
            })?;
        }

        Self::with_repositories(config, repos)
    }

    /// Build the state around existing repositories. No seeding is performed.
    pub fn with_repositories(
        config: AppConfig,
        repos: Repositories,
    ) -> Result<Self, ServiceError> {
        let metrics = MetricsCollector::new().map_err(|e| ServiceError::Initialization {
            message: format!("Failed to create metrics collector: {}", e),
        })?;

        let stat_updater = StatUpdater::new(repos.players.clone());

        Ok(Self {
            config,
            repos,
            stat_updater,
            metrics: Arc::new(metrics),
            started_at: Utc::now(),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Match repository
    pub fn matches(&self) -> &dyn MatchRepository {
        self.repos.matches.as_ref()
    }

    /// Player repository
    pub fn players(&self) -> &dyn PlayerRepository {
        self.repos.players.as_ref()
    }

    /// Event repository
    pub fn events(&self) -> &dyn EventRepository {
        self.repos.events.as_ref()
    }

    /// Stat updater
    pub fn stat_updater(&self) -> &StatUpdater {
        &self.stat_updater
    }

    /// Metrics collector
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Time since the state was created, formatted for humans
    pub fn uptime_info(&self) -> String {
        let uptime = Utc::now() - self.started_at;
        format!(
            "up {}h {}m {}s",
            uptime.num_hours(),
            uptime.num_minutes() % 60,
            uptime.num_seconds() % 60
        )
    }
}
