//! Health checks
//!
//! This module provides health check functionality for the match-analytics
//! service: a storage probe and a check that a current match exists.

use crate::service::app::AppState;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Numeric form used by the health gauge
    pub fn as_gauge(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 2,
            HealthStatus::Degraded => 1,
            HealthStatus::Unhealthy => 0,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Detailed component checks
    pub checks: Vec<ComponentCheck>,
    /// Service statistics
    pub stats: ServiceStats,
}

/// Individual component health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional error message if not healthy
    pub message: Option<String>,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Service statistics for health reporting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceStats {
    pub players: usize,
    pub events: usize,
    pub uptime_info: String,
}

impl HealthCheck {
    /// Perform a health check of the service
    pub fn check(app_state: &AppState) -> Self {
        let mut checks = Vec::new();

        let storage_check = Self::check_storage(app_state);
        let current_match_check = Self::check_current_match(app_state);

        let status = if storage_check.status == HealthStatus::Unhealthy {
            HealthStatus::Unhealthy
        } else if current_match_check.status != HealthStatus::Healthy {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        let metrics = app_state.metrics();
        metrics.update_component_health(
            &storage_check.name,
            storage_check.status == HealthStatus::Healthy,
        );
        metrics.update_component_health(
            &current_match_check.name,
            current_match_check.status == HealthStatus::Healthy,
        );
        metrics.update_health_status(status.as_gauge());

        checks.push(storage_check);
        checks.push(current_match_check);

        HealthCheck {
            status,
            service: app_state.config().service.name.clone(),
            version: crate::VERSION.to_string(),
            timestamp: chrono::Utc::now(),
            checks,
            stats: Self::gather_service_stats(app_state),
        }
    }

    /// Check that every repository answers a list query
    fn check_storage(app_state: &AppState) -> ComponentCheck {
        let start = std::time::Instant::now();

        let probe = app_state
            .matches()
            .list_matches()
            .and_then(|_| app_state.players().list_players())
            .and_then(|_| app_state.events().list_events());

        let (status, message) = match probe {
            Ok(_) => (HealthStatus::Healthy, None),
            Err(e) => {
                error!("Storage health check failed: {:#}", e);
                (
                    HealthStatus::Unhealthy,
                    Some(format!("Storage unavailable: {}", e)),
                )
            }
        };

        ComponentCheck {
            name: "storage".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// A missing current match leaves the API usable but the bundle empty
    fn check_current_match(app_state: &AppState) -> ComponentCheck {
        let start = std::time::Instant::now();

        let (status, message) = match app_state.matches().current_match() {
            Ok(Some(_)) => (HealthStatus::Healthy, None),
            Ok(None) => (
                HealthStatus::Degraded,
                Some("No match has been seeded".to_string()),
            ),
            Err(e) => (HealthStatus::Unhealthy, Some(e.to_string())),
        };

        ComponentCheck {
            name: "current_match".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Gather current service statistics
    fn gather_service_stats(app_state: &AppState) -> ServiceStats {
        let players = app_state.players().list_players().map(|p| p.len());
        let events = app_state.events().list_events().map(|e| e.len());

        match (players, events) {
            (Ok(players), Ok(events)) => ServiceStats {
                players,
                events,
                uptime_info: app_state.uptime_info(),
            },
            _ => {
                debug!("Failed to gather stats for health check");
                ServiceStats {
                    uptime_info: app_state.uptime_info(),
                    ..ServiceStats::default()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, StorageBackend};
    use crate::storage::Repositories;

    #[test]
    fn test_seeded_service_is_healthy() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        let state = AppState::new(config).unwrap();

        let health = HealthCheck::check(&state);
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.checks.len(), 2);
        assert_eq!(health.stats.players, 8);
        assert_eq!(health.stats.events, 0);
    }

    #[test]
    fn test_missing_match_is_degraded() {
        let state =
            AppState::with_repositories(AppConfig::default(), Repositories::in_memory()).unwrap();

        let health = HealthCheck::check(&state);
        assert_eq!(health.status, HealthStatus::Degraded);
        assert!(health.checks[1].message.is_some());
    }

    #[test]
    fn test_health_status_serializes_lowercase() {
        let value = serde_json::to_value(HealthStatus::Degraded).unwrap();
        assert_eq!(value, serde_json::json!("degraded"));
        assert_eq!(HealthStatus::Healthy.as_gauge(), 2);
    }
}
