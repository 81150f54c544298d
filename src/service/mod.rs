//! Service layer for the match-analytics service
//!
//! This module contains the main application state, health checks and the
//! HTTP server lifecycle.

pub mod app;
pub mod health;
pub mod server;

pub use app::{AppState, ServiceError};
pub use health::{HealthCheck, HealthStatus};
pub use server::{ApiServer, ServerConfig};
