//! Match Analytics - football match event tracking service
//!
//! This crate stores matches, players and events, and recomputes a player's
//! form rating whenever a goal or assist is recorded. A small REST API
//! serves the current match state to a front end.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod rating;
pub mod seed;
pub mod service;
pub mod stats;
pub mod storage;
pub mod types;

// Re-export commonly used types and traits
pub use error::{MatchAnalyticsError, Result};
pub use types::*;

// Re-export key components
pub use rating::recalc_rating;
pub use stats::StatUpdater;
pub use storage::{EventRepository, MatchRepository, PlayerRepository, Repositories};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
