//! Player form rating
//!
//! This module provides the bounded goals/assists rating used for every
//! player record.

pub mod calculator;

// Re-export commonly used items
pub use calculator::{recalc_rating, MAX_RATING, MIN_RATING};
