//! Form rating calculation
//!
//! A player's form rating is a linear function of goals and assists,
//! clamped to a fixed range. It has no dependency on storage so it can be
//! used and tested in isolation.

/// Rating of a player with no goals and no assists
pub const BASE_RATING: f64 = 6.0;

/// Rating added per goal
pub const GOAL_WEIGHT: f64 = 1.0;

/// Rating added per assist
pub const ASSIST_WEIGHT: f64 = 0.5;

/// Lowest rating a player can have
pub const MIN_RATING: f64 = 4.0;

/// Highest rating a player can have
pub const MAX_RATING: f64 = 10.0;

/// Unclamped rating for the given totals
pub fn raw_rating(goals: u32, assists: u32) -> f64 {
    BASE_RATING + GOAL_WEIGHT * f64::from(goals) + ASSIST_WEIGHT * f64::from(assists)
}

/// Recalculate a form rating from goals and assists.
///
/// Deterministic and total: every input maps to a value in
/// [`MIN_RATING`, `MAX_RATING`].
pub fn recalc_rating(goals: u32, assists: u32) -> f64 {
    raw_rating(goals, assists).clamp(MIN_RATING, MAX_RATING)
}

/// Whether the rating for these totals hit the upper bound
pub fn is_capped(goals: u32, assists: u32) -> bool {
    raw_rating(goals, assists) > MAX_RATING
}
