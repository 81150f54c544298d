//! Demo data seeding
//!
//! Inserts one match and both squads when the store is empty, so a fresh
//! deployment has a "current match" to serve.

use crate::error::Result;
use crate::storage::Repositories;
use crate::types::{Match, Player};
use chrono::{TimeZone, Utc};
use tracing::info;

/// Home team of the demo match
pub const HOME_TEAM: &str = "Blue FC";

/// Away team of the demo match
pub const AWAY_TEAM: &str = "Red United";

/// The demo match record
pub fn demo_match() -> Match {
    Match {
        id: 1,
        date: Utc
            .with_ymd_and_hms(2025, 9, 14, 18, 0, 0)
            .single()
            .unwrap_or_else(Utc::now),
        home_team: HOME_TEAM.to_string(),
        away_team: AWAY_TEAM.to_string(),
        home_score: 0,
        away_score: 0,
    }
}

/// The demo squads, with fresh stats
pub fn demo_players() -> Vec<Player> {
    let squad: [(&str, &str, &str); 8] = [
        ("Liam Walsh", HOME_TEAM, "GK"),
        ("Noah Bennett", HOME_TEAM, "DF"),
        ("Ethan Cole", HOME_TEAM, "MF"),
        ("Lucas Moreau", HOME_TEAM, "FW"),
        ("Mateo Silva", AWAY_TEAM, "GK"),
        ("Jonas Keller", AWAY_TEAM, "DF"),
        ("Rafael Costa", AWAY_TEAM, "MF"),
        ("Karim Haddad", AWAY_TEAM, "FW"),
    ];

    squad
        .iter()
        .zip(1..)
        .map(|((name, team, position), id)| {
            Player::new(id, *name, *team, Some(position.to_string()))
        })
        .collect()
}

/// Seed the demo match and players if no match and no player exist yet.
///
/// Returns whether anything was written.
pub fn seed_if_empty(repos: &Repositories) -> Result<bool> {
    if repos.matches.current_match()?.is_some() || !repos.players.list_players()?.is_empty() {
        info!("Store already contains match data, skipping seed");
        return Ok(false);
    }

    let record = demo_match();
    info!(
        "Seeding demo match {} vs {}",
        record.home_team, record.away_team
    );
    repos.matches.save_match(record)?;

    let players = demo_players();
    let count = players.len();
    for player in players {
        repos.players.save_player(player)?;
    }
    info!("Seeded {} players", count);

    Ok(true)
}
