//! Event-driven player stat updates
//!
//! After an event is stored, the updater decides which player records it
//! affects, bumps their goals or assists, recomputes the form rating and
//! saves each player independently.

use crate::error::{MatchAnalyticsError, Result};
use crate::storage::PlayerRepository;
use crate::types::{Event, EventKind, EventMeta, PlayerId, ASSIST_ID_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Which counter an event incremented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Goals,
    Assists,
}

impl StatKind {
    pub fn as_label(&self) -> &'static str {
        match self {
            StatKind::Goals => "goals",
            StatKind::Assists => "assists",
        }
    }
}

/// One saved player update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatChange {
    pub player_id: PlayerId,
    pub stat: StatKind,
    pub old_rating: f64,
    pub new_rating: f64,
}

/// Read the optional assisting player from event metadata.
///
/// Absent or `null` means no assist. Integers and strings holding a base-10
/// integer are accepted; anything else is malformed.
pub fn parse_assist_id(meta: &EventMeta) -> Result<Option<PlayerId>> {
    let value = match meta.get(ASSIST_ID_KEY) {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    let parsed = match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.parse::<PlayerId>().ok(),
        _ => None,
    };

    match parsed {
        Some(id) => Ok(Some(id)),
        None => Err(MatchAnalyticsError::MalformedMetadata {
            key: ASSIST_ID_KEY.to_string(),
            value: value.to_string(),
        }
        .into()),
    }
}

/// Applies stored events to player statistics
pub struct StatUpdater {
    players: Arc<dyn PlayerRepository>,
}

impl StatUpdater {
    pub fn new(players: Arc<dyn PlayerRepository>) -> Self {
        Self { players }
    }

    /// Update the players affected by a persisted event.
    ///
    /// Returns one entry per player saved: none for unrelated event types or
    /// unknown players, up to two for a goal with an assist. The saves are
    /// independent; a failure on the second leaves the first in place.
    pub fn update_stats_for(&self, event: &Event) -> Result<Vec<StatChange>> {
        let mut changes = Vec::new();

        match event.event_kind() {
            EventKind::Goal => {
                if let Some(change) = self.apply(event.player_id, StatKind::Goals)? {
                    changes.push(change);
                }

                if let Some(assist_id) = parse_assist_id(&event.meta)? {
                    if let Some(change) = self.apply(assist_id, StatKind::Assists)? {
                        changes.push(change);
                    }
                }
            }
            EventKind::Assist => {
                if let Some(change) = self.apply(event.player_id, StatKind::Assists)? {
                    changes.push(change);
                }
            }
            EventKind::Other => {
                debug!(
                    "Event {} of type '{}' does not affect player stats",
                    event.id, event.kind
                );
            }
        }

        Ok(changes)
    }

    fn apply(&self, player_id: PlayerId, stat: StatKind) -> Result<Option<StatChange>> {
        let Some(mut player) = self.players.get_player(player_id)? else {
            debug!(
                "Player {} not found, skipping {} update",
                player_id,
                stat.as_label()
            );
            return Ok(None);
        };

        let old_rating = player.form_rating;
        match stat {
            StatKind::Goals => player.record_goal(),
            StatKind::Assists => player.record_assist(),
        }
        let new_rating = player.form_rating;

        info!(
            "Player {} ({}) {} -> goals: {}, assists: {}, rating: {:.1} -> {:.1}",
            player.id,
            player.name,
            stat.as_label(),
            player.goals,
            player.assists,
            old_rating,
            new_rating
        );

        self.players.save_player(player)?;

        Ok(Some(StatChange {
            player_id,
            stat,
            old_rating,
            new_rating,
        }))
    }
}
