//! Common types used throughout the match analytics service

use crate::rating::recalc_rating;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Unique identifier for matches
pub type MatchId = i64;

/// Unique identifier for players
pub type PlayerId = i64;

/// Unique identifier for events, assigned by storage
pub type EventId = i64;

/// Free-form key-value attachment on an event
pub type EventMeta = serde_json::Map<String, serde_json::Value>;

/// Metadata key naming the assisting player on a goal
pub const ASSIST_ID_KEY: &str = "assistId";

/// An explicit `null` metadata object reads the same as an absent one
fn meta_or_empty<'de, D>(deserializer: D) -> Result<EventMeta, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<EventMeta>::deserialize(deserializer)?.unwrap_or_default())
}

/// A football match. Seeded once and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub date: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
}

/// A player with persisted match statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team: String,
    pub position: Option<String>,
    pub goals: u32,
    pub assists: u32,
    pub form_rating: f64,
}

impl Player {
    /// Create a player with no recorded goals or assists
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        team: impl Into<String>,
        position: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            team: team.into(),
            position,
            goals: 0,
            assists: 0,
            form_rating: recalc_rating(0, 0),
        }
    }

    /// Recompute the form rating from the current goals and assists
    pub fn recalc_rating(&mut self) {
        self.form_rating = recalc_rating(self.goals, self.assists);
    }

    /// Record one goal and refresh the rating
    pub fn record_goal(&mut self) {
        self.goals += 1;
        self.recalc_rating();
    }

    /// Record one assist and refresh the rating
    pub fn record_assist(&mut self) {
        self.assists += 1;
        self.recalc_rating();
    }
}

/// An event as submitted by a client.
///
/// There is no `id` field: identifiers are assigned by storage, and any `id`
/// present in the request body is dropped during deserialization. A missing
/// `minute` reads as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[serde(default)]
    pub minute: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub player_id: PlayerId,
    #[serde(default, deserialize_with = "meta_or_empty")]
    pub meta: EventMeta,
}

impl NewEvent {
    pub fn new(minute: i32, kind: impl Into<String>, player_id: PlayerId) -> Self {
        Self {
            minute,
            kind: kind.into(),
            player_id,
            meta: EventMeta::new(),
        }
    }

    /// Attach an assisting player to the event metadata
    pub fn with_assist(mut self, assist_id: PlayerId) -> Self {
        self.meta
            .insert(ASSIST_ID_KEY.to_string(), serde_json::Value::from(assist_id));
        self
    }

    /// Attach an arbitrary metadata entry
    pub fn with_meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    /// Turn the submission into a persisted event with the given identifier
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            minute: self.minute,
            kind: self.kind,
            player_id: self.player_id,
            meta: self.meta,
        }
    }
}

/// A persisted, append-only match event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    #[serde(default)]
    pub minute: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub player_id: PlayerId,
    #[serde(default, deserialize_with = "meta_or_empty")]
    pub meta: EventMeta,
}

impl Event {
    /// Classify the free-text type of this event
    pub fn event_kind(&self) -> EventKind {
        EventKind::classify(&self.kind)
    }
}

/// Stat-relevant classification of an event type string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Goal,
    Assist,
    Other,
}

impl EventKind {
    /// Case-insensitive match on the raw type string. Unknown values are `Other`.
    pub fn classify(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("GOAL") {
            EventKind::Goal
        } else if raw.eq_ignore_ascii_case("ASSIST") {
            EventKind::Assist
        } else {
            EventKind::Other
        }
    }

    /// Label used for metrics and logs
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::Goal => "goal",
            EventKind::Assist => "assist",
            EventKind::Other => "other",
        }
    }
}

/// Combined response for the current match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBundle {
    #[serde(rename = "match")]
    pub current_match: Option<Match>,
    pub players: Vec<Player>,
    pub events: Vec<Event>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_kind_is_case_insensitive() {
        assert_eq!(EventKind::classify("GOAL"), EventKind::Goal);
        assert_eq!(EventKind::classify("goal"), EventKind::Goal);
        assert_eq!(EventKind::classify("Assist"), EventKind::Assist);
        assert_eq!(EventKind::classify("CARD"), EventKind::Other);
        assert_eq!(EventKind::classify(" GOAL"), EventKind::Other);
        assert_eq!(EventKind::classify(""), EventKind::Other);
    }

    #[test]
    fn test_new_player_has_base_rating() {
        let player = Player::new(1, "Alex", "Blue FC", Some("FW".to_string()));
        assert_eq!(player.goals, 0);
        assert_eq!(player.assists, 0);
        assert_eq!(player.form_rating, 6.0);
    }

    #[test]
    fn test_record_goal_and_assist_refresh_rating() {
        let mut player = Player::new(1, "Alex", "Blue FC", None);
        player.record_goal();
        assert_eq!(player.goals, 1);
        assert_eq!(player.form_rating, 7.0);

        player.record_assist();
        assert_eq!(player.assists, 1);
        assert_eq!(player.form_rating, 7.5);
    }

    #[test]
    fn test_new_event_ignores_client_id() {
        let body = json!({
            "id": 999,
            "minute": 12,
            "type": "GOAL",
            "playerId": 3,
            "meta": { "assistId": 4 }
        });

        let new_event: NewEvent = serde_json::from_value(body).unwrap();
        assert_eq!(new_event.minute, 12);
        assert_eq!(new_event.kind, "GOAL");
        assert_eq!(new_event.player_id, 3);

        let event = new_event.into_event(1);
        assert_eq!(event.id, 1);
        assert_eq!(event.meta[ASSIST_ID_KEY], json!(4));
    }

    #[test]
    fn test_new_event_meta_defaults_to_empty() {
        let body = json!({ "minute": 5, "type": "SHOT", "playerId": 2 });
        let new_event: NewEvent = serde_json::from_value(body).unwrap();
        assert!(new_event.meta.is_empty());
    }

    #[test]
    fn test_new_event_null_meta_and_missing_minute() {
        let body = json!({ "type": "GOAL", "playerId": 2, "meta": null });
        let new_event: NewEvent = serde_json::from_value(body).unwrap();
        assert_eq!(new_event.minute, 0);
        assert!(new_event.meta.is_empty());

        let stored = json!({ "id": 4, "minute": 9, "type": "CARD", "playerId": 2, "meta": null });
        let event: Event = serde_json::from_value(stored).unwrap();
        assert!(event.meta.is_empty());
    }

    #[test]
    fn test_new_event_rejects_non_object_meta() {
        let body = json!({ "minute": 1, "type": "GOAL", "playerId": 2, "meta": [1, 2] });
        assert!(serde_json::from_value::<NewEvent>(body).is_err());
    }

    #[test]
    fn test_player_serializes_camel_case() {
        let player = Player::new(7, "Sam", "Red United", None);
        let value = serde_json::to_value(&player).unwrap();
        assert_eq!(value["formRating"], json!(6.0));
        assert!(value.get("form_rating").is_none());
    }

    #[test]
    fn test_bundle_uses_match_key() {
        let bundle = MatchBundle {
            current_match: None,
            players: vec![],
            events: vec![],
        };
        let value = serde_json::to_value(&bundle).unwrap();
        assert_eq!(value["match"], serde_json::Value::Null);
        assert_eq!(value["players"], json!([]));
    }
}
