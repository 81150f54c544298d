//! In-memory storage implementations
//!
//! `InMemoryStore` backs all three repositories with ordered maps.
//! `MockPlayerRepository` records every save so tests can assert exactly
//! which players were touched, and can be switched into a failing mode.

use super::{EventRepository, MatchRepository, PlayerRepository};
use crate::error::{MatchAnalyticsError, Result};
use crate::types::{Event, EventId, Match, MatchId, NewEvent, Player, PlayerId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

fn lock_failure(what: &str) -> MatchAnalyticsError {
    MatchAnalyticsError::StorageFailure {
        message: format!("Failed to acquire {} lock", what),
    }
}

/// In-memory store for matches, players and events
#[derive(Debug, Default)]
pub struct InMemoryStore {
    matches: RwLock<BTreeMap<MatchId, Match>>,
    players: RwLock<BTreeMap<PlayerId, Player>>,
    events: RwLock<BTreeMap<EventId, Event>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchRepository for InMemoryStore {
    fn get_match(&self, id: MatchId) -> Result<Option<Match>> {
        let matches = self.matches.read().map_err(|_| lock_failure("matches read"))?;
        Ok(matches.get(&id).cloned())
    }

    fn save_match(&self, record: Match) -> Result<()> {
        let mut matches = self
            .matches
            .write()
            .map_err(|_| lock_failure("matches write"))?;
        matches.insert(record.id, record);
        Ok(())
    }

    fn list_matches(&self) -> Result<Vec<Match>> {
        let matches = self.matches.read().map_err(|_| lock_failure("matches read"))?;
        Ok(matches.values().cloned().collect())
    }
}

impl PlayerRepository for InMemoryStore {
    fn get_player(&self, id: PlayerId) -> Result<Option<Player>> {
        let players = self.players.read().map_err(|_| lock_failure("players read"))?;
        Ok(players.get(&id).cloned())
    }

    fn save_player(&self, player: Player) -> Result<()> {
        let mut players = self
            .players
            .write()
            .map_err(|_| lock_failure("players write"))?;
        players.insert(player.id, player);
        Ok(())
    }

    fn list_players(&self) -> Result<Vec<Player>> {
        let players = self.players.read().map_err(|_| lock_failure("players read"))?;
        Ok(players.values().cloned().collect())
    }
}

impl EventRepository for InMemoryStore {
    fn get_event(&self, id: EventId) -> Result<Option<Event>> {
        let events = self.events.read().map_err(|_| lock_failure("events read"))?;
        Ok(events.get(&id).cloned())
    }

    fn save_event(&self, event: NewEvent) -> Result<Event> {
        let mut events = self
            .events
            .write()
            .map_err(|_| lock_failure("events write"))?;

        // Events are never deleted, so the next id always follows the last one
        let id = events.keys().next_back().map_or(1, |last| last + 1);
        let event = event.into_event(id);
        events.insert(id, event.clone());

        Ok(event)
    }

    fn list_events(&self) -> Result<Vec<Event>> {
        let events = self.events.read().map_err(|_| lock_failure("events read"))?;
        Ok(events.values().cloned().collect())
    }
}

/// Mock player repository for testing
#[derive(Debug, Default)]
pub struct MockPlayerRepository {
    players: RwLock<BTreeMap<PlayerId, Player>>,
    save_calls: RwLock<Vec<Player>>,
    fail_saves: AtomicBool,
}

impl MockPlayerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock preloaded with the given players
    pub fn with_players(players: Vec<Player>) -> Self {
        let mock = Self::new();
        if let Ok(mut stored) = mock.players.write() {
            for player in players {
                stored.insert(player.id, player);
            }
        }
        mock
    }

    /// Get all save calls made (for testing)
    pub fn get_save_calls(&self) -> Vec<Player> {
        self.save_calls
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Clear save calls (for testing)
    pub fn clear_save_calls(&self) {
        if let Ok(mut calls) = self.save_calls.write() {
            calls.clear();
        }
    }

    /// Make every subsequent save fail with a storage error
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl PlayerRepository for MockPlayerRepository {
    fn get_player(&self, id: PlayerId) -> Result<Option<Player>> {
        let players = self.players.read().map_err(|_| lock_failure("players read"))?;
        Ok(players.get(&id).cloned())
    }

    fn save_player(&self, player: Player) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(MatchAnalyticsError::StorageFailure {
                message: format!("Simulated failure saving player {}", player.id),
            }
            .into());
        }

        // Record the call for testing
        if let Ok(mut calls) = self.save_calls.write() {
            calls.push(player.clone());
        }

        let mut players = self
            .players
            .write()
            .map_err(|_| lock_failure("players write"))?;
        players.insert(player.id, player);
        Ok(())
    }

    fn list_players(&self) -> Result<Vec<Player>> {
        let players = self.players.read().map_err(|_| lock_failure("players read"))?;
        Ok(players.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn create_test_match(id: MatchId) -> Match {
        Match {
            id,
            date: Utc.with_ymd_and_hms(2025, 9, 14, 18, 0, 0).unwrap(),
            home_team: "Blue FC".to_string(),
            away_team: "Red United".to_string(),
            home_score: 2,
            away_score: 1,
        }
    }

    #[test]
    fn test_player_basic_operations() {
        let store = InMemoryStore::new();

        // Initially no player
        assert!(store.get_player(1).unwrap().is_none());

        store
            .save_player(Player::new(1, "Alex", "Blue FC", None))
            .unwrap();

        let retrieved = store.get_player(1).unwrap().unwrap();
        assert_eq!(retrieved.name, "Alex");
        assert_eq!(retrieved.form_rating, 6.0);
    }

    #[test]
    fn test_save_player_replaces_existing() {
        let store = InMemoryStore::new();
        let mut player = Player::new(1, "Alex", "Blue FC", None);
        store.save_player(player.clone()).unwrap();

        player.record_goal();
        store.save_player(player).unwrap();

        let players = store.list_players().unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].goals, 1);
    }

    #[test]
    fn test_list_players_in_id_order() {
        let store = InMemoryStore::new();
        store.save_player(Player::new(3, "C", "Red United", None)).unwrap();
        store.save_player(Player::new(1, "A", "Blue FC", None)).unwrap();
        store.save_player(Player::new(2, "B", "Blue FC", None)).unwrap();

        let ids: Vec<PlayerId> = store.list_players().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_event_ids_are_assigned_sequentially() {
        let store = InMemoryStore::new();

        let first = store.save_event(NewEvent::new(10, "GOAL", 1)).unwrap();
        let second = store.save_event(NewEvent::new(20, "ASSIST", 2)).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.get_event(2).unwrap().unwrap().kind, "ASSIST");
        assert_eq!(store.list_events().unwrap().len(), 2);
    }

    #[test]
    fn test_current_match_is_lowest_id() {
        let store = InMemoryStore::new();
        assert!(store.current_match().unwrap().is_none());

        store.save_match(create_test_match(5)).unwrap();
        store.save_match(create_test_match(2)).unwrap();

        assert_eq!(store.current_match().unwrap().unwrap().id, 2);
        assert!(store.get_match(5).unwrap().is_some());
    }

    #[test]
    fn test_mock_repository_records_saves() {
        let repo =
            MockPlayerRepository::with_players(vec![Player::new(1, "Alex", "Blue FC", None)]);
        assert!(repo.get_player(1).unwrap().is_some());
        assert!(repo.get_save_calls().is_empty());

        repo.save_player(Player::new(2, "Sam", "Red United", None))
            .unwrap();

        let calls = repo.get_save_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, 2);

        repo.clear_save_calls();
        assert!(repo.get_save_calls().is_empty());
    }

    #[test]
    fn test_mock_repository_failing_saves() {
        let repo = MockPlayerRepository::new();
        repo.set_fail_saves(true);

        let result = repo.save_player(Player::new(1, "Alex", "Blue FC", None));
        assert!(result.is_err());
        assert!(repo.get_player(1).unwrap().is_none());
        assert!(repo.get_save_calls().is_empty());
    }
}
