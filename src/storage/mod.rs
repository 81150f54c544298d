//! Storage access for matches, players and events
//!
//! Each record type has its own repository trait with `get`, `save` and `list`
//! operations. Two backends implement all three: an in-memory store and a
//! SQLite store. Handlers and the stat updater only see the traits.

pub mod memory;
pub mod sqlite;

use crate::config::{StorageBackend, StorageSettings};
use crate::error::Result;
use crate::types::{Event, EventId, Match, MatchId, NewEvent, Player, PlayerId};
use std::sync::Arc;
use tracing::info;

pub use memory::{InMemoryStore, MockPlayerRepository};
pub use sqlite::SqliteStore;

/// Trait for match storage operations
pub trait MatchRepository: Send + Sync {
    /// Get a match by identifier
    fn get_match(&self, id: MatchId) -> Result<Option<Match>>;

    /// Insert or replace a match
    fn save_match(&self, record: Match) -> Result<()>;

    /// All matches in identifier order
    fn list_matches(&self) -> Result<Vec<Match>>;

    /// The match treated as "the current match": the one with the lowest identifier
    fn current_match(&self) -> Result<Option<Match>> {
        Ok(self.list_matches()?.into_iter().next())
    }
}

/// Trait for player storage operations
pub trait PlayerRepository: Send + Sync {
    /// Get a player by identifier
    fn get_player(&self, id: PlayerId) -> Result<Option<Player>>;

    /// Insert or replace a player
    fn save_player(&self, player: Player) -> Result<()>;

    /// All players in identifier order
    fn list_players(&self) -> Result<Vec<Player>>;
}

/// Trait for event storage operations
pub trait EventRepository: Send + Sync {
    /// Get an event by identifier
    fn get_event(&self, id: EventId) -> Result<Option<Event>>;

    /// Append an event, assigning the next identifier
    fn save_event(&self, event: NewEvent) -> Result<Event>;

    /// All events in identifier order
    fn list_events(&self) -> Result<Vec<Event>>;
}

/// Handles to the three repositories, usually backed by one store
#[derive(Clone)]
pub struct Repositories {
    pub matches: Arc<dyn MatchRepository>,
    pub players: Arc<dyn PlayerRepository>,
    pub events: Arc<dyn EventRepository>,
}

impl Repositories {
    /// Share one store across all three repository handles
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: MatchRepository + PlayerRepository + EventRepository + 'static,
    {
        Self {
            matches: store.clone(),
            players: store.clone(),
            events: store,
        }
    }

    /// Fresh in-memory repositories
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }

    /// Open the backend selected by configuration
    pub fn open(settings: &StorageSettings) -> Result<Self> {
        match settings.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
            StorageBackend::Sqlite => {
                info!(
                    "Using SQLite storage at {}",
                    settings.database_path.display()
                );
                let store = SqliteStore::open(&settings.database_path)?;
                Ok(Self::from_store(Arc::new(store)))
            }
        }
    }
}
