//! SQLite storage for matches, players and events

use super::{EventRepository, MatchRepository, PlayerRepository};
use crate::error::{MatchAnalyticsError, Result};
use crate::types::{Event, EventId, EventMeta, Match, MatchId, NewEvent, Player, PlayerId};
use anyhow::Context;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const MATCH_COLUMNS: &str = "id, date, home_team, away_team, home_score, away_score";
const PLAYER_COLUMNS: &str = "id, name, team, position, goals, assists, form_rating";
const EVENT_COLUMNS: &str = "id, minute, type, player_id, meta";

/// SQLite-backed store. A single connection is shared behind a mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        Self::with_connection(conn)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn()?.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS "match" (
                id INTEGER PRIMARY KEY,
                date TEXT NOT NULL,
                home_team TEXT NOT NULL,
                away_team TEXT NOT NULL,
                home_score INTEGER NOT NULL,
                away_score INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS "player" (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                team TEXT NOT NULL,
                position TEXT,
                goals INTEGER NOT NULL DEFAULT 0,
                assists INTEGER NOT NULL DEFAULT 0,
                form_rating REAL NOT NULL DEFAULT 6.0
            );

            CREATE TABLE IF NOT EXISTS "event" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                minute INTEGER NOT NULL,
                type TEXT NOT NULL,
                player_id INTEGER NOT NULL,
                meta TEXT NOT NULL DEFAULT '{}'
            );

            CREATE INDEX IF NOT EXISTS idx_event_player ON "event"(player_id);
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            MatchAnalyticsError::StorageFailure {
                message: "Failed to acquire database connection lock".to_string(),
            }
            .into()
        })
    }

    fn row_to_match(row: &rusqlite::Row) -> rusqlite::Result<Match> {
        let date_str: String = row.get(1)?;
        let date = DateTime::parse_from_rfc3339(&date_str)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?
            .with_timezone(&Utc);

        Ok(Match {
            id: row.get(0)?,
            date,
            home_team: row.get(2)?,
            away_team: row.get(3)?,
            home_score: row.get(4)?,
            away_score: row.get(5)?,
        })
    }

    fn row_to_player(row: &rusqlite::Row) -> rusqlite::Result<Player> {
        Ok(Player {
            id: row.get(0)?,
            name: row.get(1)?,
            team: row.get(2)?,
            position: row.get(3)?,
            goals: row.get(4)?,
            assists: row.get(5)?,
            form_rating: row.get(6)?,
        })
    }

    fn row_to_event(row: &rusqlite::Row) -> rusqlite::Result<Event> {
        let meta_json: String = row.get(4)?;
        let meta: EventMeta = serde_json::from_str(&meta_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

        Ok(Event {
            id: row.get(0)?,
            minute: row.get(1)?,
            kind: row.get(2)?,
            player_id: row.get(3)?,
            meta,
        })
    }
}

impl MatchRepository for SqliteStore {
    fn get_match(&self, id: MatchId) -> Result<Option<Match>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                &format!(r#"SELECT {} FROM "match" WHERE id = ?1"#, MATCH_COLUMNS),
                params![id],
                Self::row_to_match,
            )
            .optional()?;
        Ok(record)
    }

    fn save_match(&self, record: Match) -> Result<()> {
        self.conn()?.execute(
            r#"
            INSERT INTO "match" (id, date, home_team, away_team, home_score, away_score)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                date = excluded.date,
                home_team = excluded.home_team,
                away_team = excluded.away_team,
                home_score = excluded.home_score,
                away_score = excluded.away_score
            "#,
            params![
                record.id,
                record.date.to_rfc3339(),
                record.home_team,
                record.away_team,
                record.home_score,
                record.away_score,
            ],
        )?;
        Ok(())
    }

    fn list_matches(&self) -> Result<Vec<Match>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"SELECT {} FROM "match" ORDER BY id"#,
            MATCH_COLUMNS
        ))?;
        let matches = stmt
            .query_map([], Self::row_to_match)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(matches)
    }
}

impl PlayerRepository for SqliteStore {
    fn get_player(&self, id: PlayerId) -> Result<Option<Player>> {
        let conn = self.conn()?;
        let player = conn
            .query_row(
                &format!(r#"SELECT {} FROM "player" WHERE id = ?1"#, PLAYER_COLUMNS),
                params![id],
                Self::row_to_player,
            )
            .optional()?;
        Ok(player)
    }

    fn save_player(&self, player: Player) -> Result<()> {
        self.conn()?.execute(
            r#"
            INSERT INTO "player" (id, name, team, position, goals, assists, form_rating)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                team = excluded.team,
                position = excluded.position,
                goals = excluded.goals,
                assists = excluded.assists,
                form_rating = excluded.form_rating
            "#,
            params![
                player.id,
                player.name,
                player.team,
                player.position,
                player.goals,
                player.assists,
                player.form_rating,
            ],
        )?;
        Ok(())
    }

    fn list_players(&self) -> Result<Vec<Player>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"SELECT {} FROM "player" ORDER BY id"#,
            PLAYER_COLUMNS
        ))?;
        let players = stmt
            .query_map([], Self::row_to_player)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(players)
    }
}

impl EventRepository for SqliteStore {
    fn get_event(&self, id: EventId) -> Result<Option<Event>> {
        let conn = self.conn()?;
        let event = conn
            .query_row(
                &format!(r#"SELECT {} FROM "event" WHERE id = ?1"#, EVENT_COLUMNS),
                params![id],
                Self::row_to_event,
            )
            .optional()?;
        Ok(event)
    }

    fn save_event(&self, event: NewEvent) -> Result<Event> {
        let meta_json =
            serde_json::to_string(&event.meta).context("Failed to serialize event metadata")?;

        let conn = self.conn()?;
        conn.execute(
            r#"INSERT INTO "event" (minute, type, player_id, meta) VALUES (?1, ?2, ?3, ?4)"#,
            params![event.minute, event.kind, event.player_id, meta_json],
        )?;
        let id = conn.last_insert_rowid();

        Ok(event.into_event(id))
    }

    fn list_events(&self) -> Result<Vec<Event>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"SELECT {} FROM "event" ORDER BY id"#,
            EVENT_COLUMNS
        ))?;
        let events = stmt
            .query_map([], Self::row_to_event)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_player_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get_player(1).unwrap().is_none());

        let mut player = Player::new(1, "Alex", "Blue FC", Some("FW".to_string()));
        player.record_goal();
        store.save_player(player.clone()).unwrap();

        let retrieved = store.get_player(1).unwrap().unwrap();
        assert_eq!(retrieved, player);
    }

    #[test]
    fn test_save_player_updates_in_place() {
        let store = SqliteStore::in_memory().unwrap();
        let mut player = Player::new(4, "Sam", "Red United", None);
        store.save_player(player.clone()).unwrap();

        player.record_assist();
        store.save_player(player).unwrap();

        let players = store.list_players().unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].assists, 1);
        assert_eq!(players[0].form_rating, 6.5);
        assert_eq!(players[0].position, None);
    }

    #[test]
    fn test_event_ids_assigned_by_database() {
        let store = SqliteStore::in_memory().unwrap();

        let first = store
            .save_event(NewEvent::new(9, "GOAL", 1).with_assist(2))
            .unwrap();
        let second = store.save_event(NewEvent::new(30, "CARD", 3)).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let stored = store.get_event(first.id).unwrap().unwrap();
        assert_eq!(stored.meta["assistId"], json!(2));
        assert_eq!(store.list_events().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_match_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let record = Match {
            id: 1,
            date: Utc.with_ymd_and_hms(2025, 9, 14, 18, 0, 0).unwrap(),
            home_team: "Blue FC".to_string(),
            away_team: "Red United".to_string(),
            home_score: 0,
            away_score: 0,
        };
        store.save_match(record.clone()).unwrap();

        assert_eq!(store.current_match().unwrap(), Some(record.clone()));
        assert_eq!(store.get_match(1).unwrap(), Some(record));
        assert!(store.get_match(2).unwrap().is_none());
    }

    #[test]
    fn test_on_disk_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("analytics.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .save_player(Player::new(1, "Alex", "Blue FC", None))
                .unwrap();
            store.save_event(NewEvent::new(1, "GOAL", 1)).unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert!(reopened.get_player(1).unwrap().is_some());
        let next = reopened.save_event(NewEvent::new(2, "GOAL", 1)).unwrap();
        assert_eq!(next.id, 2);
    }
}
