//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The HTTP and chat surfaces call store methods; they never execute SQL
//! directly and never read-then-write a balance themselves.

mod player;

use crate::error::{GameError, GameResult};
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};

/// The player ledger. Shared between the HTTP server and the chat poller
/// behind an `Arc`; every method takes `&self` and holds the connection lock
/// for exactly one logical operation.
pub struct PlayerStore {
    conn: Mutex<Connection>,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl PlayerStore {
    pub fn open(path: &str) -> GameResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        log::info!("player store opened at {path}");
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GameResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// File backing this store, if any.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Create the `players` table if it does not exist. Safe to call repeatedly.
    pub fn ensure_schema(&self) -> GameResult<()> {
        self.conn()?
            .execute_batch(include_str!("../../../migrations/001_players.sql"))?;
        Ok(())
    }

    fn conn(&self) -> GameResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| GameError::StoreUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_schema_is_idempotent() {
        let store = PlayerStore::in_memory().unwrap();
        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();
        assert_eq!(store.player_count().unwrap(), 0);
        assert!(store.path().is_none());
    }
}
