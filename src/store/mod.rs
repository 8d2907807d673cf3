//! SQLite persistence: users, predictions, lock status, results and cached scores.
//!
//! One connection behind an async mutex. Handlers lock it for the duration of
//! their statements; every write is a single statement or a transaction.

pub mod predictions;
pub mod results;
pub mod scores;
pub mod users;

use rusqlite::Connection;
use std::path::Path;
use tokio::sync::{Mutex, MutexGuard};

pub use predictions::StoredBracket;
pub use users::UserSummary;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS user (
    id BLOB PRIMARY KEY,
    username TEXT NOT NULL UNIQUE COLLATE NOCASE,
    name TEXT NOT NULL,
    is_admin INTEGER NOT NULL DEFAULT 0,
    secret_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS user_prediction (
    user_id BLOB NOT NULL REFERENCES user(id) ON DELETE CASCADE,
    game_id TEXT NOT NULL,
    predicted_winner_id TEXT NOT NULL,
    PRIMARY KEY (user_id, game_id)
);
CREATE TABLE IF NOT EXISTS user_bracket_status (
    user_id BLOB PRIMARY KEY REFERENCES user(id) ON DELETE CASCADE,
    is_locked INTEGER NOT NULL DEFAULT 0,
    locked_at TEXT
);
CREATE TABLE IF NOT EXISTS user_score (
    user_id BLOB PRIMARY KEY REFERENCES user(id) ON DELETE CASCADE,
    round1_score INTEGER NOT NULL,
    round2_score INTEGER NOT NULL,
    round3_score INTEGER NOT NULL,
    round4_score INTEGER NOT NULL,
    total_score INTEGER NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS game_result (
    game_id TEXT PRIMARY KEY,
    winner_id TEXT NOT NULL,
    recorded_at TEXT NOT NULL
);
";

/// Errors from store operations.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// The bracket is locked (save attempted, or lost a lock race).
    AlreadyLocked,
    /// Locking needs every game picked.
    IncompletePicks(usize),
    /// Username already in use (case-insensitive).
    UsernameTaken(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Sqlite(e) => write!(f, "database error: {}", e),
            StoreError::AlreadyLocked => write!(f, "Bracket is already locked"),
            StoreError::IncompletePicks(n) => write!(
                f,
                "All {} games must be picked before locking (picked {})",
                crate::models::TOTAL_GAMES,
                n
            ),
            StoreError::UsernameTaken(name) => write!(f, "Username {} is already taken", name),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sqlite(e)
    }
}

/// Shared handle to the database.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    /// Fresh in-memory database (tests, demos).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Exclusive access to the connection for one unit of work.
    pub async fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}
