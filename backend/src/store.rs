//! Session persistence
//!
//! [`SessionStore`] is the only way the session service touches storage.
//! Two implementations ship:
//!
//! - [`MemoryStore`] - a mutex-guarded map, for tests and throwaway servers
//! - [`SqliteStore`] - one row per game in SQLite, the default for the binary
//!
//! Updates are compare-and-swap on [`GameSession::version`]: a write only
//! lands if the stored version still equals the version the caller read, and
//! the stored copy comes back with the version bumped by one. Two players
//! racing on the same game therefore cannot silently overwrite each other.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use shared::{GameCode, GameSession};
use thiserror::Error;

/// Errors raised by a session store
#[derive(Error, Debug)]
pub enum StoreError {
    /// `create` was called with a code that already has a session
    #[error("Game code {0} is already taken")]
    CodeTaken(GameCode),

    /// `update` was called for a code with no session
    #[error("No session stored for {0}")]
    NotFound(GameCode),

    /// The stored version moved on since the caller read it
    #[error("Version conflict on {code}: expected {expected}, stored {actual}")]
    VersionConflict {
        code: GameCode,
        expected: u64,
        actual: u64,
    },

    /// The version counter cannot be advanced or stored
    #[error("Version {version} of {code} is out of range")]
    VersionOverflow { code: GameCode, version: u64 },

    /// Backing database failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored record could not be encoded or decoded
    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session under `code`. Fails with [`StoreError::CodeTaken`]
    /// if the code is in use; existing sessions are never overwritten.
    async fn create(&self, code: &GameCode, session: &GameSession) -> StoreResult<()>;

    /// Current snapshot for `code`, if any
    async fn get(&self, code: &GameCode) -> StoreResult<Option<GameSession>>;

    /// Replace the session if the stored version equals `session.version`.
    ///
    /// Returns the stored copy, whose version is one higher.
    async fn update(&self, code: &GameCode, session: &GameSession) -> StoreResult<GameSession>;
}

/// The record a successful update writes
fn next_version(code: &GameCode, session: &GameSession) -> StoreResult<GameSession> {
    let version = session
        .version
        .checked_add(1)
        .ok_or_else(|| StoreError::VersionOverflow {
            code: code.clone(),
            version: session.version,
        })?;
    let mut next = session.clone();
    next.version = version;
    Ok(next)
}
