//! SQLite-backed session store
//!
//! One row per game. The session itself is kept as its JSON record in
//! `data`, exactly as clients see it, with `version` mirrored in its own
//! column so compare-and-swap can be done in a single `UPDATE`.

use super::{next_version, SessionStore, StoreError, StoreResult};
use async_trait::async_trait;
use shared::{GameCode, GameSession};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS games (
    code TEXT PRIMARY KEY,
    data TEXT NOT NULL,
    version INTEGER NOT NULL,
    updated_at TEXT NOT NULL
);";

#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `database_url` and make
    /// sure the schema exists
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        info!("[STORE] Connected to {}", database_url);
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, initializing the schema
    pub async fn from_pool(pool: Pool<Sqlite>) -> StoreResult<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(SqliteStore { pool })
    }

    async fn stored_version(&self, code: &GameCode) -> StoreResult<Option<u64>> {
        let version: Option<i64> = sqlx::query_scalar("SELECT version FROM games WHERE code = $1")
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await?;
        // The column only ever holds values written through `version_column`
        Ok(version.and_then(|v| u64::try_from(v).ok()))
    }
}

/// SQLite integers are signed; versions past `i64::MAX` are not storable
fn version_column(code: &GameCode, version: u64) -> StoreResult<i64> {
    i64::try_from(version).map_err(|_| StoreError::VersionOverflow {
        code: code.clone(),
        version,
    })
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn create(&self, code: &GameCode, session: &GameSession) -> StoreResult<()> {
        let data = serde_json::to_string(session)?;
        let version = version_column(code, session.version)?;

        let result = sqlx::query(
            "INSERT INTO games (code, data, version, updated_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(code.as_str())
        .bind(&data)
        .bind(version)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::CodeTaken(code.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, code: &GameCode) -> StoreResult<Option<GameSession>> {
        let data: Option<String> = sqlx::query_scalar("SELECT data FROM games WHERE code = $1")
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match data {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, code: &GameCode, session: &GameSession) -> StoreResult<GameSession> {
        let next = next_version(code, session)?;
        let data = serde_json::to_string(&next)?;
        let expected = version_column(code, session.version)?;
        let version = version_column(code, next.version)?;

        let result = sqlx::query(
            "UPDATE games SET data = $1, version = $2, updated_at = $3
             WHERE code = $4 AND version = $5",
        )
        .bind(&data)
        .bind(version)
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(code.as_str())
        .bind(expected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(next);
        }

        match self.stored_version(code).await? {
            None => Err(StoreError::NotFound(code.clone())),
            Some(actual) => Err(StoreError::VersionConflict {
                code: code.clone(),
                expected: session.version,
                actual,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_rules::Color;
    use shared::{BoardState, SessionStatus};

    /// Helper to create a store over a private in-memory database
    async fn test_store() -> SqliteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        SqliteStore::from_pool(pool)
            .await
            .expect("Failed to initialize schema")
    }

    fn code(s: &str) -> GameCode {
        GameCode::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_sqlite_create_and_get() {
        let store = test_store().await;
        let session = GameSession::new(Color::Black, chrono::Utc::now());
        store.create(&code("QWERTY"), &session).await.unwrap();

        let loaded = store.get(&code("QWERTY")).await.unwrap().unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.board, BoardState::Initial);
        assert!(store.get(&code("ASDFGH")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_duplicate_code() {
        let store = test_store().await;
        let session = GameSession::new(Color::White, chrono::Utc::now());
        store.create(&code("QWERTY"), &session).await.unwrap();
        let err = store.create(&code("QWERTY"), &session).await.unwrap_err();
        assert!(matches!(err, StoreError::CodeTaken(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_sqlite_compare_and_swap() {
        let store = test_store().await;
        let mut session = GameSession::new(Color::White, chrono::Utc::now());
        store.create(&code("QWERTY"), &session).await.unwrap();

        session.status = SessionStatus::Active;
        let stored = store.update(&code("QWERTY"), &session).await.unwrap();
        assert_eq!(stored.version, 1);

        let err = store.update(&code("QWERTY"), &session).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::VersionConflict {
                expected: 0,
                actual: 1,
                ..
            }
        ));

        let loaded = store.get(&code("QWERTY")).await.unwrap().unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.status, SessionStatus::Active);
    }

    #[tokio::test]
    async fn test_sqlite_rejects_unstorable_version() {
        let store = test_store().await;
        let mut session = GameSession::new(Color::White, chrono::Utc::now());
        session.version = u64::MAX;

        let err = store.create(&code("QWERTY"), &session).await.unwrap_err();
        assert!(matches!(err, StoreError::VersionOverflow { .. }), "got {:?}", err);
        assert!(store.get(&code("QWERTY")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_update_missing() {
        let store = test_store().await;
        let session = GameSession::new(Color::White, chrono::Utc::now());
        let err = store.update(&code("QWERTY"), &session).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
