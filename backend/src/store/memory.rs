//! In-memory session store

use super::{next_version, SessionStore, StoreError, StoreResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::{GameCode, GameSession};
use std::collections::HashMap;

/// Sessions kept in a process-local map. Lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<GameCode, GameSession>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, code: &GameCode, session: &GameSession) -> StoreResult<()> {
        let mut sessions = self.sessions.lock();
        if sessions.contains_key(code) {
            return Err(StoreError::CodeTaken(code.clone()));
        }
        sessions.insert(code.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, code: &GameCode) -> StoreResult<Option<GameSession>> {
        Ok(self.sessions.lock().get(code).cloned())
    }

    async fn update(&self, code: &GameCode, session: &GameSession) -> StoreResult<GameSession> {
        let mut sessions = self.sessions.lock();
        let stored = sessions
            .get_mut(code)
            .ok_or_else(|| StoreError::NotFound(code.clone()))?;

        if stored.version != session.version {
            return Err(StoreError::VersionConflict {
                code: code.clone(),
                expected: session.version,
                actual: stored.version,
            });
        }

        *stored = next_version(code, session)?;
        Ok(stored.clone())
    }
}
