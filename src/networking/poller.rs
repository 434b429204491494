//! Snapshot polling
//!
//! There is no push channel: each client re-reads the session at most once
//! per [`MIN_POLL_INTERVAL`] and re-renders when the snapshot's `version`
//! moved. Staleness is bounded by one interval.

use crate::core::ClientResult;
use crate::networking::client::GameClient;
use async_trait::async_trait;
use shared::{GameCode, GameSession};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Requests are never spaced closer than this
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Anything that can hand out the current snapshot of a game
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, code: &GameCode) -> ClientResult<GameSession>;
}

#[async_trait]
impl SnapshotSource for GameClient {
    async fn fetch(&self, code: &GameCode) -> ClientResult<GameSession> {
        self.get(code).await
    }
}

pub struct Poller<S> {
    source: S,
    code: GameCode,
    interval: Duration,
    last_version: Option<u64>,
    last_request: Option<Instant>,
}

impl<S: SnapshotSource> Poller<S> {
    /// `interval` below [`MIN_POLL_INTERVAL`] is raised to it
    pub fn new(source: S, code: GameCode, interval: Duration) -> Self {
        Poller {
            source,
            code,
            interval: interval.max(MIN_POLL_INTERVAL),
            last_version: None,
            last_request: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_version(&self) -> Option<u64> {
        self.last_version
    }

    /// Mark a snapshot obtained elsewhere (e.g. a move response) as seen
    pub fn observe(&mut self, session: &GameSession) {
        self.last_version = Some(match self.last_version {
            Some(seen) => seen.max(session.version),
            None => session.version,
        });
    }

    /// Wait out the interval, fetch once, and return the snapshot only if
    /// its version is newer than the last one seen
    pub async fn poll(&mut self) -> ClientResult<Option<GameSession>> {
        if let Some(last) = self.last_request {
            tokio::time::sleep_until(last + self.interval).await;
        }
        self.last_request = Some(Instant::now());

        let session = self.source.fetch(&self.code).await?;
        let changed = match self.last_version {
            Some(seen) => session.version > seen,
            None => true,
        };
        if !changed {
            debug!("[POLL] {} unchanged at version {}", self.code, session.version);
            return Ok(None);
        }

        debug!("[POLL] {} advanced to version {}", self.code, session.version);
        self.last_version = Some(session.version);
        Ok(Some(session))
    }
}
