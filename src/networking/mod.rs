//! Networking - talking to the session server
//!
//! - [`GameClient`] - One method per server route
//! - [`Poller`] - Rate-limited change detection on a game's snapshot

pub mod client;
pub mod poller;

pub use client::{GameClient, DEFAULT_SERVER_URL};
pub use poller::{Poller, SnapshotSource, MIN_POLL_INTERVAL};
