//! codechess client
//!
//! Plays games hosted by the session server: create or join a game by code,
//! submit moves, resign, and watch the opponent's moves by polling.

pub mod core;
pub mod networking;
pub mod ui;
