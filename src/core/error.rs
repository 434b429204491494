//! Error types for the client
//!
//! Covers talking to the session server and persisting player bindings.

use shared::{GameCode, ProtocolError};
use thiserror::Error;

/// Errors that can occur on the client side
#[derive(Error, Debug)]
pub enum ClientError {
    /// Server has no game under this code
    #[error("Game {0} not found")]
    NotFound(String),

    /// Server refused the request
    #[error("Server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Transport or decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Binding file I/O error
    #[error("Binding I/O error: {0}")]
    BindingIo(#[from] std::io::Error),

    /// Binding file serialization/deserialization error
    #[error("Binding serialization error: {0}")]
    BindingSerialization(#[from] serde_json::Error),

    /// No binding was saved for this game on this machine
    #[error("No player binding saved for game {0}; create or join it first")]
    NoBinding(GameCode),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
