//! Error types for the wire protocol

use chess_rules::RulesError;
use thiserror::Error;

/// Errors raised while validating data crossing the client/server boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Game code is not 6 characters from the game code alphabet
    #[error("Invalid game code: {0:?}")]
    InvalidGameCode(String),

    /// Serialized board could not be decoded
    #[error("Invalid board: {message}")]
    InvalidBoard { message: String },

    /// Session record is internally inconsistent
    #[error("Invalid session: {message}")]
    InvalidSession { message: String },

    /// Square or board shape rejected by the rules crate
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// Result type alias for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;
