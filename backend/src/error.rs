//! Session service errors and their HTTP mapping

use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_rules::{Color, Square};
use shared::protocol::ErrorResponse;
use shared::{GameCode, ProtocolError, SessionStatus};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Game {0} not found")]
    NotFound(GameCode),

    /// Join on a session that is not waiting for a second player
    #[error("Game {code} cannot be joined (status: {status})")]
    NotJoinable { code: GameCode, status: SessionStatus },

    #[error("Illegal move {from} → {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("It is {expected}'s turn, not {color}'s")]
    NotYourTurn { color: Color, expected: Color },

    /// Move on a session that is waiting or already over
    #[error("Game {code} is not in progress (status: {status})")]
    NotActive { code: GameCode, status: SessionStatus },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The session changed between read and write, or a code was reused
    #[error("Game was modified concurrently: {0}")]
    Conflict(String),

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(StoreError),
}

pub type SessionResult<T> = Result<T, SessionError>;

impl SessionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::NotJoinable { .. } => StatusCode::CONFLICT,
            SessionError::IllegalMove { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            SessionError::NotYourTurn { .. } => StatusCode::CONFLICT,
            SessionError::NotActive { .. } => StatusCode::CONFLICT,
            SessionError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SessionError::Conflict(_) => StatusCode::CONFLICT,
            SessionError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(code) => SessionError::NotFound(code),
            StoreError::CodeTaken(code) => {
                SessionError::Conflict(format!("game code {} is already taken", code))
            }
            StoreError::VersionConflict {
                code,
                expected,
                actual,
            } => SessionError::Conflict(format!(
                "game {} is at version {}, not {}",
                code, actual, expected
            )),
            StoreError::VersionOverflow { code, version } => SessionError::Conflict(format!(
                "game {} cannot advance past version {}",
                code, version
            )),
            other => SessionError::StoreUnavailable(other),
        }
    }
}

impl From<ProtocolError> for SessionError {
    fn from(err: ProtocolError) -> Self {
        SessionError::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let SessionError::StoreUnavailable(ref cause) = self {
            error!("[API] Store failure: {}", cause);
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
