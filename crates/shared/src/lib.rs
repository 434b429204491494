//! Wire types shared by the session server and its clients
//!
//! - `session` - The persisted [`GameSession`] record and its parts
//! - `protocol` - HTTP request and response bodies
//! - `error` - Validation errors raised at the wire boundary

pub mod error;
pub mod protocol;
pub mod session;

pub use error::{ProtocolError, ProtocolResult};
pub use session::{
    format_move, parse_move_record, BoardState, GameCode, GameSession, PlayerBinding,
    SessionStatus, GAME_CODE_ALPHABET, GAME_CODE_LEN,
};
