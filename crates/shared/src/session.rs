//! Persisted game session record
//!
//! A [`GameSession`] is the authoritative state of one game, stored under its
//! [`GameCode`]. The JSON shape is the durable contract with any client that
//! reads the store directly:
//!
//! ```json
//! {
//!   "creatorColor": "white",
//!   "board": "initial",
//!   "status": "waiting",
//!   "currentTurn": "white",
//!   "moveHistory": [],
//!   "createdAt": "2024-05-01T12:00:00Z",
//!   "version": 0
//! }
//! ```
//!
//! `board` is either the literal `"initial"` or a string holding the
//! JSON-encoded 8x8 grid. Older records spell `creatorColor` as
//! `playerColor`; both are accepted on read.

use crate::error::{ProtocolError, ProtocolResult};
use chess_rules::{Board, Color, Piece, Square};
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbols a game code is drawn from: A-Z and 2-9 without I, O, 0 and 1
pub const GAME_CODE_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of symbols in a game code
pub const GAME_CODE_LEN: usize = 6;

const INITIAL_BOARD: &str = "initial";
const MOVE_SEPARATOR: &str = " → ";

/// Short shareable session identifier, always upper case
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameCode(String);

impl GameCode {
    /// Parse a code typed by a user. Lower case input is accepted.
    pub fn parse(input: &str) -> ProtocolResult<Self> {
        let code = input.trim().to_ascii_uppercase();
        let valid = code.len() == GAME_CODE_LEN
            && code.bytes().all(|b| GAME_CODE_ALPHABET.contains(&b));
        if valid {
            Ok(GameCode(code))
        } else {
            Err(ProtocolError::InvalidGameCode(input.to_string()))
        }
    }

    /// Build a code from alphabet positions (taken modulo the alphabet size)
    pub fn from_alphabet_indices(indices: [usize; GAME_CODE_LEN]) -> Self {
        let code = indices
            .iter()
            .map(|&i| GAME_CODE_ALPHABET[i % GAME_CODE_ALPHABET.len()] as char)
            .collect();
        GameCode(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GameCode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> ProtocolResult<Self> {
        GameCode::parse(s)
    }
}

impl TryFrom<String> for GameCode {
    type Error = ProtocolError;

    fn try_from(value: String) -> ProtocolResult<Self> {
        GameCode::parse(&value)
    }
}

impl From<GameCode> for String {
    fn from(code: GameCode) -> Self {
        code.0
    }
}

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Created, waiting for the second player
    Waiting,
    /// Both players present, moves accepted
    Active,
    Checkmate,
    Stalemate,
    Resigned,
}

impl SessionStatus {
    /// No further moves are accepted in a terminal state
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionStatus::Checkmate | SessionStatus::Stalemate | SessionStatus::Resigned
        )
    }

    /// Terminal states that have a winner
    pub fn has_winner(self) -> bool {
        matches!(self, SessionStatus::Checkmate | SessionStatus::Resigned)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Waiting => "waiting",
            SessionStatus::Active => "active",
            SessionStatus::Checkmate => "checkmate",
            SessionStatus::Stalemate => "stalemate",
            SessionStatus::Resigned => "resigned",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Board field of a session: the starting-position sentinel or a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardState {
    #[default]
    Initial,
    Position(Board),
}

impl BoardState {
    /// The concrete board this state stands for
    pub fn resolve(&self) -> Board {
        match self {
            BoardState::Initial => Board::initial(),
            BoardState::Position(board) => *board,
        }
    }

    /// Decode the stored string form
    pub fn parse(text: &str) -> ProtocolResult<Self> {
        if text == INITIAL_BOARD {
            return Ok(BoardState::Initial);
        }
        let rows: Vec<Vec<Option<Piece>>> =
            serde_json::from_str(text).map_err(|e| ProtocolError::InvalidBoard {
                message: e.to_string(),
            })?;
        Ok(BoardState::Position(Board::from_rows(rows)?))
    }

    /// Encode to the stored string form
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        match self {
            BoardState::Initial => Ok(INITIAL_BOARD.to_string()),
            BoardState::Position(board) => serde_json::to_string(board),
        }
    }
}

impl Serialize for BoardState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.encode().map_err(ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBoard {
    Text(String),
    Rows(Vec<Vec<Option<Piece>>>),
}

impl<'de> Deserialize<'de> for BoardState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawBoard::deserialize(deserializer)? {
            RawBoard::Text(text) => BoardState::parse(&text).map_err(de::Error::custom),
            RawBoard::Rows(rows) => Board::from_rows(rows)
                .map(BoardState::Position)
                .map_err(de::Error::custom),
        }
    }
}

/// The authoritative state of one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    #[serde(alias = "playerColor")]
    pub creator_color: Color,
    pub board: BoardState,
    pub status: SessionStatus,
    #[serde(default)]
    pub current_turn: Color,
    /// Append-only `"from → to"` records
    #[serde(default)]
    pub move_history: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_move_time: Option<DateTime<Utc>>,
    /// Bumped on every stored change; clients poll on it
    #[serde(default)]
    pub version: u64,
}

impl GameSession {
    /// A fresh session waiting for its second player. White always moves first.
    pub fn new(creator_color: Color, created_at: DateTime<Utc>) -> Self {
        GameSession {
            creator_color,
            board: BoardState::Initial,
            status: SessionStatus::Waiting,
            current_turn: Color::White,
            move_history: Vec::new(),
            created_at,
            winner: None,
            last_move_time: None,
            version: 0,
        }
    }

    pub fn board(&self) -> Board {
        self.board.resolve()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Color the joining player receives
    pub fn joiner_color(&self) -> Color {
        self.creator_color.opposite()
    }

    /// Check the record for internal consistency.
    ///
    /// Used on every snapshot that arrives from outside the server.
    pub fn validate(&self) -> ProtocolResult<()> {
        match (self.status.has_winner(), self.winner) {
            (false, Some(winner)) => {
                return Err(ProtocolError::InvalidSession {
                    message: format!("status {} cannot have winner {}", self.status, winner),
                });
            }
            (true, None) if self.status == SessionStatus::Resigned => {
                return Err(ProtocolError::InvalidSession {
                    message: "resigned session must name a winner".to_string(),
                });
            }
            _ => {}
        }

        if let Some(bad) = self
            .move_history
            .iter()
            .find(|record| parse_move_record(record).is_none())
        {
            return Err(ProtocolError::InvalidSession {
                message: format!("malformed move record {:?}", bad),
            });
        }

        Ok(())
    }
}

/// Role assignment handed to a client by create and join.
///
/// Clients pass it back on every move and resignation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBinding {
    pub code: GameCode,
    pub color: Color,
    pub is_creator: bool,
}

impl PlayerBinding {
    pub fn opponent_color(&self) -> Color {
        self.color.opposite()
    }
}

/// Move history record, e.g. `"e2 → e4"`
pub fn format_move(from: Square, to: Square) -> String {
    format!("{}{}{}", from, MOVE_SEPARATOR, to)
}

/// Inverse of [`format_move`]
pub fn parse_move_record(record: &str) -> Option<(Square, Square)> {
    let (from, to) = record.split_once(MOVE_SEPARATOR)?;
    Some((from.parse().ok()?, to.parse().ok()?))
}
