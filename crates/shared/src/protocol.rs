//! HTTP request and response bodies
//!
//! Field names are camelCase to stay compatible with browser clients of the
//! legacy `/api/games` endpoint.

use crate::session::{GameCode, GameSession, PlayerBinding};
use chess_rules::{Color, Square};
use serde::{Deserialize, Serialize};

/// `POST /api/games`
///
/// Either `{ "color": "black" }` to open a new game, or the legacy form
/// `{ "gameCode": ..., "gameData": ... }` that stores a client-built record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_code: Option<GameCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_data: Option<GameSession>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameResponse {
    pub success: bool,
    pub game_code: GameCode,
    pub binding: PlayerBinding,
}

/// `GET /api/games?code=...`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameQuery {
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub game_data: GameSession,
}

/// `PUT /api/games` - replace a stored snapshot wholesale
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameRequest {
    pub game_code: GameCode,
    pub game_data: GameSession,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

/// `POST /api/games/{code}/join`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub binding: PlayerBinding,
    pub game_data: GameSession,
}

/// `POST /api/games/{code}/moves`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub game_data: GameSession,
    /// Whether the side now to move is in check. Informational only.
    pub in_check: bool,
}

/// `POST /api/games/{code}/resign`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResignRequest {
    pub color: Color,
}

/// `GET /api/games/{code}/moves?from=e2`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PossibleMovesQuery {
    pub from: Square,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PossibleMovesResponse {
    pub from: Square,
    pub moves: Vec<Square>,
}

/// `GET /api/games/{code}/version`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: u64,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
