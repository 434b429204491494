//! HTTP surface of the session server
//!
//! `/api/games` keeps the legacy create/get/update contract so existing
//! browser clients keep working. The `/api/games/{code}/...` routes are the
//! server-authoritative protocol: clients send intents (join, move, resign)
//! and the server validates them against the stored snapshot.

use crate::error::{SessionError, SessionResult};
use crate::session::SessionService;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Path, Query, State,
    },
    routing::{get, post},
    Router,
};
use chess_rules::Color;
use shared::protocol::{
    AckResponse, CreateGameRequest, CreateGameResponse, GameQuery, GameResponse, JoinResponse,
    MoveRequest, MoveResponse, PossibleMovesQuery, PossibleMovesResponse, ResignRequest,
    UpdateGameRequest, VersionResponse,
};
use shared::{GameCode, PlayerBinding};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub service: SessionService,
}

pub fn router(service: SessionService) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/games",
            post(create_game).get(get_game).put(update_game),
        )
        .route("/api/games/{code}/join", post(join_game))
        .route("/api/games/{code}/moves", post(submit_move).get(list_moves))
        .route("/api/games/{code}/resign", post(resign_game))
        .route("/api/games/{code}/version", get(game_version))
        .with_state(state)
}

fn parse_code(raw: &str) -> SessionResult<GameCode> {
    Ok(GameCode::parse(raw)?)
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> SessionResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| SessionError::InvalidRequest(rejection.body_text()))
}

async fn health() -> &'static str {
    "ok"
}

/// New game for `color`, or the legacy import of a client-built record
async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<CreateGameRequest>, JsonRejection>,
) -> SessionResult<Json<CreateGameResponse>> {
    let request = body(payload)?;

    let binding = match (request.game_code, request.game_data) {
        (Some(code), Some(session)) => {
            let binding = PlayerBinding {
                code: code.clone(),
                color: session.creator_color,
                is_creator: true,
            };
            state.service.import_session(&code, session).await?;
            binding
        }
        (None, Some(_)) => {
            return Err(SessionError::InvalidRequest(
                "gameCode is required with gameData".to_string(),
            ))
        }
        (_, None) => {
            let color = request.color.unwrap_or(Color::White);
            state.service.create_session(color).await?
        }
    };

    info!("[API] Game {} created", binding.code);
    Ok(Json(CreateGameResponse {
        success: true,
        game_code: binding.code.clone(),
        binding,
    }))
}

async fn get_game(
    State(state): State<AppState>,
    query: Result<Query<GameQuery>, QueryRejection>,
) -> SessionResult<Json<GameResponse>> {
    let raw = query
        .ok()
        .and_then(|Query(q)| q.code)
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| SessionError::InvalidRequest("Game code is required".to_string()))?;

    let code = parse_code(&raw)?;
    let game_data = state.service.get_session(&code).await?;
    Ok(Json(GameResponse { game_data }))
}

async fn update_game(
    State(state): State<AppState>,
    payload: Result<Json<UpdateGameRequest>, JsonRejection>,
) -> SessionResult<Json<AckResponse>> {
    let request = body(payload)?;
    state
        .service
        .replace_snapshot(&request.game_code, request.game_data)
        .await?;
    Ok(Json(AckResponse { success: true }))
}

async fn join_game(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> SessionResult<Json<JoinResponse>> {
    let code = parse_code(&code)?;
    let (binding, game_data) = state.service.join_session(&code).await?;
    Ok(Json(JoinResponse { binding, game_data }))
}

async fn submit_move(
    State(state): State<AppState>,
    Path(code): Path<String>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> SessionResult<Json<MoveResponse>> {
    let code = parse_code(&code)?;
    let request = body(payload)?;
    let outcome = state
        .service
        .submit_move(&code, request.from, request.to, request.color)
        .await?;
    Ok(Json(MoveResponse {
        game_data: outcome.session,
        in_check: outcome.in_check,
    }))
}

async fn resign_game(
    State(state): State<AppState>,
    Path(code): Path<String>,
    payload: Result<Json<ResignRequest>, JsonRejection>,
) -> SessionResult<Json<GameResponse>> {
    let code = parse_code(&code)?;
    let request = body(payload)?;
    let game_data = state.service.resign(&code, request.color).await?;
    Ok(Json(GameResponse { game_data }))
}

async fn list_moves(
    State(state): State<AppState>,
    Path(code): Path<String>,
    query: Result<Query<PossibleMovesQuery>, QueryRejection>,
) -> SessionResult<Json<PossibleMovesResponse>> {
    let code = parse_code(&code)?;
    let Query(query) =
        query.map_err(|rejection| SessionError::InvalidRequest(rejection.body_text()))?;
    let moves = state.service.possible_moves(&code, query.from).await?;
    Ok(Json(PossibleMovesResponse {
        from: query.from,
        moves,
    }))
}

async fn game_version(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> SessionResult<Json<VersionResponse>> {
    let code = parse_code(&code)?;
    let version = state.service.version(&code).await?;
    Ok(Json(VersionResponse { version }))
}
