//! HTTP client for the session server
//!
//! Thin async wrapper over the `/api/games` routes. Every call returns the
//! server's view of the game; nothing is cached or patched locally, so a
//! failed request leaves the client with the last snapshot it actually saw.

use crate::core::{ClientError, ClientResult};
use chess_rules::{Color, Square};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::protocol::{
    AckResponse, CreateGameRequest, CreateGameResponse, ErrorResponse, GameResponse, JoinResponse,
    MoveRequest, MoveResponse, PossibleMovesResponse, ResignRequest, UpdateGameRequest,
    VersionResponse,
};
use shared::{GameCode, GameSession, PlayerBinding};
use tracing::debug;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct GameClient {
    http: reqwest::Client,
    base_url: String,
}

impl GameClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        GameClient { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn game_url(&self, code: &GameCode, action: &str) -> String {
        self.url(&format!("/api/games/{}/{}", code, action))
    }

    /// Open a new game and return the creator's binding
    pub async fn create(&self, color: Color) -> ClientResult<PlayerBinding> {
        let request = CreateGameRequest {
            color: Some(color),
            ..Default::default()
        };
        let response = self
            .http
            .post(self.url("/api/games"))
            .json(&request)
            .send()
            .await?;
        let created: CreateGameResponse = decode(response, None).await?;
        debug!("[API] Created game {}", created.game_code);
        Ok(created.binding)
    }

    pub async fn join(&self, code: &GameCode) -> ClientResult<(PlayerBinding, GameSession)> {
        let response = self.http.post(self.game_url(code, "join")).send().await?;
        let joined: JoinResponse = decode(response, Some(code)).await?;
        Ok((joined.binding, joined.game_data))
    }

    pub async fn get(&self, code: &GameCode) -> ClientResult<GameSession> {
        let url = self.url(&format!("/api/games?code={}", code));
        let response = self.http.get(url).send().await?;
        let game: GameResponse = decode(response, Some(code)).await?;
        Ok(game.game_data)
    }

    pub async fn version(&self, code: &GameCode) -> ClientResult<u64> {
        let response = self.http.get(self.game_url(code, "version")).send().await?;
        let version: VersionResponse = decode(response, Some(code)).await?;
        Ok(version.version)
    }

    /// Submit a move as the player `binding` describes
    pub async fn submit_move(
        &self,
        binding: &PlayerBinding,
        from: Square,
        to: Square,
    ) -> ClientResult<MoveResponse> {
        let request = MoveRequest {
            from,
            to,
            color: binding.color,
        };
        let response = self
            .http
            .post(self.game_url(&binding.code, "moves"))
            .json(&request)
            .send()
            .await?;
        decode(response, Some(&binding.code)).await
    }

    pub async fn resign(&self, binding: &PlayerBinding) -> ClientResult<GameSession> {
        let request = ResignRequest {
            color: binding.color,
        };
        let response = self
            .http
            .post(self.game_url(&binding.code, "resign"))
            .json(&request)
            .send()
            .await?;
        let game: GameResponse = decode(response, Some(&binding.code)).await?;
        Ok(game.game_data)
    }

    /// Legal targets for the piece on `from`
    pub async fn possible_moves(&self, code: &GameCode, from: Square) -> ClientResult<Vec<Square>> {
        let url = format!("{}?from={}", self.game_url(code, "moves"), from);
        let response = self.http.get(url).send().await?;
        let listing: PossibleMovesResponse = decode(response, Some(code)).await?;
        Ok(listing.moves)
    }

    /// Replace the stored snapshot. `session.version` must be the version it was built from.
    pub async fn update(&self, code: &GameCode, session: &GameSession) -> ClientResult<()> {
        let request = UpdateGameRequest {
            game_code: code.clone(),
            game_data: session.clone(),
        };
        let response = self
            .http
            .put(self.url("/api/games"))
            .json(&request)
            .send()
            .await?;
        let _: AckResponse = decode(response, Some(code)).await?;
        Ok(())
    }
}

/// Turn a response into `T`, or into the error the server reported
async fn decode<T: DeserializeOwned>(response: Response, code: Option<&GameCode>) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(code) = code {
            return Err(ClientError::NotFound(code.to_string()));
        }
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}
