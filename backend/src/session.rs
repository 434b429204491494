//! Session state machine
//!
//! [`SessionService`] owns every transition a game can make:
//!
//! ```text
//! waiting --join--> active --resign--> resigned
//!                     |
//!                     +--(checkmate / stalemate, set by snapshot replace)
//! ```
//!
//! A client-built snapshot is held to the same rules: it may only join,
//! append legal moves and end the game, never rewrite what came before.
//!
//! Each operation reads the current snapshot, checks it, builds the next
//! snapshot and writes it back through [`SessionStore::update`]. The store
//! write is compare-and-swap on the snapshot version, so an operation that
//! raced another writer fails with [`SessionError::Conflict`] instead of
//! overwriting it.

use crate::code::generate_game_code;
use crate::error::{SessionError, SessionResult};
use crate::store::{SessionStore, StoreError};
use chess_rules::{apply_move, in_check, is_legal, possible_moves, Color, Square};
use chrono::Utc;
use shared::{
    format_move, parse_move_record, BoardState, GameCode, GameSession, PlayerBinding,
    SessionStatus,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Fresh codes drawn before giving up on create
const MAX_CODE_ATTEMPTS: usize = 8;

pub type CodeGenerator = Arc<dyn Fn() -> GameCode + Send + Sync>;

/// Outcome of an accepted move
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub session: GameSession,
    /// Side to move is now in check
    pub in_check: bool,
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    generate_code: CodeGenerator,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self::with_code_generator(store, Arc::new(generate_game_code))
    }

    pub fn with_code_generator(store: Arc<dyn SessionStore>, generate_code: CodeGenerator) -> Self {
        SessionService {
            store,
            generate_code,
        }
    }

    /// Open a new game for a creator playing `color`
    pub async fn create_session(&self, color: Color) -> SessionResult<PlayerBinding> {
        let session = GameSession::new(color, Utc::now());

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = (self.generate_code)();
            match self.store.create(&code, &session).await {
                Ok(()) => {
                    info!("[SESSION] Created game {} (creator plays {})", code, color);
                    return Ok(PlayerBinding {
                        code,
                        color,
                        is_creator: true,
                    });
                }
                Err(StoreError::CodeTaken(taken)) => {
                    warn!("[SESSION] Code {} already in use, drawing another", taken);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(SessionError::Conflict(format!(
            "no free game code after {} attempts",
            MAX_CODE_ATTEMPTS
        )))
    }

    /// Store a client-built snapshot under a client-chosen code.
    /// Versioning restarts at 0 whatever the snapshot carried.
    pub async fn import_session(
        &self,
        code: &GameCode,
        mut session: GameSession,
    ) -> SessionResult<()> {
        session.validate()?;
        session.version = 0;
        self.store.create(code, &session).await?;
        info!("[SESSION] Imported game {} (status: {})", code, session.status);
        Ok(())
    }

    pub async fn get_session(&self, code: &GameCode) -> SessionResult<GameSession> {
        self.store
            .get(code)
            .await?
            .ok_or_else(|| SessionError::NotFound(code.clone()))
    }

    /// Seat the second player and start the game
    pub async fn join_session(
        &self,
        code: &GameCode,
    ) -> SessionResult<(PlayerBinding, GameSession)> {
        let mut session = self.get_session(code).await?;
        if session.status != SessionStatus::Waiting {
            warn!("[SESSION] Join rejected for {} (status: {})", code, session.status);
            return Err(SessionError::NotJoinable {
                code: code.clone(),
                status: session.status,
            });
        }

        session.status = SessionStatus::Active;
        let stored = match self.store.update(code, &session).await {
            Ok(stored) => stored,
            // Someone else joined between our read and write
            Err(StoreError::VersionConflict { .. }) => {
                let current = self.get_session(code).await?;
                return Err(SessionError::NotJoinable {
                    code: code.clone(),
                    status: current.status,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let binding = PlayerBinding {
            code: code.clone(),
            color: stored.joiner_color(),
            is_creator: false,
        };
        info!("[SESSION] Game {} joined, joiner plays {}", code, binding.color);
        Ok((binding, stored))
    }

    /// Validate and apply a move by `color`
    pub async fn submit_move(
        &self,
        code: &GameCode,
        from: Square,
        to: Square,
        color: Color,
    ) -> SessionResult<MoveOutcome> {
        let mut session = self.get_session(code).await?;

        if session.status != SessionStatus::Active {
            warn!(
                "[SESSION] Move {}→{} on {} rejected: status {}",
                from, to, code, session.status
            );
            return Err(SessionError::NotActive {
                code: code.clone(),
                status: session.status,
            });
        }
        if session.current_turn != color {
            warn!("[SESSION] Move on {} rejected: {} moved out of turn", code, color);
            return Err(SessionError::NotYourTurn {
                color,
                expected: session.current_turn,
            });
        }

        let board = session.board();
        if board.color_at(from) != Some(color) || !is_legal(&board, from, to) {
            warn!("[SESSION] Illegal move {}→{} on {}", from, to, code);
            return Err(SessionError::IllegalMove { from, to });
        }

        let next_board = apply_move(&board, from, to);
        session.board = BoardState::Position(next_board);
        session.current_turn = color.opposite();
        session.move_history.push(format_move(from, to));
        session.last_move_time = Some(Utc::now());

        let stored = self.store.update(code, &session).await?;
        let check = in_check(&next_board, stored.current_turn);
        info!(
            "[SESSION] {} played {} on {}{}",
            color,
            format_move(from, to),
            code,
            if check { " (check)" } else { "" }
        );

        Ok(MoveOutcome {
            session: stored,
            in_check: check,
        })
    }

    /// End the game in favour of the other side. Repeating overwrites the
    /// winner; a checkmate or stalemate stands.
    pub async fn resign(&self, code: &GameCode, color: Color) -> SessionResult<GameSession> {
        let mut session = self.get_session(code).await?;
        if matches!(
            session.status,
            SessionStatus::Checkmate | SessionStatus::Stalemate
        ) {
            warn!("[SESSION] Resign on {} rejected: status {}", code, session.status);
            return Err(SessionError::NotActive {
                code: code.clone(),
                status: session.status,
            });
        }
        session.status = SessionStatus::Resigned;
        session.winner = Some(color.opposite());

        let stored = self.store.update(code, &session).await?;
        info!("[SESSION] {} resigned game {}, {} wins", color, code, color.opposite());
        Ok(stored)
    }

    /// Overwrite the stored snapshot with a client-built one.
    ///
    /// The snapshot must carry the version it was built from and be reachable
    /// from the stored one (see `check_transition`).
    pub async fn replace_snapshot(
        &self,
        code: &GameCode,
        session: GameSession,
    ) -> SessionResult<GameSession> {
        session.validate()?;
        let current = self.get_session(code).await?;
        if session.version != current.version {
            return Err(StoreError::VersionConflict {
                code: code.clone(),
                expected: session.version,
                actual: current.version,
            }
            .into());
        }
        if let Err(e) = check_transition(code, &current, &session) {
            warn!("[SESSION] Snapshot of {} rejected: {}", code, e);
            return Err(e);
        }

        // The write is still compare-and-swap, so `current` is what gets replaced
        let stored = self.store.update(code, &session).await?;
        info!("[SESSION] Snapshot of {} replaced (version {})", code, stored.version);
        Ok(stored)
    }

    /// Legal targets for the piece on `from`, empty if the square is empty
    pub async fn possible_moves(
        &self,
        code: &GameCode,
        from: Square,
    ) -> SessionResult<Vec<Square>> {
        let session = self.get_session(code).await?;
        Ok(possible_moves(&session.board(), from))
    }

    pub async fn version(&self, code: &GameCode) -> SessionResult<u64> {
        Ok(self.get_session(code).await?.version)
    }
}

/// Whether `next` can follow `current`: creator and creation time are fixed,
/// status never moves backwards, and the history only grows by moves that
/// are legal in turn and produce the submitted board.
fn check_transition(
    code: &GameCode,
    current: &GameSession,
    next: &GameSession,
) -> SessionResult<()> {
    if current.is_terminal() {
        return Err(SessionError::NotActive {
            code: code.clone(),
            status: current.status,
        });
    }
    if next.creator_color != current.creator_color || next.created_at != current.created_at {
        return Err(SessionError::InvalidRequest(
            "creatorColor and createdAt cannot change".to_string(),
        ));
    }

    let forward = match current.status {
        SessionStatus::Waiting => {
            matches!(next.status, SessionStatus::Waiting | SessionStatus::Active)
        }
        _ => next.status != SessionStatus::Waiting,
    };
    if !forward {
        return Err(SessionError::InvalidRequest(format!(
            "status cannot go from {} to {}",
            current.status, next.status
        )));
    }

    let appended = next
        .move_history
        .strip_prefix(current.move_history.as_slice())
        .ok_or_else(|| {
            SessionError::InvalidRequest("moveHistory can only be appended to".to_string())
        })?;
    if !appended.is_empty() && current.status != SessionStatus::Active {
        return Err(SessionError::NotActive {
            code: code.clone(),
            status: current.status,
        });
    }

    let mut board = current.board();
    let mut turn = current.current_turn;
    for record in appended {
        let (from, to) = parse_move_record(record).ok_or_else(|| {
            SessionError::InvalidRequest(format!("malformed move record {:?}", record))
        })?;
        if board.color_at(from) != Some(turn) || !is_legal(&board, from, to) {
            return Err(SessionError::IllegalMove { from, to });
        }
        board = apply_move(&board, from, to);
        turn = turn.opposite();
    }

    if next.board() != board || next.current_turn != turn {
        return Err(SessionError::InvalidRequest(
            "board and currentTurn must follow from moveHistory".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    /// Generator that replays a fixed list of codes
    fn scripted_codes(codes: &[&str]) -> CodeGenerator {
        let codes: Vec<GameCode> = codes.iter().map(|c| GameCode::parse(c).unwrap()).collect();
        let next = AtomicUsize::new(0);
        Arc::new(move || {
            let i = next.fetch_add(1, Ordering::SeqCst);
            codes[i.min(codes.len() - 1)].clone()
        })
    }

    #[tokio::test]
    async fn test_create_retries_taken_code() {
        let store = Arc::new(MemoryStore::new());
        let service = SessionService::with_code_generator(
            store.clone(),
            scripted_codes(&["AAAAAA", "AAAAAA", "BBBBBB"]),
        );

        let first = service.create_session(Color::White).await.unwrap();
        let second = service.create_session(Color::Black).await.unwrap();
        assert_eq!(first.code.as_str(), "AAAAAA");
        assert_eq!(second.code.as_str(), "BBBBBB");
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_create_gives_up_when_codes_exhausted() {
        let store = Arc::new(MemoryStore::new());
        let service = SessionService::with_code_generator(store, scripted_codes(&["AAAAAA"]));
        service.create_session(Color::White).await.unwrap();

        let err = service.create_session(Color::White).await.unwrap_err();
        assert!(matches!(err, SessionError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_move_requires_own_piece() {
        let service = SessionService::new(Arc::new(MemoryStore::new()));
        let binding = service.create_session(Color::White).await.unwrap();
        service.join_session(&binding.code).await.unwrap();

        // White to move but e7 holds a black pawn
        let err = service
            .submit_move(&binding.code, sq("e7"), sq("e5"), Color::White)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::IllegalMove { .. }));
    }

    #[tokio::test]
    async fn test_move_sets_last_move_time() {
        let service = SessionService::new(Arc::new(MemoryStore::new()));
        let binding = service.create_session(Color::White).await.unwrap();
        service.join_session(&binding.code).await.unwrap();

        let outcome = service
            .submit_move(&binding.code, sq("g1"), sq("f3"), Color::White)
            .await
            .unwrap();
        assert!(outcome.session.last_move_time.is_some());
        assert!(!outcome.in_check);
        assert_eq!(outcome.session.version, 2);
    }

    #[tokio::test]
    async fn test_possible_moves_from_initial() {
        let service = SessionService::new(Arc::new(MemoryStore::new()));
        let binding = service.create_session(Color::White).await.unwrap();

        let moves = service.possible_moves(&binding.code, sq("b1")).await.unwrap();
        assert_eq!(moves, vec![sq("a3"), sq("c3")]);
        assert!(service
            .possible_moves(&binding.code, sq("e4"))
            .await
            .unwrap()
            .is_empty());
    }
}
