//! Session lifecycle tests
//!
//! Drives `SessionService` directly over the in-memory store: create, join,
//! moves and resignation, including the rejections on each transition.

use backend::store::{MemoryStore, SessionStore};
use backend::{SessionError, SessionService};
use chess_rules::{Board, Color, Piece, PieceKind, Square};
use shared::{BoardState, GameCode, GameSession, SessionStatus};
use std::sync::Arc;

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

fn service() -> (SessionService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (SessionService::new(store.clone()), store)
}

/// A created and joined game, white to move
async fn active_game(service: &SessionService) -> GameCode {
    let binding = service.create_session(Color::White).await.unwrap();
    service.join_session(&binding.code).await.unwrap();
    binding.code
}

// ============================================================================
// Create / Join
// ============================================================================

#[tokio::test]
async fn test_create_session_starts_waiting() {
    let (service, _) = service();
    let binding = service.create_session(Color::White).await.unwrap();
    assert!(binding.is_creator);
    assert_eq!(binding.color, Color::White);

    let session = service.get_session(&binding.code).await.unwrap();
    assert_eq!(session.status, SessionStatus::Waiting);
    assert_eq!(session.current_turn, Color::White);
    assert_eq!(session.board, BoardState::Initial);
    assert!(session.move_history.is_empty());
    assert!(session.winner.is_none());
}

#[tokio::test]
async fn test_join_activates_and_second_join_fails() {
    let (service, _) = service();
    let binding = service.create_session(Color::White).await.unwrap();

    let (joiner, session) = service.join_session(&binding.code).await.unwrap();
    assert_eq!(session.status, SessionStatus::Active);
    assert_eq!(joiner.color, Color::Black);
    assert!(!joiner.is_creator);

    let err = service.join_session(&binding.code).await.unwrap_err();
    assert!(
        matches!(
            err,
            SessionError::NotJoinable {
                status: SessionStatus::Active,
                ..
            }
        ),
        "Second join should be NotJoinable, got {:?}",
        err
    );
}

#[tokio::test]
async fn test_black_creator_gives_joiner_white() {
    let (service, _) = service();
    let binding = service.create_session(Color::Black).await.unwrap();
    let (joiner, session) = service.join_session(&binding.code).await.unwrap();

    assert_eq!(joiner.color, Color::White);
    assert_eq!(session.current_turn, Color::White, "White always moves first");
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let (service, _) = service();
    let code = GameCode::parse("ZZZZZZ").unwrap();

    assert!(matches!(
        service.get_session(&code).await,
        Err(SessionError::NotFound(_))
    ));
    assert!(matches!(
        service.join_session(&code).await,
        Err(SessionError::NotFound(_))
    ));
    assert!(matches!(
        service.submit_move(&code, sq("e2"), sq("e4"), Color::White).await,
        Err(SessionError::NotFound(_))
    ));
    assert!(matches!(
        service.resign(&code, Color::White).await,
        Err(SessionError::NotFound(_))
    ));
}

// ============================================================================
// Moves
// ============================================================================

#[tokio::test]
async fn test_opening_move_applied() {
    let (service, _) = service();
    let code = active_game(&service).await;

    let outcome = service
        .submit_move(&code, sq("e2"), sq("e4"), Color::White)
        .await
        .unwrap();
    let session = outcome.session;

    assert_eq!(session.current_turn, Color::Black);
    assert_eq!(session.move_history, vec!["e2 → e4".to_string()]);
    let board = session.board();
    assert!(board.is_empty(sq("e2")), "e2 should be empty");
    assert_eq!(
        board.get(sq("e4")),
        Some(Piece::new(PieceKind::Pawn, Color::White)),
        "White pawn should be on e4"
    );
}

#[tokio::test]
async fn test_players_alternate() {
    let (service, _) = service();
    let code = active_game(&service).await;

    for (from, to, color) in [
        ("e2", "e4", Color::White),
        ("e7", "e5", Color::Black),
        ("g1", "f3", Color::White),
        ("b8", "c6", Color::Black),
    ] {
        service
            .submit_move(&code, sq(from), sq(to), color)
            .await
            .unwrap_or_else(|e| panic!("{} {}→{} rejected: {}", color, from, to, e));
    }

    let session = service.get_session(&code).await.unwrap();
    assert_eq!(session.move_history.len(), 4);
    assert_eq!(session.move_history[3], "b8 → c6");
    assert_eq!(session.current_turn, Color::White);
}

#[tokio::test]
async fn test_move_out_of_turn_rejected() {
    let (service, _) = service();
    let code = active_game(&service).await;

    let err = service
        .submit_move(&code, sq("e7"), sq("e5"), Color::Black)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::NotYourTurn {
            color: Color::Black,
            expected: Color::White
        }
    ));
}

#[tokio::test]
async fn test_illegal_move_leaves_session_untouched() {
    let (service, _) = service();
    let code = active_game(&service).await;
    let before = service.get_session(&code).await.unwrap();

    let err = service
        .submit_move(&code, sq("e2"), sq("e5"), Color::White)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::IllegalMove { .. }));

    let after = service.get_session(&code).await.unwrap();
    assert_eq!(before, after, "Rejected move must not be stored");
}

#[tokio::test]
async fn test_move_from_empty_square_rejected() {
    let (service, _) = service();
    let code = active_game(&service).await;

    let err = service
        .submit_move(&code, sq("e4"), sq("e5"), Color::White)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::IllegalMove { .. }));
}

#[tokio::test]
async fn test_move_reports_check() {
    let (service, store) = service();
    let code = active_game(&service).await;

    // Rook a2 to e2 opens the e-file onto the black king
    let board = Board::empty()
        .with(sq("e8"), Piece::new(PieceKind::King, Color::Black))
        .with(sq("h1"), Piece::new(PieceKind::King, Color::White))
        .with(sq("a2"), Piece::new(PieceKind::Rook, Color::White));
    let mut session = service.get_session(&code).await.unwrap();
    session.board = BoardState::Position(board);
    store.update(&code, &session).await.unwrap();

    let outcome = service
        .submit_move(&code, sq("a2"), sq("e2"), Color::White)
        .await
        .unwrap();
    assert!(outcome.in_check, "Black king on e8 is attacked along the e-file");
    assert_eq!(
        outcome.session.status,
        SessionStatus::Active,
        "Check never changes status"
    );
}

// ============================================================================
// Resignation
// ============================================================================

#[tokio::test]
async fn test_resign_ends_game() {
    let (service, _) = service();
    let code = active_game(&service).await;

    let session = service.resign(&code, Color::White).await.unwrap();
    assert_eq!(session.status, SessionStatus::Resigned);
    assert_eq!(session.winner, Some(Color::Black));

    let err = service
        .submit_move(&code, sq("e2"), sq("e4"), Color::White)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::NotActive {
            status: SessionStatus::Resigned,
            ..
        }
    ));
}

#[tokio::test]
async fn test_repeat_resign_overwrites_winner() {
    let (service, _) = service();
    let code = active_game(&service).await;

    service.resign(&code, Color::White).await.unwrap();
    let session = service.resign(&code, Color::Black).await.unwrap();
    assert_eq!(session.winner, Some(Color::White));
}

#[tokio::test]
async fn test_resign_cannot_override_stalemate() {
    let (service, _) = service();
    let code = active_game(&service).await;
    let mut session = service.get_session(&code).await.unwrap();
    session.status = SessionStatus::Stalemate;
    service.replace_snapshot(&code, session).await.unwrap();

    let err = service.resign(&code, Color::White).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::NotActive {
            status: SessionStatus::Stalemate,
            ..
        }
    ));
    let session = service.get_session(&code).await.unwrap();
    assert_eq!(session.status, SessionStatus::Stalemate);
    assert!(session.winner.is_none());
}

// ============================================================================
// Snapshot replacement
// ============================================================================

#[tokio::test]
async fn test_stale_snapshot_conflicts() {
    let (service, _) = service();
    let code = active_game(&service).await;
    let stale = service.get_session(&code).await.unwrap();

    service
        .submit_move(&code, sq("d2"), sq("d4"), Color::White)
        .await
        .unwrap();

    let err = service.replace_snapshot(&code, stale).await.unwrap_err();
    assert!(matches!(err, SessionError::Conflict(_)));

    let session = service.get_session(&code).await.unwrap();
    assert_eq!(session.move_history, vec!["d2 → d4".to_string()]);
}

#[tokio::test]
async fn test_inconsistent_snapshot_rejected() {
    let (service, _) = service();
    let code = active_game(&service).await;
    let mut session = service.get_session(&code).await.unwrap();
    session.winner = Some(Color::White);

    let err = service.replace_snapshot(&code, session).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_snapshot_can_end_in_stalemate() {
    let (service, _) = service();
    let code = active_game(&service).await;
    let mut session = service.get_session(&code).await.unwrap();
    session.status = SessionStatus::Stalemate;

    let stored = service.replace_snapshot(&code, session).await.unwrap();
    assert!(stored.is_terminal());
    assert!(matches!(
        service.submit_move(&code, sq("e2"), sq("e4"), Color::White).await,
        Err(SessionError::NotActive { .. })
    ));
}

#[tokio::test]
async fn test_snapshot_with_legal_moves_accepted() {
    let (service, _) = service();
    let code = active_game(&service).await;
    let mut session = service.get_session(&code).await.unwrap();

    let board = chess_rules::apply_move(&session.board(), sq("e2"), sq("e4"));
    let board = chess_rules::apply_move(&board, sq("e7"), sq("e5"));
    session.board = BoardState::Position(board);
    session.move_history = vec!["e2 → e4".to_string(), "e7 → e5".to_string()];

    let stored = service.replace_snapshot(&code, session).await.unwrap();
    assert_eq!(stored.move_history.len(), 2);
    assert_eq!(stored.current_turn, Color::White);
}

#[tokio::test]
async fn test_snapshot_cannot_revive_resigned_game() {
    let (service, _) = service();
    let code = active_game(&service).await;
    service
        .submit_move(&code, sq("e2"), sq("e4"), Color::White)
        .await
        .unwrap();
    let resigned = service.resign(&code, Color::Black).await.unwrap();

    let mut revived = resigned.clone();
    revived.status = SessionStatus::Active;
    revived.winner = None;
    revived.move_history.clear();
    revived.board = BoardState::Position(
        resigned
            .board()
            .with(sq("e8"), Piece::new(PieceKind::Queen, Color::White)),
    );

    let err = service.replace_snapshot(&code, revived).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::NotActive {
            status: SessionStatus::Resigned,
            ..
        }
    ));

    let session = service.get_session(&code).await.unwrap();
    assert_eq!(session, resigned, "Resigned game must stay as it was");
    assert!(service
        .submit_move(&code, sq("e7"), sq("e5"), Color::Black)
        .await
        .is_err());
}

#[tokio::test]
async fn test_snapshot_cannot_rewrite_history() {
    let (service, _) = service();
    let code = active_game(&service).await;
    let played = service
        .submit_move(&code, sq("e2"), sq("e4"), Color::White)
        .await
        .unwrap()
        .session;

    let mut rewritten = played.clone();
    rewritten.move_history = vec!["d2 → d4".to_string()];
    rewritten.board = BoardState::Position(chess_rules::apply_move(
        &Board::initial(),
        sq("d2"),
        sq("d4"),
    ));
    let err = service.replace_snapshot(&code, rewritten).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidRequest(_)));

    let mut cleared = played.clone();
    cleared.move_history.clear();
    let err = service.replace_snapshot(&code, cleared).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_snapshot_rejects_illegal_appended_move() {
    let (service, _) = service();
    let code = active_game(&service).await;
    let mut session = service.get_session(&code).await.unwrap();

    // Pawn three squares forward
    session.board = BoardState::Position(chess_rules::apply_move(
        &session.board(),
        sq("e2"),
        sq("e5"),
    ));
    session.current_turn = Color::Black;
    session.move_history.push("e2 → e5".to_string());

    let err = service.replace_snapshot(&code, session).await.unwrap_err();
    assert!(matches!(err, SessionError::IllegalMove { .. }));
}

#[tokio::test]
async fn test_snapshot_board_must_match_history() {
    let (service, _) = service();
    let code = active_game(&service).await;

    // Extra queen with no move to account for it
    let mut session = service.get_session(&code).await.unwrap();
    session.board = BoardState::Position(
        session
            .board()
            .with(sq("e5"), Piece::new(PieceKind::Queen, Color::White)),
    );
    let err = service.replace_snapshot(&code, session).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidRequest(_)));

    // Turn handed to black without a move
    let mut session = service.get_session(&code).await.unwrap();
    session.current_turn = Color::Black;
    let err = service.replace_snapshot(&code, session).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_snapshot_fixed_fields_and_status_order() {
    let (service, _) = service();
    let code = active_game(&service).await;

    let mut session = service.get_session(&code).await.unwrap();
    session.creator_color = Color::Black;
    let err = service.replace_snapshot(&code, session).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidRequest(_)));

    let mut session = service.get_session(&code).await.unwrap();
    session.status = SessionStatus::Waiting;
    let err = service.replace_snapshot(&code, session).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_snapshot_moves_need_active_game() {
    let (service, _) = service();
    let binding = service.create_session(Color::White).await.unwrap();
    let mut session = service.get_session(&binding.code).await.unwrap();

    session.board = BoardState::Position(chess_rules::apply_move(
        &session.board(),
        sq("e2"),
        sq("e4"),
    ));
    session.current_turn = Color::Black;
    session.move_history.push("e2 → e4".to_string());

    let err = service
        .replace_snapshot(&binding.code, session)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::NotActive {
            status: SessionStatus::Waiting,
            ..
        }
    ));
}

// ============================================================================
// Versions
// ============================================================================

#[tokio::test]
async fn test_import_resets_client_version() {
    let (service, _) = service();
    let code = GameCode::parse("HJKMNP").unwrap();
    let mut session = GameSession::new(Color::White, chrono::Utc::now());
    session.version = u64::MAX;

    service.import_session(&code, session).await.unwrap();
    assert_eq!(service.version(&code).await.unwrap(), 0);

    let (_, joined) = service.join_session(&code).await.unwrap();
    assert_eq!(joined.version, 1);
}

#[tokio::test]
async fn test_version_overflow_is_a_conflict() {
    let (service, store) = service();
    let code = GameCode::parse("HJKMNP").unwrap();
    let mut session = GameSession::new(Color::White, chrono::Utc::now());
    session.version = u64::MAX;
    store.create(&code, &session).await.unwrap();

    let err = service.join_session(&code).await.unwrap_err();
    assert!(matches!(err, SessionError::Conflict(_)), "got {:?}", err);
}
