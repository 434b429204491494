//! Terminal presentation of a game snapshot

use chess_rules::{Color, Square};
use shared::{GameSession, PlayerBinding, SessionStatus};
use std::fmt::Write;

/// One-line status as seen by the player holding `color`
pub fn status_text(session: &GameSession, color: Color) -> String {
    match session.status {
        SessionStatus::Waiting => "Waiting for opponent to join...".to_string(),
        SessionStatus::Active if session.current_turn == color => "Your turn".to_string(),
        SessionStatus::Active => "Opponent's turn".to_string(),
        SessionStatus::Checkmate => match session.winner {
            Some(winner) => format!("Game over: checkmate, {} wins", winner),
            None => "Game over: checkmate".to_string(),
        },
        SessionStatus::Stalemate => "Game over: stalemate, the game is a draw".to_string(),
        SessionStatus::Resigned => match session.winner {
            Some(winner) if winner == color => "Game over: your opponent resigned".to_string(),
            Some(winner) => format!("Game over: you resigned, {} wins", winner),
            None => "Game over: a player resigned".to_string(),
        },
    }
}

/// Move history as numbered pairs, e.g. `1. e2 → e4   e7 → e5`
pub fn history_lines(moves: &[String]) -> Vec<String> {
    moves
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| match pair {
            [white, black] => format!("{}. {:<10} {}", i + 1, white, black),
            _ => format!("{}. {}", i + 1, pair[0]),
        })
        .collect()
}

/// Full view of a game for one player: board, status and history
pub fn render_game(session: &GameSession, binding: &PlayerBinding) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Game {} - you play {}", binding.code, binding.color);
    out.push('\n');
    out.push_str(&session.board().render(binding.color));
    out.push('\n');
    let _ = writeln!(out, "{}", status_text(session, binding.color));

    if !session.move_history.is_empty() {
        out.push('\n');
        for line in history_lines(&session.move_history) {
            let _ = writeln!(out, "{}", line);
        }
    }
    out
}

/// Legal targets from one square, e.g. `g1: f3 h3`
pub fn moves_text(from: Square, targets: &[Square]) -> String {
    if targets.is_empty() {
        return format!("{}: no legal moves", from);
    }
    let targets: Vec<String> = targets.iter().map(|s| s.to_algebraic()).collect();
    format!("{}: {}", from, targets.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::GameCode;

    fn session(status: SessionStatus) -> GameSession {
        let mut session = GameSession::new(Color::White, Utc::now());
        session.status = status;
        session
    }

    #[test]
    fn test_status_text_turns() {
        let active = session(SessionStatus::Active);
        assert_eq!(status_text(&active, Color::White), "Your turn");
        assert_eq!(status_text(&active, Color::Black), "Opponent's turn");
        assert_eq!(
            status_text(&session(SessionStatus::Waiting), Color::White),
            "Waiting for opponent to join..."
        );
    }

    #[test]
    fn test_status_text_resigned() {
        let mut resigned = session(SessionStatus::Resigned);
        resigned.winner = Some(Color::Black);
        assert_eq!(
            status_text(&resigned, Color::White),
            "Game over: you resigned, black wins"
        );
        assert_eq!(
            status_text(&resigned, Color::Black),
            "Game over: your opponent resigned"
        );
    }

    #[test]
    fn test_history_lines_numbered() {
        let moves: Vec<String> = ["e2 → e4", "e7 → e5", "g1 → f3"]
            .iter()
            .map(|m| m.to_string())
            .collect();
        let lines = history_lines(&moves);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1. e2 → e4"));
        assert!(lines[0].ends_with("e7 → e5"));
        assert_eq!(lines[1], "2. g1 → f3");
    }

    #[test]
    fn test_render_game_includes_status() {
        let binding = PlayerBinding {
            code: GameCode::parse("ABCDEF").unwrap(),
            color: Color::Black,
            is_creator: false,
        };
        let text = render_game(&session(SessionStatus::Active), &binding);
        assert!(text.starts_with("Game ABCDEF - you play black"));
        assert!(text.contains("Opponent's turn"));
    }

    #[test]
    fn test_moves_text() {
        let from: Square = "g1".parse().unwrap();
        let targets = vec!["f3".parse().unwrap(), "h3".parse().unwrap()];
        assert_eq!(moves_text(from, &targets), "g1: f3 h3");
        assert_eq!(moves_text(from, &[]), "g1: no legal moves");
    }
}
