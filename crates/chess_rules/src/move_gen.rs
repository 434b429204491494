//! Move legality, move listing and move application
//!
//! [`is_legal`] is a pure function of a board and two squares. It does not
//! know whose turn it is, whether the game is over, or whether the move
//! leaves the mover's own king in check.
//!
//! Two checks run before any piece-specific rule:
//! 1. There must be a piece on `from`.
//! 2. The target must not hold a piece of the mover's color.
//!
//! Each piece type then has its own rule in a submodule.

mod bishop;
mod king;
mod knight;
mod pawn;
mod queen;
mod rook;
mod sliding;

use crate::board::Board;
use crate::square::Square;
use crate::types::PieceKind;

/// Whether the piece on `from` may move to `to` on `board`
pub fn is_legal(board: &Board, from: Square, to: Square) -> bool {
    if from == to {
        return false;
    }

    let Some(piece) = board.get(from) else {
        return false;
    };

    // Can't capture your own pieces
    if board.color_at(to) == Some(piece.color) {
        return false;
    }

    match piece.kind {
        PieceKind::Pawn => pawn::is_valid_pawn_move(board, from, to, piece.color),
        PieceKind::Rook => rook::is_valid_rook_move(board, from, to),
        PieceKind::Knight => knight::is_valid_knight_move(from, to),
        PieceKind::Bishop => bishop::is_valid_bishop_move(board, from, to),
        PieceKind::Queen => queen::is_valid_queen_move(board, from, to),
        PieceKind::King => king::is_valid_king_move(from, to),
    }
}

/// Every square the piece on `from` may legally move to.
///
/// Scans rank index 0..7 then file index 0..7, so the order is stable for
/// identical input. Returns an empty list for an empty square.
pub fn possible_moves(board: &Board, from: Square) -> Vec<Square> {
    if board.is_empty(from) {
        return Vec::new();
    }

    Square::all()
        .filter(|&to| to != from && is_legal(board, from, to))
        .collect()
}

/// Relocate the piece on `from` to `to`, capturing whatever stood there.
///
/// The move is not validated: callers must check [`is_legal`] first.
/// Applying an illegal move produces a board no legal game could reach.
pub fn apply_move(board: &Board, from: Square, to: Square) -> Board {
    let mut next = *board;
    let piece = next.get(from);
    next.set(to, piece);
    next.set(from, None);
    next
}
