//! King-in-check detection
//!
//! Only answers "is this king attacked right now". Checkmate and stalemate
//! are not detected anywhere, and the session server never changes a game's
//! status because of check.

use crate::board::Board;
use crate::move_gen::is_legal;
use crate::square::Square;
use crate::types::{Color, PieceKind};

/// First king of `color` in scan order, if the board has one
pub fn find_king(board: &Board, color: Color) -> Option<Square> {
    board
        .pieces()
        .find(|(_, piece)| piece.kind == PieceKind::King && piece.color == color)
        .map(|(square, _)| square)
}

/// Whether the king of `color` could be captured by any opposing piece.
///
/// A board without a king of `color` is never in check.
pub fn in_check(board: &Board, color: Color) -> bool {
    let Some(king) = find_king(board, color) else {
        return false;
    };

    board
        .pieces()
        .filter(|(_, piece)| piece.color != color)
        .any(|(square, _)| is_legal(board, square, king))
}
