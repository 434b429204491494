//! Queen movement: the union of the rook and bishop rules

use super::bishop::is_valid_bishop_move;
use super::rook::is_valid_rook_move;
use crate::board::Board;
use crate::square::Square;

pub(super) fn is_valid_queen_move(board: &Board, from: Square, to: Square) -> bool {
    is_valid_rook_move(board, from, to) || is_valid_bishop_move(board, from, to)
}
