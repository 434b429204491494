//! Rook movement
//!
//! Rooks move along a rank or a file and cannot jump: every square between
//! origin and target must be empty.

use super::sliding::is_path_clear;
use crate::board::Board;
use crate::square::Square;

pub(super) fn is_valid_rook_move(board: &Board, from: Square, to: Square) -> bool {
    // Must move horizontally or vertically
    if from.rank_index() != to.rank_index() && from.file_index() != to.file_index() {
        return false;
    }

    is_path_clear(board, from, to)
}
