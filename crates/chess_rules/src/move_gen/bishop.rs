//! Bishop movement

use super::sliding::{deltas, is_path_clear};
use crate::board::Board;
use crate::square::Square;

pub(super) fn is_valid_bishop_move(board: &Board, from: Square, to: Square) -> bool {
    let (d_rank, d_file) = deltas(from, to);

    // Must move diagonally
    if d_rank != d_file || d_rank == 0 {
        return false;
    }

    is_path_clear(board, from, to)
}
