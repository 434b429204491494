//! King movement: one square in any direction. No castling.

use super::sliding::deltas;
use crate::square::Square;

pub(super) fn is_valid_king_move(from: Square, to: Square) -> bool {
    let (d_rank, d_file) = deltas(from, to);
    d_rank <= 1 && d_file <= 1 && (d_rank, d_file) != (0, 0)
}
