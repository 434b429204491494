//! Path checks shared by rooks, bishops and queens

use crate::board::Board;
use crate::square::Square;

/// True when every square strictly between `from` and `to` is empty.
///
/// `from` and `to` must share a rank, a file or a diagonal; the walk steps
/// one square at a time toward `to`.
pub(super) fn is_path_clear(board: &Board, from: Square, to: Square) -> bool {
    let d_rank = (to.rank_index() as i8 - from.rank_index() as i8).signum();
    let d_file = (to.file_index() as i8 - from.file_index() as i8).signum();

    let mut current = from;
    loop {
        current = match current.offset(d_rank, d_file) {
            Some(next) => next,
            None => return false,
        };
        if current == to {
            return true;
        }
        if !board.is_empty(current) {
            return false;
        }
    }
}

/// Absolute rank and file distances between two squares
pub(super) fn deltas(from: Square, to: Square) -> (usize, usize) {
    (
        from.rank_index().abs_diff(to.rank_index()),
        from.file_index().abs_diff(to.file_index()),
    )
}
