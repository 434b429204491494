//! Pawn movement
//!
//! White pawns advance toward rank index 0, black pawns toward rank index 7.
//!
//! - One step forward onto an empty square.
//! - Two steps forward from the home rank (6 for white, 1 for black) when
//!   both the square passed over and the landing square are empty.
//! - One step diagonally forward, only onto an opposing piece.
//!
//! No en passant and no promotion.

use crate::board::Board;
use crate::square::Square;
use crate::types::Color;

pub(super) fn is_valid_pawn_move(board: &Board, from: Square, to: Square, color: Color) -> bool {
    let direction = color.pawn_direction();
    let d_rank = to.rank_index() as i8 - from.rank_index() as i8;
    let d_file = to.file_index() as i8 - from.file_index() as i8;

    // Forward moves never capture
    if d_file == 0 {
        if !board.is_empty(to) {
            return false;
        }
        if d_rank == direction {
            return true;
        }
        if d_rank == 2 * direction && from.rank_index() == color.pawn_home_rank() {
            return from
                .offset(direction, 0)
                .is_some_and(|passed| board.is_empty(passed));
        }
        return false;
    }

    // Diagonal capture onto an opposing piece only
    if d_file.abs() == 1 && d_rank == direction {
        return board.color_at(to) == Some(color.opposite());
    }

    false
}
