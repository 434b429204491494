//! Knight movement
//!
//! Knights move two squares along one axis and one along the other. They
//! jump, so occupancy between origin and target is never checked.

use super::sliding::deltas;
use crate::square::Square;

pub(super) fn is_valid_knight_move(from: Square, to: Square) -> bool {
    matches!(deltas(from, to), (1, 2) | (2, 1))
}
