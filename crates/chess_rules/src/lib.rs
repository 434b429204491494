//! Chess rules - pure board logic shared by the session server and clients
//!
//! Everything here is a pure function of a [`Board`] value. Nothing consults
//! whose turn it is or what state a session is in; turn order and session
//! status are enforced one layer up, in the backend's session service.
//!
//! # Module Structure
//!
//! - `square` - Algebraic notation <-> (rank index, file index)
//! - `types` - Piece colors and kinds
//! - `board` - 8x8 grid of optional pieces
//! - `move_gen` - Per-piece legality rules, move listing and move application
//! - `check` - King-in-check detection
//!
//! Castling, en passant and promotion are not modelled.

pub mod board;
pub mod check;
pub mod error;
pub mod move_gen;
pub mod square;
pub mod types;


pub use board::Board;
pub use check::{find_king, in_check};
pub use error::{RulesError, RulesResult};
pub use move_gen::{apply_move, is_legal, possible_moves};
pub use square::{to_indices, to_square, Square};
pub use types::{Color, Piece, PieceKind};
