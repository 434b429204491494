//! Board representation
//!
//! An 8x8 grid indexed `[rank_index][file_index]`, each cell empty or holding
//! one [`Piece`]. The board is `Copy`: every change produces a new value, so
//! two retained boards never alias.
//!
//! No invariant is enforced on piece counts; a board may hold zero or several
//! kings of one color.

use crate::error::{RulesError, RulesResult};
use crate::square::Square;
use crate::types::{Color, Piece, PieceKind};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Grid = [[Option<Piece>; 8]; 8];

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Serialized as the bare 8x8 array of `{type, color}` / `null` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    grid: Grid,
}

impl Board {
    /// A board with no pieces
    pub fn empty() -> Self {
        Board {
            grid: [[None; 8]; 8],
        }
    }

    /// The standard starting position
    pub fn initial() -> Self {
        let mut grid: Grid = [[None; 8]; 8];
        for (file, kind) in BACK_ROW.iter().enumerate() {
            grid[0][file] = Some(Piece::new(*kind, Color::Black));
            grid[1][file] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            grid[6][file] = Some(Piece::new(PieceKind::Pawn, Color::White));
            grid[7][file] = Some(Piece::new(*kind, Color::White));
        }
        Board { grid }
    }

    pub fn from_grid(grid: Grid) -> Self {
        Board { grid }
    }

    /// Build a board from untrusted rows, checking the 8x8 shape
    pub fn from_rows(rows: Vec<Vec<Option<Piece>>>) -> RulesResult<Self> {
        if rows.len() != 8 {
            return Err(RulesError::InvalidBoardShape { rows: rows.len() });
        }
        let mut grid: Grid = [[None; 8]; 8];
        for (rank, row) in rows.into_iter().enumerate() {
            if row.len() != 8 {
                return Err(RulesError::InvalidRowLength {
                    rank,
                    len: row.len(),
                });
            }
            for (file, cell) in row.into_iter().enumerate() {
                grid[rank][file] = cell;
            }
        }
        Ok(Board { grid })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        self.grid[square.rank_index()][square.file_index()]
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    /// Color of the piece on `square`, if any
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.get(square).map(|piece| piece.color)
    }

    /// Place or clear a square in place
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.grid[square.rank_index()][square.file_index()] = piece;
    }

    /// Builder-style placement, handy for setting up positions
    pub fn with(mut self, square: Square, piece: Piece) -> Self {
        self.set(square, Some(piece));
        self
    }

    /// Occupied squares in scan order (rank index 0..7, file index 0..7)
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |square| self.get(square).map(|piece| (square, piece)))
    }

    /// Render with `perspective` at the bottom of the diagram
    pub fn render(&self, perspective: Color) -> String {
        let ranks: Vec<usize> = match perspective {
            Color::White => (0..8).collect(),
            Color::Black => (0..8).rev().collect(),
        };
        let files: Vec<usize> = match perspective {
            Color::White => (0..8).collect(),
            Color::Black => (0..8).rev().collect(),
        };

        let mut out = String::new();
        for &rank in &ranks {
            out.push_str(&format!("{} ", 8 - rank));
            for &file in &files {
                let symbol = self.grid[rank][file].map_or('.', Piece::symbol);
                out.push(symbol);
                out.push(' ');
            }
            out.pop();
            out.push('\n');
        }
        out.push_str("  ");
        let labels: Vec<String> = files
            .iter()
            .map(|&f| ((b'a' + f as u8) as char).to_string())
            .collect();
        out.push_str(&labels.join(" "));
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Color::White))
    }
}
