//! Square coordinates
//!
//! A square is named either in algebraic notation (`"e4"`) or by a zero-based
//! `(rank_index, file_index)` pair as stored in the board grid. Rank index 0
//! is the eighth rank (black's back rank) and file index 0 is file 'a', so
//! `"a8"` is `(0, 0)` and `"h1"` is `(7, 7)`.

use crate::error::{RulesError, RulesResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const FILES: &[u8; 8] = b"abcdefgh";

/// A validated board square. Both indices are always in 0..8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    /// Create a square from grid indices
    ///
    /// # Examples
    ///
    /// ```
    /// use chess_rules::Square;
    /// let square = Square::new(4, 4).unwrap();
    /// assert_eq!(square.to_algebraic(), "e4");
    /// ```
    pub fn new(rank_index: usize, file_index: usize) -> RulesResult<Self> {
        if rank_index > 7 || file_index > 7 {
            return Err(RulesError::IndexOutOfRange {
                rank: rank_index,
                file: file_index,
            });
        }
        Ok(Square {
            rank: rank_index as u8,
            file: file_index as u8,
        })
    }

    /// Parse algebraic notation. The file letter may be upper or lower case.
    pub fn from_algebraic(s: &str) -> RulesResult<Self> {
        let invalid = || RulesError::InvalidSquare(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }

        let file_char = bytes[0].to_ascii_lowercase();
        let file = FILES
            .iter()
            .position(|&f| f == file_char)
            .ok_or_else(invalid)?;

        let rank_number = match bytes[1] {
            d @ b'1'..=b'8' => (d - b'0') as usize,
            _ => return Err(invalid()),
        };

        Square::new(8 - rank_number, file)
    }

    /// Convert to algebraic notation (e.g. `"e4"`)
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_number())
    }

    pub fn rank_index(self) -> usize {
        self.rank as usize
    }

    pub fn file_index(self) -> usize {
        self.file as usize
    }

    /// `(rank_index, file_index)` pair
    pub fn indices(self) -> (usize, usize) {
        (self.rank_index(), self.file_index())
    }

    /// File letter 'a'-'h'
    pub fn file_char(self) -> char {
        FILES[self.file as usize] as char
    }

    /// Rank number 1-8 as written in algebraic notation
    pub fn rank_number(self) -> u8 {
        8 - self.rank
    }

    /// Square offset by a signed number of ranks and files, if still on the board
    pub fn offset(self, d_rank: i8, d_file: i8) -> Option<Self> {
        let rank = self.rank as i8 + d_rank;
        let file = self.file as i8 + d_file;
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Some(Square {
                rank: rank as u8,
                file: file as u8,
            })
        } else {
            None
        }
    }

    /// All 64 squares in scan order: rank index 0..7, file index 0..7
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Square { rank, file }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_number())
    }
}

impl FromStr for Square {
    type Err = RulesError;

    fn from_str(s: &str) -> RulesResult<Self> {
        Square::from_algebraic(s)
    }
}

impl TryFrom<String> for Square {
    type Error = RulesError;

    fn try_from(value: String) -> RulesResult<Self> {
        Square::from_algebraic(&value)
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_algebraic()
    }
}

/// Convert algebraic notation to `(rank_index, file_index)`
pub fn to_indices(square: &str) -> RulesResult<(usize, usize)> {
    Square::from_algebraic(square).map(Square::indices)
}

/// Convert `(rank_index, file_index)` to algebraic notation
pub fn to_square(rank_index: usize, file_index: usize) -> RulesResult<String> {
    Square::new(rank_index, file_index).map(Square::to_algebraic)
}
