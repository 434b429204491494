//! Error types for chess rules
//!
//! The rules themselves never fail; errors only come from turning untrusted
//! input (square names, serialized boards) into rules types.

use thiserror::Error;

/// Errors that can occur while building rules types from external input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// Square name is not a file letter 'a'-'h' followed by a rank digit '1'-'8'
    #[error("Invalid square: {0:?}")]
    InvalidSquare(String),

    /// Rank or file index outside 0-7
    #[error("Square indices out of range: rank {rank}, file {file}")]
    IndexOutOfRange { rank: usize, file: usize },

    /// Unknown color name
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    /// Board grid is not 8 rows of 8 cells
    #[error("Board must be 8x8, found {rows} rows")]
    InvalidBoardShape { rows: usize },

    /// A board row does not hold exactly 8 cells
    #[error("Board row {rank} has {len} cells, expected 8")]
    InvalidRowLength { rank: usize, len: usize },
}

/// Result type alias for rules operations
pub type RulesResult<T> = Result<T, RulesError>;
