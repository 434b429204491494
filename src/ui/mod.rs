//! UI module - terminal rendering for the CLI
//!
//! - **game_ui**: Board from the player's side, status line, numbered move history

pub mod game_ui;

pub use game_ui::{history_lines, moves_text, render_game, status_text};
