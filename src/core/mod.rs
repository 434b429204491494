//! Core module - client errors and local persistence
//!
//! - [`ClientError`] / [`ClientResult`] - Error type shared by every client operation
//! - [`BindingStore`] - Durable record of which color this machine plays per game

pub mod error;
pub mod player_binding;

pub use error::{ClientError, ClientResult};
pub use player_binding::{default_bindings_path, BindingStore};
