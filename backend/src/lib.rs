//! Session server for two-player chess games identified by short codes
//!
//! - `store` - Persistence behind the [`store::SessionStore`] trait
//! - `session` - The [`session::SessionService`] state machine
//! - `api` - axum router over the service
//! - `code` - Game code generation
//! - `config` - Environment configuration
//! - `error` - [`error::SessionError`] and its HTTP mapping

pub mod api;
pub mod code;
pub mod config;
pub mod error;
pub mod session;
pub mod store;

pub use config::ServerConfig;
pub use error::{SessionError, SessionResult};
pub use session::{MoveOutcome, SessionService};
