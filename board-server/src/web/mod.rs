//! Web layer for the departure board.
//!
//! Exposes the lookup engine over HTTP: a JSON API, a server-sent
//! stream for current-time mode, and the board page itself.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::{AppState, NotReady, Tables, TimetableStore};
