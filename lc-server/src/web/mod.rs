//! Web layer for the linked connections server.
//!
//! Serves the paginated connections feed and identifier lookups as
//! JSON-LD.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
