//! Web layer for the metro network.
//!
//! Provides HTTP endpoints for browsing lines and finding routes.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
