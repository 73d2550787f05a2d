//! Web layer for the longest-direct service.
//!
//! Provides the JSON API and adapts the transport.rest client to the finder.

mod dto;
mod provider;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, DEFAULT_CORS_ORIGINS, create_router};
pub use state::AppState;
