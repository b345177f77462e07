//! semstore API crate - axum HTTP server and route handlers.
//!
//! Exposes bulk-embed (`POST /embed`), similarity query (`POST /query`) and
//! a health check over the shared chunk store.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
