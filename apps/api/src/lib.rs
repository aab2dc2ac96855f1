//! # Forecourt API
//!
//! HTTP layer over `forecourt-db`. See [`routes`] for the route map and
//! response envelope, [`error`] for the status-code mapping.
//!
//! Exposed as a library so integration tests can drive the router without a
//! socket.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;
