//! HTTP request handler layer for relmap.
//!
//! # Responsibility
//! - Decode JSON requests into transient entity graphs.
//! - Hand them to the core services and map results to HTTP responses.
//!
//! # Invariants
//! - Handlers never hold the store lock across an `.await`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use router::{router, serve};
pub use state::AppState;
