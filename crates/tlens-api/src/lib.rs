//! Axum HTTP API server.
//!
//! This crate provides:
//! - Multipart upload endpoint running the full analysis pipeline
//! - Chart and document retrieval for completed runs
//! - Security headers, request IDs, and CORS

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
