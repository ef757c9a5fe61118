//! Pose client error types.

use thiserror::Error;

pub type PoseResult<T> = Result<T, PoseError>;

#[derive(Debug, Error)]
pub enum PoseError {
    #[error("Pose service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
