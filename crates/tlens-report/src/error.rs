//! Report generation error types.
//!
//! These never escape [`crate::ReportGenerator::generate`]; they exist so
//! the failure reason embedded into the degraded report is precise, and so
//! a timeout reads differently from a generic transport failure.

use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Gemini API returned {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    InvalidResponse(String),
}
