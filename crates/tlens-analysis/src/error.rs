//! Analysis error types.

use thiserror::Error;

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that abort an analysis run.
///
/// Per-frame pose failures are not here: they fail only the frame they
/// occurred on and never abort the sequence.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Media error: {0}")]
    Media(#[from] tlens_media::MediaError),
}
