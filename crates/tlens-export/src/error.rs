//! Export error types.

use thiserror::Error;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("Image decoding failed: {0}")]
    Image(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Create a chart rendering error.
    pub fn chart(message: impl Into<String>) -> Self {
        Self::Chart(message.into())
    }

    /// Create an image decoding error.
    pub fn image(message: impl Into<String>) -> Self {
        Self::Image(message.into())
    }
}
