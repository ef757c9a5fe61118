//! Scouting report generation.
//!
//! Formats the metric means and player profile into a structured prompt
//! and delegates narrative generation to Google's Gemini API. Exactly one
//! call is made per report; every failure mode degrades into a tagged
//! [`tlens_models::ScoutingReport`] variant instead of escaping as an
//! error, so the pipeline always continues to the chart and export stages.

pub mod error;
pub mod gemini;
pub mod prompt;

pub use error::{ReportError, ReportResult};
pub use gemini::{ReportConfig, ReportGenerator};
pub use prompt::build_prompt;
