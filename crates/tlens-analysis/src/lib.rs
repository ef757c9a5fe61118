//! Per-frame metric extraction.
//!
//! Consumes the frame source and the pose-estimation boundary and produces
//! the two parallel metric sequences (speed, pass accuracy) plus their
//! means. All cross-frame state is the explicit accumulator in
//! [`extractor::MetricAccumulator`]; nothing is retained across runs.

pub mod error;
pub mod extractor;
pub mod pipeline;

pub use error::{AnalysisError, AnalysisResult};
pub use extractor::{MetricAccumulator, SPEED_UNIT_FACTOR};
pub use pipeline::{analyze_video, VideoAnalysis};
