//! Client for the external pose-estimation service.
//!
//! The pose model (MediaPipe-style body landmarks) runs as a separate
//! service; this crate sends one JPEG frame per call and receives an
//! optional normalized landmark set back. The service is a black box:
//! there is no retry or fallback here. A failed call fails that frame
//! only, and the extractor decides what to do with it.

pub mod client;
pub mod error;
pub mod types;

pub use client::{PoseClient, PoseClientConfig, PoseEstimator};
pub use error::{PoseError, PoseResult};
