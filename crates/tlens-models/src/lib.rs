//! Shared data models for the TalentLens backend.
//!
//! This crate provides Serde-serializable types for:
//! - Player profiles and field positions
//! - Pose landmarks and the hip-midpoint position proxy
//! - Per-run metric series (speed, pass accuracy)
//! - Scouting report outcomes
//! - Analysis run identifiers

pub mod analysis;
pub mod landmarks;
pub mod metrics;
pub mod profile;
pub mod report;

// Re-export common types
pub use analysis::AnalysisId;
pub use landmarks::{HipMidpoint, Landmark, LandmarkSet, LEFT_HIP, POSE_LANDMARK_COUNT, RIGHT_HIP};
pub use metrics::MetricSeries;
pub use profile::{PlayerProfile, Position};
pub use report::ScoutingReport;
