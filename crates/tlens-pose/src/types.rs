//! Pose service request/response types.

use serde::{Deserialize, Serialize};
use tlens_models::Landmark;

/// Response from one frame's pose detection.
///
/// `landmarks` is `null` when no pose was found in the frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseResponse {
    pub landmarks: Option<Vec<Landmark>>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
}
