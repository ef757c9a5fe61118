//! Pose landmark models.
//!
//! Landmarks come back from the pose-estimation service in normalized
//! [0, 1] image coordinates, indexed MediaPipe-style (33 body joints).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Number of body landmarks in a full pose.
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Landmark index of the left hip.
pub const LEFT_HIP: usize = 23;

/// Landmark index of the right hip.
pub const RIGHT_HIP: usize = 24;

/// One normalized body-joint position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Landmark {
    /// Horizontal position, normalized to [0, 1]
    pub x: f64,
    /// Vertical position, normalized to [0, 1]
    pub y: f64,
    /// Depth relative to the hips (optional, model-dependent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Detection confidence for this joint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            visibility: None,
        }
    }
}

/// Ordered landmark collection for one frame where a pose was detected.
///
/// Consumed immediately by the metric extractor; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LandmarkSet {
    pub landmarks: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Get a landmark by index, if present.
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Midpoint of the two hip landmarks, used as the player-position proxy.
    ///
    /// Returns `None` if either hip landmark is missing from the set.
    pub fn hip_midpoint(&self) -> Option<HipMidpoint> {
        let left = self.get(LEFT_HIP)?;
        let right = self.get(RIGHT_HIP)?;
        Some(HipMidpoint {
            x: (left.x + right.x) / 2.0,
            y: (left.y + right.y) / 2.0,
        })
    }
}

/// Average of the left/right hip landmarks for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HipMidpoint {
    pub x: f64,
    pub y: f64,
}

impl HipMidpoint {
    /// Euclidean distance to another midpoint, in normalized image units.
    pub fn distance_to(&self, other: &HipMidpoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_pose(left: Landmark, right: Landmark) -> LandmarkSet {
        let mut landmarks = vec![Landmark::new(0.0, 0.0); POSE_LANDMARK_COUNT];
        landmarks[LEFT_HIP] = left;
        landmarks[RIGHT_HIP] = right;
        LandmarkSet::new(landmarks)
    }

    #[test]
    fn test_hip_midpoint_is_average() {
        let set = full_pose(Landmark::new(0.4, 0.6), Landmark::new(0.6, 0.4));
        let mid = set.hip_midpoint().unwrap();
        assert!((mid.x - 0.5).abs() < 1e-9);
        assert!((mid.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_hip_midpoint_missing_landmarks() {
        let set = LandmarkSet::new(vec![Landmark::new(0.5, 0.5)]);
        assert!(set.hip_midpoint().is_none());
    }

    #[test]
    fn test_distance() {
        let a = HipMidpoint { x: 0.40, y: 0.50 };
        let b = HipMidpoint { x: 0.42, y: 0.50 };
        assert!((a.distance_to(&b) - 0.02).abs() < 1e-12);
    }
}
