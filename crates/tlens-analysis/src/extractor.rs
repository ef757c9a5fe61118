//! Metric accumulator.

use tlens_models::{HipMidpoint, LandmarkSet, MetricSeries};

/// Unit conversion applied to normalized displacement per second.
///
/// The factor labels the result "km/h"; hip coordinates are unitless image
/// fractions, so the unit is nominal rather than physical. Kept because the
/// displayed scale is calibrated to it.
pub const SPEED_UNIT_FACTOR: f64 = 3.6;

/// Lower bound of the placeholder pass-accuracy estimate (percent).
const ACCURACY_MIN: f64 = 70.0;

/// Upper bound of the placeholder pass-accuracy estimate (percent).
const ACCURACY_MAX: f64 = 100.0;

/// Fold state for per-frame metric extraction.
///
/// Holds the only cross-frame state in the pipeline: the previous frame's
/// hip midpoint, overwritten whenever a pose is detected. Frames without a
/// detected pose contribute nothing to either sequence, so the series index
/// is the detected-pose ordinal, not the frame number.
#[derive(Debug)]
pub struct MetricAccumulator {
    frame_interval_secs: f64,
    prev_midpoint: Option<HipMidpoint>,
    series: MetricSeries,
}

impl MetricAccumulator {
    /// Create an accumulator for a video with the given inter-frame time
    /// (`1 / declared fps`, constant per video).
    pub fn new(frame_interval_secs: f64) -> Self {
        Self {
            frame_interval_secs,
            prev_midpoint: None,
            series: MetricSeries::new(),
        }
    }

    /// Fold one frame's detection result into the series.
    ///
    /// Speed is the normalized hip-midpoint displacement over the frame
    /// interval, scaled by [`SPEED_UNIT_FACTOR`]; the first detected pose
    /// has no reference point and always scores 0.
    pub fn push(&mut self, landmarks: Option<&LandmarkSet>) {
        let Some(set) = landmarks else {
            return;
        };
        let Some(midpoint) = set.hip_midpoint() else {
            // A landmark set without both hips gives us no position proxy;
            // treat it like an undetected pose.
            return;
        };

        let speed = match &self.prev_midpoint {
            Some(prev) => {
                midpoint.distance_to(prev) / self.frame_interval_secs * SPEED_UNIT_FACTOR
            }
            None => 0.0,
        };

        self.series.push(speed, placeholder_accuracy());
        self.prev_midpoint = Some(midpoint);
    }

    /// Number of detected-pose samples so far.
    pub fn samples(&self) -> usize {
        self.series.len()
    }

    /// Consume the accumulator, yielding the finished series.
    pub fn finish(self) -> MetricSeries {
        self.series
    }
}

/// Placeholder pass-accuracy estimate.
///
/// A real pass-detection signal was never built; this is uniform noise in
/// [70, 100] emitted whenever a pose is present, derived from no geometric
/// property of the landmarks. Kept as an explicitly labeled stub rather
/// than an invented algorithm.
fn placeholder_accuracy() -> f64 {
    use rand::Rng;
    rand::rng().random_range(ACCURACY_MIN..=ACCURACY_MAX)
}
