//! Per-run metric series.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Two parallel metric sequences produced across detected-pose frames.
///
/// The index is the detected-pose ordinal, not the frame number: frames
/// where no pose was detected contribute nothing, so the series may be
/// shorter than the number of frames read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricSeries {
    /// Instantaneous speed per detected-pose frame ("km/h"-labeled units)
    pub speeds: Vec<f64>,
    /// Instantaneous pass-accuracy estimate per detected-pose frame (percent)
    pub accuracies: Vec<f64>,
}

impl MetricSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sample to both sequences, keeping them index-aligned.
    pub fn push(&mut self, speed: f64, accuracy: f64) {
        self.speeds.push(speed);
        self.accuracies.push(accuracy);
    }

    /// Number of detected-pose samples.
    pub fn len(&self) -> usize {
        self.speeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speeds.is_empty()
    }

    /// Mean speed; 0 when no pose was ever detected.
    pub fn mean_speed(&self) -> f64 {
        mean(&self.speeds)
    }

    /// Mean pass accuracy; 0 when no pose was ever detected.
    pub fn mean_accuracy(&self) -> f64 {
        mean(&self.accuracies)
    }
}

/// Arithmetic mean, defaulting to 0 for an empty slice.
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series_means_default_to_zero() {
        let series = MetricSeries::new();
        assert_eq!(series.len(), 0);
        assert_eq!(series.mean_speed(), 0.0);
        assert_eq!(series.mean_accuracy(), 0.0);
    }

    #[test]
    fn test_means() {
        let mut series = MetricSeries::new();
        series.push(0.0, 80.0);
        series.push(10.0, 90.0);
        assert_eq!(series.len(), 2);
        assert!((series.mean_speed() - 5.0).abs() < 1e-9);
        assert!((series.mean_accuracy() - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_sequences_stay_aligned() {
        let mut series = MetricSeries::new();
        series.push(1.0, 70.0);
        series.push(2.0, 75.0);
        assert_eq!(series.speeds.len(), series.accuracies.len());
    }
}
