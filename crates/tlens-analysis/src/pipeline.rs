//! Analysis pipeline driver.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tlens_media::{probe_video, FrameSource};
use tlens_models::{LandmarkSet, MetricSeries};
use tlens_pose::{PoseEstimator, PoseResult};
use tracing::{info, warn};

use crate::error::AnalysisResult;
use crate::extractor::MetricAccumulator;

/// Result of one analysis run over one video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoAnalysis {
    /// The two metric sequences, indexed by detected-pose ordinal
    pub series: MetricSeries,
    /// Mean speed ("km/h"-labeled units); 0 when no pose was detected
    pub mean_speed_kmh: f64,
    /// Mean pass accuracy (percent); 0 when no pose was detected
    pub mean_pass_accuracy_pct: f64,
    /// Frames actually decoded (bounded by the frame cap)
    pub frames_read: usize,
    /// Frames in which a pose was detected
    pub poses_detected: usize,
}

/// Run the frame → pose → metrics pass over one video file.
///
/// Reads frames in file order up to the frame cap, sends each to the pose
/// estimator, and folds the optional landmark sets into the metric series.
/// A pose-estimator error fails only the frame it occurred on; unreadable
/// input fails the whole run.
pub async fn analyze_video(
    video_path: impl AsRef<Path>,
    pose: &dyn PoseEstimator,
) -> AnalysisResult<VideoAnalysis> {
    let video_path = video_path.as_ref();

    let info = probe_video(video_path).await?;
    let mut source = FrameSource::open(video_path)?;
    let mut acc = MetricAccumulator::new(info.frame_interval_secs());

    while let Some(frame) = source.next_frame()? {
        let detection: PoseResult<Option<LandmarkSet>> = pose.detect(&frame.jpeg).await;
        match detection {
            Ok(landmarks) => acc.push(landmarks.as_ref()),
            Err(e) => {
                // Fail this frame only; the sequence continues.
                warn!(frame = frame.index, "Pose detection failed, skipping frame: {}", e);
            }
        }
    }

    let frames_read = source.frames_read();
    let poses_detected = acc.samples();
    let series = acc.finish();

    info!(
        frames_read,
        poses_detected,
        fps = info.fps,
        "Video analysis pass complete"
    );

    Ok(VideoAnalysis {
        mean_speed_kmh: series.mean_speed(),
        mean_pass_accuracy_pct: series.mean_accuracy(),
        frames_read,
        poses_detected,
        series,
    })
}
