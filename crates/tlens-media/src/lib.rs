//! Video probing and frame decoding for the TalentLens pipeline.
//!
//! This crate provides:
//! - FFprobe-based video metadata (declared frame rate, dimensions, duration)
//! - A bounded, non-restartable frame source over OpenCV `videoio`
//! - Per-request working directories with guaranteed cleanup

pub mod error;
pub mod frames;
pub mod probe;
pub mod workdir;

pub use error::{MediaError, MediaResult};
pub use frames::{
    is_supported_extension, Frame, FrameSource, MAX_ANALYSIS_FRAMES, SUPPORTED_EXTENSIONS,
};
pub use probe::{probe_video, VideoInfo};
pub use workdir::SessionDir;
