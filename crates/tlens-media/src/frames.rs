//! Bounded frame source over OpenCV `videoio`.

use std::path::Path;

use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Maximum number of frames analyzed per request.
///
/// Bounds the work done for one upload; longer videos are truncated.
pub const MAX_ANALYSIS_FRAMES: usize = 100;

/// Video container extensions accepted at the upload boundary.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

/// Check whether a filename carries a supported container extension.
pub fn is_supported_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// One decoded frame, JPEG-encoded for transport to the pose service.
///
/// Ephemeral: exists only for the duration of one pipeline iteration.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Zero-based ordinal within the source video
    pub index: u32,
    /// JPEG-encoded image bytes
    pub jpeg: Vec<u8>,
}

/// Lazy, finite, non-restartable sequence of frames from one video file.
///
/// Yields frames in file order and stops at end-of-stream or at
/// [`MAX_ANALYSIS_FRAMES`]. The underlying capture is released on drop.
pub struct FrameSource {
    #[cfg(feature = "opencv")]
    cap: opencv::videoio::VideoCapture,
    frames_read: usize,
}

#[cfg(feature = "opencv")]
impl FrameSource {
    /// Open a video file for frame reading.
    ///
    /// Returns [`MediaError::InvalidVideo`] when the file cannot be opened,
    /// so unreadable input surfaces immediately instead of flowing an empty
    /// sequence through the pipeline.
    pub fn open(path: impl AsRef<Path>) -> MediaResult<Self> {
        use opencv::prelude::VideoCaptureTraitConst;
        use opencv::videoio::{VideoCapture, CAP_ANY};

        let path = path.as_ref();
        let cap = VideoCapture::from_file(path.to_str().unwrap_or(""), CAP_ANY)
            .map_err(|e| MediaError::invalid_video(format!("open video: {e}")))?;

        if !cap.is_opened().unwrap_or(false) {
            return Err(MediaError::invalid_video(format!(
                "could not open {} for decoding",
                path.display()
            )));
        }

        debug!("Opened frame source for {}", path.display());

        Ok(Self {
            cap,
            frames_read: 0,
        })
    }

    /// Read the next frame, or `None` at end-of-stream or the frame cap.
    pub fn next_frame(&mut self) -> MediaResult<Option<Frame>> {
        use opencv::prelude::{MatTraitConst, VideoCaptureTrait};

        if self.frames_read >= MAX_ANALYSIS_FRAMES {
            return Ok(None);
        }

        let mut mat = opencv::core::Mat::default();
        let read_ok = self
            .cap
            .read(&mut mat)
            .map_err(|e| MediaError::invalid_video(format!("read frame: {e}")))?;

        if !read_ok || mat.empty() {
            return Ok(None);
        }

        let mut buf = opencv::core::Vector::<u8>::new();
        opencv::imgcodecs::imencode(".jpg", &mat, &mut buf, &opencv::core::Vector::new())
            .map_err(|e| MediaError::internal(format!("encode frame: {e}")))?;

        let index = self.frames_read as u32;
        self.frames_read += 1;

        Ok(Some(Frame {
            index,
            jpeg: buf.to_vec(),
        }))
    }
}

#[cfg(not(feature = "opencv"))]
impl FrameSource {
    /// Open a video file for frame reading.
    pub fn open(_path: impl AsRef<Path>) -> MediaResult<Self> {
        Err(MediaError::internal(
            "built without the opencv feature; frame decoding is unavailable",
        ))
    }

    /// Read the next frame.
    pub fn next_frame(&mut self) -> MediaResult<Option<Frame>> {
        Ok(None)
    }
}

impl FrameSource {
    /// Number of frames read so far.
    pub fn frames_read(&self) -> usize {
        self.frames_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension("clip.mp4"));
        assert!(is_supported_extension("CLIP.MOV"));
        assert!(is_supported_extension("match.avi"));
        assert!(!is_supported_extension("match.mkv"));
        assert!(!is_supported_extension("notes.txt"));
        assert!(!is_supported_extension("no_extension"));
    }

    #[cfg(feature = "opencv")]
    #[test]
    fn test_open_rejects_unreadable_input() {
        let err = FrameSource::open("/nonexistent/clip.mp4").unwrap_err();
        assert!(matches!(err, MediaError::InvalidVideo(_)));
    }

    #[cfg(feature = "opencv")]
    fn write_test_clip(path: &Path, frame_count: usize) {
        use opencv::core::{Mat, Scalar, Size, CV_8UC3};
        use opencv::prelude::{VideoWriterTrait, VideoWriterTraitConst};
        use opencv::videoio::VideoWriter;

        let fourcc = VideoWriter::fourcc('M', 'J', 'P', 'G').unwrap();
        let mut writer = VideoWriter::new(
            path.to_str().unwrap(),
            fourcc,
            30.0,
            Size::new(64, 64),
            true,
        )
        .unwrap();
        assert!(writer.is_opened().unwrap());

        let frame =
            Mat::new_rows_cols_with_default(64, 64, CV_8UC3, Scalar::all(128.0)).unwrap();
        for _ in 0..frame_count {
            writer.write(&frame).unwrap();
        }
        writer.release().unwrap();
    }

    #[cfg(feature = "opencv")]
    #[test]
    fn test_frame_cap_truncates_long_videos() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("long.avi");
        write_test_clip(&path, MAX_ANALYSIS_FRAMES + 20);

        let mut source = FrameSource::open(&path).unwrap();
        while source.next_frame().unwrap().is_some() {}
        assert_eq!(source.frames_read(), MAX_ANALYSIS_FRAMES);

        // The cap holds once reached
        assert!(source.next_frame().unwrap().is_none());
        assert_eq!(source.frames_read(), MAX_ANALYSIS_FRAMES);
    }

    #[cfg(feature = "opencv")]
    #[test]
    fn test_short_video_reads_to_end() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("short.avi");
        write_test_clip(&path, 7);

        let mut source = FrameSource::open(&path).unwrap();
        let mut frames = Vec::new();
        while let Some(frame) = source.next_frame().unwrap() {
            frames.push(frame.index);
        }
        assert_eq!(frames.len(), 7);
        assert_eq!(frames, (0..7).collect::<Vec<u32>>());
    }
}
