//! Session configuration.
//!
//! [`SessionOptions`] is a small builder passed to
//! [`VideoSession::open_with_options`](crate::VideoSession::open_with_options).
//! The defaults reproduce [`VideoSession::open`](crate::VideoSession::open).
//!
//! # Example
//!
//! ```no_run
//! use framegrab::{FfmpegLogLevel, ScalingAlgorithm, SessionOptions, VideoSession};
//!
//! let options = SessionOptions::new()
//!     .with_scaling(ScalingAlgorithm::Bicubic)
//!     .with_ffmpeg_log_level(FfmpegLogLevel::Error);
//! let session = VideoSession::open_with_options("input.mp4", options)?;
//! # Ok::<(), framegrab::FrameGrabError>(())
//! ```

use ffmpeg_next::software::scaling::Flags as ScalingFlags;

use crate::ffmpeg::FfmpegLogLevel;

/// Interpolation used by the colour converter.
///
/// Source and output dimensions are always equal, so this mostly affects
/// chroma upsampling of subsampled formats such as YUV 4:2:0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingAlgorithm {
    /// Nearest neighbour.
    Point,
    /// Fast, lower quality bilinear.
    FastBilinear,
    /// Bilinear. This is the default.
    #[default]
    Bilinear,
    /// Bicubic.
    Bicubic,
    /// Area averaging.
    Area,
    /// Lanczos.
    Lanczos,
}

impl ScalingAlgorithm {
    pub(crate) fn to_ffmpeg_flags(self) -> ScalingFlags {
        match self {
            ScalingAlgorithm::Point => ScalingFlags::POINT,
            ScalingAlgorithm::FastBilinear => ScalingFlags::FAST_BILINEAR,
            ScalingAlgorithm::Bilinear => ScalingFlags::BILINEAR,
            ScalingAlgorithm::Bicubic => ScalingFlags::BICUBIC,
            ScalingAlgorithm::Area => ScalingFlags::AREA,
            ScalingAlgorithm::Lanczos => ScalingFlags::LANCZOS,
        }
    }
}

/// Options applied when a session is opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Interpolation for the colour converter.
    pub scaling: ScalingAlgorithm,
    /// FFmpeg console verbosity to apply before opening. `None` leaves the
    /// process-wide setting untouched.
    pub ffmpeg_log_level: Option<FfmpegLogLevel>,
}

impl SessionOptions {
    /// Default options: bilinear conversion, FFmpeg logging untouched.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the colour converter's interpolation.
    #[must_use]
    pub fn with_scaling(mut self, scaling: ScalingAlgorithm) -> Self {
        self.scaling = scaling;
        self
    }

    /// Set FFmpeg's console verbosity when the session opens.
    ///
    /// The level is process-wide; it stays in effect after the session is
    /// closed.
    #[must_use]
    pub fn with_ffmpeg_log_level(mut self, level: FfmpegLogLevel) -> Self {
        self.ffmpeg_log_level = Some(level);
        self
    }
}
