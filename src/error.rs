//! Error types for the `framegrab` crate.
//!
//! [`FrameGrabError`] is the single error type returned by every fallible
//! operation. Variants fall into four groups: errors raised while opening a
//! session, fatal decode errors that fail a session, validation errors for
//! caller-supplied buffers, and use of a session that is no longer valid.

use std::path::PathBuf;

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `framegrab` operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum FrameGrabError {
    /// FFmpeg could not be initialised.
    #[error("FFmpeg initialisation failed: {0}")]
    Initialization(String),

    /// The media file could not be opened or its stream headers could not
    /// be parsed.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoSession::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The container holds no decodable video stream.
    #[error("No video stream found in {path}")]
    NoVideoStream {
        /// Path of the opened container.
        path: PathBuf,
    },

    /// A decoder for the selected stream could not be found or opened.
    #[error("Failed to open {codec} decoder: {reason}")]
    CodecOpen {
        /// Codec name, or the codec id when no name is known.
        codec: String,
        /// Underlying reason.
        reason: String,
    },

    /// A frame buffer could not be allocated.
    #[error("Frame buffer allocation failed: {0}")]
    Allocation(String),

    /// The colour conversion context could not be created.
    #[error("Failed to create colour converter: {0}")]
    ConverterInit(String),

    /// A packet could not be decoded. Fatal for the session.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// A decoded frame no longer matches the geometry or pixel format the
    /// session was opened with. Fatal for the session.
    #[error("Decoded frame changed from {expected} to {actual}")]
    DimensionChange {
        /// `WIDTHxHEIGHT FORMAT` fixed at open time.
        expected: String,
        /// `WIDTHxHEIGHT FORMAT` of the offending frame.
        actual: String,
    },

    /// The destination buffer passed to [`crate::VideoSession::grab`] does
    /// not have the shape `[3, height, width]`.
    #[error("Expected a destination of shape {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// `[3, height, width]` of the session.
        expected: [usize; 3],
        /// Declared shape of the supplied buffer.
        actual: [usize; 3],
    },

    /// Raw data does not fill the declared buffer shape.
    #[error("Buffer of {len} bytes does not match shape {shape:?}")]
    InvalidBuffer {
        /// Declared `[channels, height, width]`.
        shape: [usize; 3],
        /// Length of the supplied data.
        len: usize,
    },

    /// A data operation was invoked on a failed or closed session.
    #[error("Video session is not valid")]
    InvalidSession,

    /// The demuxer failed for a reason other than end of stream.
    #[error("Failed to read packet: {0}")]
    ReadError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),
}

impl FrameGrabError {
    /// Returns `true` for errors that can only be raised while opening a
    /// session.
    pub fn is_open_error(&self) -> bool {
        matches!(
            self,
            FrameGrabError::Initialization(_)
                | FrameGrabError::FileOpen { .. }
                | FrameGrabError::NoVideoStream { .. }
                | FrameGrabError::CodecOpen { .. }
                | FrameGrabError::Allocation(_)
                | FrameGrabError::ConverterInit(_)
        )
    }

    /// Returns `true` for errors that permanently fail a session.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            FrameGrabError::VideoDecodeError(_)
                | FrameGrabError::DimensionChange { .. }
                | FrameGrabError::FfmpegError(_)
        )
    }
}

impl From<FfmpegError> for FrameGrabError {
    fn from(error: FfmpegError) -> Self {
        FrameGrabError::FfmpegError(error.to_string())
    }
}
