//! Error handling integration tests.
//!
//! These tests verify that opening bad input fails cleanly with an open
//! error and never hands back a usable session.

mod common;

use framegrab::{FrameGrabError, VideoSession};

#[test]
fn open_nonexistent_file() {
    let result = VideoSession::open("this_file_does_not_exist.mp4");
    let error = result.expect_err("Opening a missing file must fail");

    assert!(error.is_open_error());
    assert!(
        matches!(error, FrameGrabError::FileOpen { .. }),
        "Expected FileOpen, got {error:?}",
    );
    let error_message = error.to_string();
    assert!(
        error_message.contains("Failed to open media file"),
        "Error message should mention file open failure: {error_message}",
    );
    assert!(error_message.contains("this_file_does_not_exist.mp4"));
}

#[test]
fn open_invalid_file() {
    let garbage = common::garbage_file();

    let error = VideoSession::open(&garbage.path).expect_err("Expected error for invalid media file");
    assert!(error.is_open_error(), "Unexpected error kind: {error:?}");
}

#[test]
fn open_audio_only_file() {
    let audio = common::audio_only_file();

    let error = VideoSession::open(&audio.path).expect_err("Audio-only file has no video stream");
    assert!(
        matches!(&error, FrameGrabError::NoVideoStream { path } if path == &audio.path),
        "Expected NoVideoStream, got {error:?}",
    );
    assert!(error.is_open_error());
    assert!(error.to_string().contains("No video stream"));
}

#[test]
fn open_directory() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");

    let error = VideoSession::open(directory.path()).expect_err("A directory is not a video");
    assert!(error.is_open_error());
}

#[test]
fn error_categories_are_disjoint() {
    let decode = FrameGrabError::VideoDecodeError("bad packet".to_string());
    assert!(decode.is_decode_error());
    assert!(!decode.is_open_error());

    let change = FrameGrabError::DimensionChange {
        expected: "64x48 YUV420P".to_string(),
        actual: "32x24 YUV420P".to_string(),
    };
    assert!(change.is_decode_error());
    assert!(change.to_string().contains("32x24"));

    let shape = FrameGrabError::ShapeMismatch {
        expected: [3, 48, 64],
        actual: [3, 64, 48],
    };
    assert!(!shape.is_open_error());
    assert!(!shape.is_decode_error());
    assert!(shape.to_string().contains("[3, 48, 64]"));

    let codec = FrameGrabError::CodecOpen {
        codec: "h264".to_string(),
        reason: "no decoder available".to_string(),
    };
    assert!(codec.is_open_error());
    assert!(!FrameGrabError::InvalidSession.is_open_error());
}

#[test]
fn ffmpeg_errors_convert() {
    let error: FrameGrabError = ffmpeg_next::Error::InvalidData.into();
    assert!(matches!(error, FrameGrabError::FfmpegError(_)));
    assert!(error.is_decode_error());
    assert!(!error.is_open_error());
    assert!(error.to_string().starts_with("FFmpeg error"));
}
