//! Video stream selection.
//!
//! Picks the stream FFmpeg ranks best among the container's video streams
//! and finds a decoder for it.

use ffmpeg_next::{
    Rational,
    codec::{Parameters, codec::Codec},
    media::Type,
};

use crate::{container::ContainerSession, error::FrameGrabError};

/// The video stream a session decodes, and everything needed to decode it.
pub struct SelectedStream {
    /// Index of the stream within the container; packets are filtered on it.
    pub index: usize,
    /// Decoder descriptor matching the stream's codec id.
    pub codec: Codec,
    /// Codec parameters from the stream header.
    pub parameters: Parameters,
    /// Real base frame rate (`r_frame_rate`).
    pub frame_rate: Rational,
    /// Stream time base.
    pub time_base: Rational,
    /// Frame count reported by the container header. Often zero or
    /// approximate.
    pub frame_count: i64,
}

/// Select the best video stream in `container`.
///
/// # Errors
///
/// - [`FrameGrabError::NoVideoStream`] if the container has no video stream.
/// - [`FrameGrabError::CodecOpen`] if no decoder is available for the
///   stream's codec.
pub fn select_video_stream(
    container: &ContainerSession,
) -> Result<SelectedStream, FrameGrabError> {
    let stream = container
        .input()
        .streams()
        .best(Type::Video)
        .ok_or_else(|| FrameGrabError::NoVideoStream {
            path: container.path().to_path_buf(),
        })?;

    let parameters = stream.parameters();
    let codec_id = parameters.id();
    let codec =
        ffmpeg_next::decoder::find(codec_id).ok_or_else(|| FrameGrabError::CodecOpen {
            codec: format!("{codec_id:?}"),
            reason: "no decoder available".to_string(),
        })?;

    log::debug!(
        "Selected video stream {} (codec={}, r_frame_rate={}/{})",
        stream.index(),
        codec.name(),
        stream.rate().numerator(),
        stream.rate().denominator(),
    );

    Ok(SelectedStream {
        index: stream.index(),
        codec,
        parameters,
        frame_rate: stream.rate(),
        time_base: stream.time_base(),
        frame_count: stream.frames(),
    })
}
