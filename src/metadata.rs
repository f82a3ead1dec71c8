//! Video stream metadata.
//!
//! [`VideoMetadata`] is read from the container and decoder headers once,
//! when a session opens, and cached for the lifetime of the session.

/// Metadata for the session's video stream.
///
/// # Example
///
/// ```no_run
/// use framegrab::VideoSession;
///
/// let session = VideoSession::open("input.mp4")?;
/// let metadata = session.metadata()?;
/// println!(
///     "{}x{} @ {:.3} fps, ~{} frames",
///     metadata.width, metadata.height, metadata.frames_per_second, metadata.frame_count,
/// );
/// # Ok::<(), framegrab::FrameGrabError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Real base frame rate as `(numerator, denominator)`.
    pub frame_rate: (i32, i32),
    /// Stream time base as `(numerator, denominator)`, the unit of packet
    /// and frame timestamps.
    pub time_base: (i32, i32),
    /// `frame_rate` as a float; `0.0` if the denominator is zero.
    pub frames_per_second: f64,
    /// Frame count from the container header.
    ///
    /// Many containers leave this unset (`0`) or approximate it. Do not use
    /// it to terminate a read loop; grab until end of stream instead.
    pub frame_count: u64,
    /// Decoder name (e.g. `"h264"`, `"mpeg4"`).
    pub codec: String,
    /// Source pixel format as decoded (e.g. `"YUV420P"`).
    pub pixel_format: String,
    /// Index of the stream within the container.
    pub stream_index: usize,
    /// Container format name (e.g. `"avi"`).
    pub container_format: String,
}

impl VideoMetadata {
    /// Reduce a rational frame rate to frames per second.
    ///
    /// Returns `0.0` when `denominator` is zero.
    pub fn fps_from_rational(numerator: i32, denominator: i32) -> f64 {
        if denominator == 0 {
            0.0
        } else {
            f64::from(numerator) / f64::from(denominator)
        }
    }
}
