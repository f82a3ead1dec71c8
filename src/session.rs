//! Core [`VideoSession`] implementation.
//!
//! A session owns the whole native chain for one file: the container, the
//! video decoder with its frame buffer, and the colour converter with its
//! RGB24 output frame. The chain is built in that order by
//! [`VideoSession::open`]; if any stage fails, the stages already built are
//! dropped on the way out and no session is returned.
//!
//! A session is in one of three states:
//!
//! - `Valid`: every operation works.
//! - `Failed`: a decode error occurred. The native chain has been released,
//!   [`grab`](VideoSession::grab) reports `false` and the metadata
//!   accessors return [`FrameGrabError::InvalidSession`].
//! - `Closed`: [`close`](VideoSession::close) was called. Every data
//!   operation returns [`FrameGrabError::InvalidSession`].
//!
//! Transitions only go forward; nothing reopens a session.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use crate::{
    config::SessionOptions,
    container::ContainerSession,
    converter::ColorConverter,
    decoder::Decoder,
    error::FrameGrabError,
    frame::PlanarFrame,
    grabber::FrameGrabber,
    iterator::FrameIter,
    metadata::VideoMetadata,
    stream::select_video_stream,
};

/// Lifecycle state of a [`VideoSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Open and usable.
    Valid,
    /// Permanently failed by a decode error.
    Failed,
    /// Closed by the caller.
    Closed,
}

/// The native chain, owned as one unit and released together.
struct SessionResources {
    container: ContainerSession,
    decoder: Decoder,
    converter: ColorConverter,
    grabber: FrameGrabber,
}

impl SessionResources {
    fn grab_into(&mut self, destination: &mut PlanarFrame) -> Result<bool, FrameGrabError> {
        let grabbed =
            self.grabber
                .grab(&mut self.container, &mut self.decoder, &mut self.converter)?;
        if grabbed {
            self.converter.write_planar(destination.as_bytes_mut());
        }
        Ok(grabbed)
    }
}

/// A forward-only decode session over one video file.
///
/// # Example
///
/// ```no_run
/// use framegrab::{PlanarFrame, VideoSession};
///
/// let mut session = VideoSession::open("input.mp4")?;
/// let (width, height) = session.size()?;
/// let mut frame = PlanarFrame::new(width, height);
///
/// while session.grab(&mut frame)? {
///     // `frame` now holds the next picture as planar RGB.
/// }
///
/// session.close();
/// # Ok::<(), framegrab::FrameGrabError>(())
/// ```
pub struct VideoSession {
    path: PathBuf,
    metadata: VideoMetadata,
    resources: Option<SessionResources>,
    state: SessionState,
    failure: Option<FrameGrabError>,
    frames_grabbed: u64,
}

impl Debug for VideoSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoSession")
            .field("path", &self.path)
            .field("state", &self.state)
            .field("metadata", &self.metadata)
            .field("frames_grabbed", &self.frames_grabbed)
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}

impl VideoSession {
    /// Open a video file with default options.
    ///
    /// # Errors
    ///
    /// Returns an error for which [`FrameGrabError::is_open_error`] is true:
    /// the file is missing or unreadable, has no video stream, its codec
    /// cannot be opened, or the output buffers cannot be set up.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use framegrab::VideoSession;
    ///
    /// let session = VideoSession::open("video.mp4")?;
    /// assert!(session.is_valid());
    /// # Ok::<(), framegrab::FrameGrabError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FrameGrabError> {
        Self::open_with_options(path, SessionOptions::default())
    }

    /// Open a video file with explicit [`SessionOptions`].
    ///
    /// # Errors
    ///
    /// See [`open`](VideoSession::open).
    pub fn open_with_options<P: AsRef<Path>>(
        path: P,
        options: SessionOptions,
    ) -> Result<Self, FrameGrabError> {
        crate::ffmpeg::initialize()?;
        if let Some(level) = options.ffmpeg_log_level {
            crate::ffmpeg::set_ffmpeg_log_level(level);
        }

        let container = ContainerSession::open(path)?;
        let selected = select_video_stream(&container)?;
        let stream_index = selected.index;
        let frame_rate = (
            selected.frame_rate.numerator(),
            selected.frame_rate.denominator(),
        );
        let time_base = (
            selected.time_base.numerator(),
            selected.time_base.denominator(),
        );
        let frame_count = selected.frame_count.max(0) as u64;

        let decoder = Decoder::open(selected.codec, selected.parameters)?;
        let converter = ColorConverter::new(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            options.scaling,
        )?;

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            frame_rate,
            time_base,
            frames_per_second: VideoMetadata::fps_from_rational(frame_rate.0, frame_rate.1),
            frame_count,
            codec: decoder.codec_name().to_string(),
            pixel_format: format!("{:?}", decoder.format()),
            stream_index,
            container_format: container.format_name(),
        };

        log::info!(
            "Opened video session: {} (format={}, stream={}, {}x{}, {:.3} fps, ~{} frames, codec={})",
            container.path().display(),
            metadata.container_format,
            metadata.stream_index,
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.frame_count,
            metadata.codec,
        );

        Ok(Self {
            path: container.path().to_path_buf(),
            metadata,
            resources: Some(SessionResources {
                container,
                decoder,
                converter,
                grabber: FrameGrabber::new(stream_index),
            }),
            state: SessionState::Valid,
            failure: None,
            frames_grabbed: 0,
        })
    }

    /// Release every native resource.
    ///
    /// Safe to call any number of times, on a valid, failed or already
    /// closed session.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        log::debug!("Closing video session: {}", self.path.display());
        self.resources = None;
        self.state = SessionState::Closed;
    }

    /// `true` until the session fails or is closed.
    pub fn is_valid(&self) -> bool {
        self.state == SessionState::Valid
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Path the session was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The decode error that failed the session, if any.
    pub fn failure(&self) -> Option<&FrameGrabError> {
        self.failure.as_ref()
    }

    /// Frames written by [`grab`](VideoSession::grab) so far.
    pub fn frames_grabbed(&self) -> u64 {
        self.frames_grabbed
    }

    /// Cached stream metadata.
    ///
    /// # Errors
    ///
    /// [`FrameGrabError::InvalidSession`] unless the session is valid.
    pub fn metadata(&self) -> Result<&VideoMetadata, FrameGrabError> {
        self.ensure_valid()?;
        Ok(&self.metadata)
    }

    /// Frame `(width, height)` in pixels.
    ///
    /// # Errors
    ///
    /// [`FrameGrabError::InvalidSession`] unless the session is valid.
    pub fn size(&self) -> Result<(u32, u32), FrameGrabError> {
        self.ensure_valid()?;
        Ok((self.metadata.width, self.metadata.height))
    }

    /// Real base frame rate as frames per second; `0.0` if the stream's
    /// rate has a zero denominator.
    ///
    /// # Errors
    ///
    /// [`FrameGrabError::InvalidSession`] unless the session is valid.
    pub fn fps(&self) -> Result<f64, FrameGrabError> {
        self.ensure_valid()?;
        Ok(self.metadata.frames_per_second)
    }

    /// Approximate frame count reported by the container; `0` if unknown.
    ///
    /// Not a reliable count. Loop on [`grab`](VideoSession::grab) until it
    /// returns `false` instead.
    ///
    /// # Errors
    ///
    /// [`FrameGrabError::InvalidSession`] unless the session is valid.
    pub fn length(&self) -> Result<u64, FrameGrabError> {
        self.ensure_valid()?;
        Ok(self.metadata.frame_count)
    }

    /// Decode the next frame into `destination` as planar RGB.
    ///
    /// `destination` must be shaped `[3, height, width]`. Returns `Ok(true)`
    /// when a frame was written and `Ok(false)` at end of stream. Once
    /// `false` has been returned, every later call returns `false` too.
    ///
    /// A decode error fails the session: this call and all later ones
    /// return `Ok(false)`, [`is_valid`](VideoSession::is_valid) turns false
    /// and the error is kept in [`failure`](VideoSession::failure).
    ///
    /// # Errors
    ///
    /// - [`FrameGrabError::InvalidSession`] if the session was closed.
    /// - [`FrameGrabError::ShapeMismatch`] if `destination` has the wrong
    ///   shape. The buffer and the session are left untouched.
    pub fn grab(&mut self, destination: &mut PlanarFrame) -> Result<bool, FrameGrabError> {
        if self.state == SessionState::Closed {
            return Err(FrameGrabError::InvalidSession);
        }

        let expected = [
            PlanarFrame::RGB_CHANNELS,
            self.metadata.height as usize,
            self.metadata.width as usize,
        ];
        if destination.shape() != expected {
            return Err(FrameGrabError::ShapeMismatch {
                expected,
                actual: destination.shape(),
            });
        }

        let Some(resources) = self.resources.as_mut() else {
            return Ok(false);
        };

        match resources.grab_into(destination) {
            Ok(true) => {
                self.frames_grabbed += 1;
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(error) => {
                self.fail(error);
                Ok(false)
            }
        }
    }

    /// Iterate over the remaining frames, each in a freshly allocated
    /// [`PlanarFrame`].
    pub fn frames(&mut self) -> FrameIter<'_> {
        FrameIter::new(self)
    }

    fn ensure_valid(&self) -> Result<(), FrameGrabError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(FrameGrabError::InvalidSession)
        }
    }

    fn fail(&mut self, error: FrameGrabError) {
        log::warn!(
            "Video session failed after {} frames: {} ({error})",
            self.frames_grabbed,
            self.path.display(),
        );
        self.resources = None;
        self.state = SessionState::Failed;
        self.failure = Some(error);
    }
}
