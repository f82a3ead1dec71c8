//! Container (demuxer) ownership and packet reading.
//!
//! [`ContainerSession`] owns the FFmpeg input context for one media file.
//! Opening it probes the stream headers; afterwards packets are read
//! strictly forward with [`read_packet`](ContainerSession::read_packet).
//! The input context is closed exactly once, when the value is dropped.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use ffmpeg_next::{Error as FfmpegError, Packet, format::context::Input};

use crate::{
    error::FrameGrabError,
    grabber::{PacketSource, StreamPacket},
};

/// Result of a single packet read.
#[derive(Debug)]
pub enum ReadOutcome<P = Packet> {
    /// A compressed packet from any stream in the container.
    Packet(P),
    /// The demuxer has no more packets.
    EndOfStream,
}

/// An opened media container.
pub struct ContainerSession {
    input: Input,
    path: PathBuf,
}

impl Debug for ContainerSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ContainerSession")
            .field("path", &self.path)
            .field("format", &self.format_name())
            .field("streams", &self.stream_count())
            .finish_non_exhaustive()
    }
}

impl ContainerSession {
    /// Open `path` and parse its stream headers.
    ///
    /// FFmpeg must already be initialised (see [`crate::ffmpeg::initialize`]).
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::FileOpen`] if the file does not exist, is
    /// unreadable, is not a recognised container, or its stream information
    /// cannot be parsed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FrameGrabError> {
        let path = path.as_ref().to_path_buf();

        log::debug!("Opening container: {}", path.display());

        let input = ffmpeg_next::format::input(&path).map_err(|error| FrameGrabError::FileOpen {
            path: path.clone(),
            reason: error.to_string(),
        })?;

        Ok(Self { input, path })
    }

    /// Path the container was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Short demuxer name (e.g. `"avi"`, `"mov,mp4,m4a,3gp,3g2,mj2"`).
    pub fn format_name(&self) -> String {
        self.input.format().name().to_string()
    }

    /// Number of streams of any type in the container.
    pub fn stream_count(&self) -> usize {
        self.input.nb_streams() as usize
    }

    pub(crate) fn input(&self) -> &Input {
        &self.input
    }

    /// Read the next packet, whatever stream it belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::ReadError`] when the demuxer fails for any
    /// reason other than reaching the end of the file.
    pub fn read_packet(&mut self) -> Result<ReadOutcome, FrameGrabError> {
        let mut packet = Packet::empty();
        match packet.read(&mut self.input) {
            Ok(()) => Ok(ReadOutcome::Packet(packet)),
            Err(FfmpegError::Eof) => Ok(ReadOutcome::EndOfStream),
            Err(error) => Err(FrameGrabError::ReadError(error.to_string())),
        }
    }
}

impl StreamPacket for Packet {
    fn stream_index(&self) -> usize {
        self.stream()
    }
}

impl PacketSource for ContainerSession {
    type Packet = Packet;

    fn read_packet(&mut self) -> Result<ReadOutcome<Packet>, FrameGrabError> {
        ContainerSession::read_packet(self)
    }
}
