//! Video decoding.
//!
//! [`Decoder`] wraps an opened FFmpeg video decoder together with the frame
//! buffer it decodes into. The buffer is reused for every frame, so a
//! decoded picture is only valid until the next call that decodes.
//!
//! Codecs buffer internally: one packet can yield zero, one or several
//! frames. [`Decoder::decode`] returns the status after feeding a packet,
//! [`Decoder::receive`] polls for frames still held by the codec, and
//! [`Decoder::drain`] flushes them at end of stream.

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    codec::{Parameters, codec::Codec, context::Context as CodecContext},
    decoder::Video as VideoDecoder,
    format::Pixel,
    frame::Video as VideoFrame,
    util::error::EAGAIN,
};

use crate::{error::FrameGrabError, grabber::FrameDecoder};

/// Outcome of feeding or polling the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// A decoded frame is available in the frame buffer.
    FrameReady,
    /// The codec needs more packets before it can emit a frame.
    NeedMoreInput,
    /// The codec has been drained and will produce no more frames.
    Drained,
}

/// An opened video decoder and its reusable frame buffer.
pub struct Decoder {
    decoder: VideoDecoder,
    frame: VideoFrame,
    codec_name: String,
}

impl Decoder {
    /// Open `codec` configured from the stream's `parameters`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::CodecOpen`] if the context cannot be built
    /// from the parameters or the codec refuses to open.
    pub fn open(codec: Codec, parameters: Parameters) -> Result<Self, FrameGrabError> {
        let codec_name = codec.name().to_string();
        let codec_open_error = |error: FfmpegError| FrameGrabError::CodecOpen {
            codec: codec_name.clone(),
            reason: error.to_string(),
        };

        let context = CodecContext::from_parameters(parameters).map_err(codec_open_error)?;
        let decoder = context
            .decoder()
            .open_as(codec)
            .and_then(|opened| opened.video())
            .map_err(codec_open_error)?;

        log::debug!(
            "Opened {} decoder: {}x{} {:?}",
            codec_name,
            decoder.width(),
            decoder.height(),
            decoder.format(),
        );

        Ok(Self {
            decoder,
            frame: VideoFrame::empty(),
            codec_name,
        })
    }

    /// Coded width reported by the decoder.
    pub fn width(&self) -> u32 {
        self.decoder.width()
    }

    /// Coded height reported by the decoder.
    pub fn height(&self) -> u32 {
        self.decoder.height()
    }

    /// Pixel format the decoder produces.
    pub fn format(&self) -> Pixel {
        self.decoder.format()
    }

    /// Name of the opened codec (e.g. `"h264"`).
    pub fn codec_name(&self) -> &str {
        &self.codec_name
    }

    /// Feed one packet and try to take a frame out.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::VideoDecodeError`] if the codec rejects the
    /// packet or fails while decoding it. The decoder state is not assumed
    /// usable afterwards.
    pub fn decode(&mut self, packet: &Packet) -> Result<DecodeStatus, FrameGrabError> {
        self.decoder
            .send_packet(packet)
            .map_err(|error| FrameGrabError::VideoDecodeError(error.to_string()))?;
        self.receive()
    }

    /// Take the next frame the codec already holds, if any.
    pub fn receive(&mut self) -> Result<DecodeStatus, FrameGrabError> {
        match self.decoder.receive_frame(&mut self.frame) {
            Ok(()) => Ok(DecodeStatus::FrameReady),
            Err(FfmpegError::Other { errno }) if errno == EAGAIN => {
                Ok(DecodeStatus::NeedMoreInput)
            }
            Err(FfmpegError::Eof) => Ok(DecodeStatus::Drained),
            Err(error) => Err(FrameGrabError::VideoDecodeError(error.to_string())),
        }
    }

    /// Signal end of input so buffered frames can be received.
    pub fn drain(&mut self) -> Result<(), FrameGrabError> {
        log::debug!("Draining {} decoder", self.codec_name);
        self.decoder
            .send_eof()
            .map_err(|error| FrameGrabError::VideoDecodeError(error.to_string()))
    }

    /// The most recently decoded frame.
    pub fn frame(&self) -> &VideoFrame {
        &self.frame
    }
}

impl FrameDecoder for Decoder {
    type Packet = Packet;
    type Frame = VideoFrame;

    fn decode(&mut self, packet: &Packet) -> Result<DecodeStatus, FrameGrabError> {
        Decoder::decode(self, packet)
    }

    fn receive(&mut self) -> Result<DecodeStatus, FrameGrabError> {
        Decoder::receive(self)
    }

    fn drain(&mut self) -> Result<(), FrameGrabError> {
        Decoder::drain(self)
    }

    fn frame(&self) -> &VideoFrame {
        Decoder::frame(self)
    }
}
