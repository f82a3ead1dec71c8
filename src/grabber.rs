//! The read → decode → convert loop.
//!
//! [`FrameGrabber`] advances a session by exactly one converted frame per
//! call. It is written against three small traits so the loop can run over
//! FFmpeg's demuxer, decoder and scaler in a session, or over in-memory
//! stand-ins:
//!
//! - [`PacketSource`] yields packets of any stream, then end of stream.
//! - [`FrameDecoder`] turns packets of the selected stream into frames.
//! - [`FrameSink`] consumes each completed frame.
//!
//! The grabber only moves forward. At end of stream it drains the decoder,
//! hands out the frames the codec was still holding, and from then on
//! reports `false` on every call. Any error from the decoder or the sink
//! also finishes it.

use crate::{container::ReadOutcome, decoder::DecodeStatus, error::FrameGrabError};

/// A compressed packet tagged with the stream it belongs to.
pub trait StreamPacket {
    /// Index of the packet's stream within the container.
    fn stream_index(&self) -> usize;
}

/// Forward-only packet reader.
pub trait PacketSource {
    /// Packet type produced.
    type Packet: StreamPacket;

    /// Read the next packet.
    ///
    /// Errors other than end of stream are reported as
    /// [`FrameGrabError::ReadError`].
    fn read_packet(&mut self) -> Result<ReadOutcome<Self::Packet>, FrameGrabError>;
}

/// Packet-in, frame-out decoder.
pub trait FrameDecoder {
    /// Packet type accepted.
    type Packet;
    /// Frame type produced.
    type Frame;

    /// Feed one packet and try to take a frame out.
    fn decode(&mut self, packet: &Self::Packet) -> Result<DecodeStatus, FrameGrabError>;

    /// Take a frame the decoder already holds.
    fn receive(&mut self) -> Result<DecodeStatus, FrameGrabError>;

    /// Signal end of input.
    fn drain(&mut self) -> Result<(), FrameGrabError>;

    /// The frame made available by the last `FrameReady`.
    fn frame(&self) -> &Self::Frame;
}

/// Consumer of completed frames.
pub trait FrameSink {
    /// Frame type accepted.
    type Frame;

    /// Take a completed frame.
    fn convert(&mut self, frame: &Self::Frame) -> Result<(), FrameGrabError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Reading,
    Draining,
    Finished,
}

/// Decode-loop state for one video stream.
#[derive(Debug, Clone)]
pub struct FrameGrabber {
    stream_index: usize,
    phase: Phase,
    /// The decoder produced a frame on the last call and may hold more.
    pending: bool,
    frames_grabbed: u64,
}

impl FrameGrabber {
    /// Create a grabber that decodes packets of `stream_index` only.
    pub fn new(stream_index: usize) -> Self {
        Self {
            stream_index,
            phase: Phase::Reading,
            pending: false,
            frames_grabbed: 0,
        }
    }

    /// Stream whose packets are decoded.
    pub fn stream_index(&self) -> usize {
        self.stream_index
    }

    /// Number of frames delivered so far.
    pub fn frames_grabbed(&self) -> u64 {
        self.frames_grabbed
    }

    /// `true` once the stream is exhausted or an error stopped the loop.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Produce the next frame into `sink`.
    ///
    /// Returns `Ok(true)` when a frame was converted and `Ok(false)` at end
    /// of stream.
    ///
    /// # Errors
    ///
    /// Decode and conversion failures are returned as-is and finish the
    /// grabber; every later call returns `Ok(false)`.
    pub fn grab<S, D, C>(
        &mut self,
        source: &mut S,
        decoder: &mut D,
        sink: &mut C,
    ) -> Result<bool, FrameGrabError>
    where
        S: PacketSource,
        D: FrameDecoder<Packet = S::Packet>,
        C: FrameSink<Frame = D::Frame>,
    {
        let result = self.advance(source, decoder, sink);
        if result.is_err() {
            self.phase = Phase::Finished;
            self.pending = false;
        }
        result
    }

    fn advance<S, D, C>(
        &mut self,
        source: &mut S,
        decoder: &mut D,
        sink: &mut C,
    ) -> Result<bool, FrameGrabError>
    where
        S: PacketSource,
        D: FrameDecoder<Packet = S::Packet>,
        C: FrameSink<Frame = D::Frame>,
    {
        loop {
            match self.phase {
                Phase::Finished => return Ok(false),
                Phase::Draining => {
                    return match decoder.receive()? {
                        DecodeStatus::FrameReady => self.deliver(decoder, sink),
                        DecodeStatus::NeedMoreInput | DecodeStatus::Drained => {
                            log::debug!(
                                "End of stream after {} frames",
                                self.frames_grabbed
                            );
                            self.phase = Phase::Finished;
                            Ok(false)
                        }
                    };
                }
                Phase::Reading => {
                    if self.pending {
                        match decoder.receive()? {
                            DecodeStatus::FrameReady => return self.deliver(decoder, sink),
                            DecodeStatus::NeedMoreInput | DecodeStatus::Drained => {
                                self.pending = false;
                            }
                        }
                    }

                    let packet = match source.read_packet() {
                        Ok(ReadOutcome::Packet(packet)) => packet,
                        Ok(ReadOutcome::EndOfStream) => {
                            self.begin_draining(decoder)?;
                            continue;
                        }
                        Err(error) => {
                            log::warn!("Treating read failure as end of stream: {error}");
                            self.begin_draining(decoder)?;
                            continue;
                        }
                    };

                    if packet.stream_index() != self.stream_index {
                        continue;
                    }

                    match decoder.decode(&packet)? {
                        DecodeStatus::FrameReady => {
                            self.pending = true;
                            return self.deliver(decoder, sink);
                        }
                        DecodeStatus::NeedMoreInput => continue,
                        DecodeStatus::Drained => {
                            self.phase = Phase::Finished;
                            return Ok(false);
                        }
                    }
                }
            }
        }
    }

    fn begin_draining<D: FrameDecoder>(&mut self, decoder: &mut D) -> Result<(), FrameGrabError> {
        self.pending = false;
        self.phase = Phase::Draining;
        decoder.drain()
    }

    fn deliver<D, C>(&mut self, decoder: &D, sink: &mut C) -> Result<bool, FrameGrabError>
    where
        D: FrameDecoder,
        C: FrameSink<Frame = D::Frame>,
    {
        sink.convert(decoder.frame())?;
        self.frames_grabbed += 1;
        log::trace!("Grabbed frame {}", self.frames_grabbed);
        Ok(true)
    }
}
