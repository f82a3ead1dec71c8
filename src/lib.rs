//! # framegrab
//!
//! Forward-only video decode sessions: open a media file, then grab its
//! frames one at a time as planar RGB.
//!
//! `framegrab` drives FFmpeg (via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate) through the
//! whole chain needed to get pixels out of a container: demuxing, picking
//! the best video stream, decoding, and converting each picture to RGB24.
//! The chain is owned by a single [`VideoSession`] value and released when
//! it is closed or dropped.
//!
//! ## Quick Start
//!
//! ```no_run
//! use framegrab::{PlanarFrame, VideoSession};
//!
//! let mut session = VideoSession::open("input.mp4")?;
//! let (width, height) = session.size()?;
//! println!("{width}x{height} @ {:.2} fps", session.fps()?);
//!
//! let mut frame = PlanarFrame::new(width, height);
//! let mut count = 0;
//! while session.grab(&mut frame)? {
//!     count += 1;
//! }
//! println!("decoded {count} frames");
//! # Ok::<(), framegrab::FrameGrabError>(())
//! ```
//!
//! ## Behaviour
//!
//! - **Forward only**: no seeking; every grab resumes where the last one
//!   stopped, and end of stream is final.
//! - **Exact frame sequence**: frames still buffered inside the codec are
//!   flushed at end of stream, so `grab` returns `true` once per decodable
//!   frame. [`VideoSession::length`] is only the container's estimate.
//! - **Fail once, stay failed**: a decode error releases the native chain
//!   and leaves the session permanently invalid.
//! - **Single threaded**: a session is used from one thread at a time;
//!   sessions share nothing.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod config;
pub mod container;
pub mod converter;
pub mod decoder;
pub mod error;
pub mod ffmpeg;
pub mod frame;
pub mod grabber;
pub mod iterator;
pub mod metadata;
pub mod session;
pub mod stream;

pub use config::{ScalingAlgorithm, SessionOptions};
pub use container::{ContainerSession, ReadOutcome};
pub use converter::ColorConverter;
pub use decoder::{DecodeStatus, Decoder};
pub use error::FrameGrabError;
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, initialize, set_ffmpeg_log_level};
pub use frame::PlanarFrame;
pub use grabber::{FrameDecoder, FrameGrabber, FrameSink, PacketSource, StreamPacket};
pub use iterator::FrameIter;
pub use metadata::VideoMetadata;
pub use session::{SessionState, VideoSession};
pub use stream::{SelectedStream, select_video_stream};
