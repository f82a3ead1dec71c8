//! Process-wide FFmpeg setup.
//!
//! FFmpeg must be initialised once per process before any container is
//! opened. [`initialize`] does this exactly once no matter how many sessions
//! are opened or from how many threads; [`VideoSession::open`] calls it for
//! you.
//!
//! FFmpeg also has its own console logging, separate from the Rust
//! [`log`](https://crates.io/crates/log) facade this crate reports through.
//! By default it prints warnings for every damaged packet it meets, which is
//! noisy when deliberately reading truncated files. [`set_ffmpeg_log_level`]
//! tunes it without importing `ffmpeg-next` directly.
//!
//! ```no_run
//! use framegrab::{FfmpegLogLevel, VideoSession};
//!
//! framegrab::set_ffmpeg_log_level(FfmpegLogLevel::Error);
//! let session = VideoSession::open("input.mp4")?;
//! # Ok::<(), framegrab::FrameGrabError>(())
//! ```
//!
//! [`VideoSession::open`]: crate::VideoSession::open

use std::sync::OnceLock;

use ffmpeg_next::util::log::Level;

use crate::error::FrameGrabError;

static INITIALIZED: OnceLock<Result<(), String>> = OnceLock::new();

/// Initialise FFmpeg for this process.
///
/// The first call performs the registration; later calls return the cached
/// outcome.
///
/// # Errors
///
/// Returns [`FrameGrabError::Initialization`] if FFmpeg refused to
/// initialise. The failure is sticky for the life of the process.
pub fn initialize() -> Result<(), FrameGrabError> {
    INITIALIZED
        .get_or_init(|| {
            log::debug!("Initialising FFmpeg");
            ffmpeg_next::init().map_err(|error| error.to_string())
        })
        .clone()
        .map_err(FrameGrabError::Initialization)
}

/// FFmpeg's console verbosity, from silent to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Print nothing.
    Quiet,
    /// Conditions the process cannot survive.
    Panic,
    /// Unrecoverable errors.
    Fatal,
    /// Recoverable errors, such as a damaged packet.
    Error,
    /// Warnings. FFmpeg's default.
    Warning,
    /// Informational messages.
    Info,
    /// Verbose informational messages.
    Verbose,
    /// Debugging messages.
    Debug,
    /// Everything.
    Trace,
}

impl From<FfmpegLogLevel> for Level {
    fn from(level: FfmpegLogLevel) -> Self {
        match level {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Panic => Level::Panic,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Verbose => Level::Verbose,
            FfmpegLogLevel::Debug => Level::Debug,
            FfmpegLogLevel::Trace => Level::Trace,
        }
    }
}

impl From<Level> for FfmpegLogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Quiet => FfmpegLogLevel::Quiet,
            Level::Panic => FfmpegLogLevel::Panic,
            Level::Fatal => FfmpegLogLevel::Fatal,
            Level::Error => FfmpegLogLevel::Error,
            Level::Warning => FfmpegLogLevel::Warning,
            Level::Info => FfmpegLogLevel::Info,
            Level::Verbose => FfmpegLogLevel::Verbose,
            Level::Debug => FfmpegLogLevel::Debug,
            Level::Trace => FfmpegLogLevel::Trace,
        }
    }
}

/// Set FFmpeg's console verbosity.
///
/// Does not affect messages emitted through the `log` facade.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.into());
}

/// Current FFmpeg console verbosity, or `None` if FFmpeg reports a level
/// outside the known set.
pub fn get_ffmpeg_log_level() -> Option<FfmpegLogLevel> {
    ffmpeg_next::util::log::get_level()
        .ok()
        .map(FfmpegLogLevel::from)
}
