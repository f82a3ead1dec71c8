//! Lazy, pull-based frame iterator.
//!
//! [`FrameIter`] wraps [`VideoSession::grab`] in an [`Iterator`]: each call
//! to [`next()`](Iterator::next) decodes exactly one frame into a new
//! [`PlanarFrame`]. Use it when each frame needs to outlive the next grab;
//! otherwise reuse one buffer with `grab` directly.
//!
//! # Example
//!
//! ```no_run
//! use framegrab::VideoSession;
//!
//! let mut session = VideoSession::open("input.mp4")?;
//! for (index, frame) in session.frames().enumerate() {
//!     frame?.to_rgb_image()?.save(format!("frame_{index}.png")).ok();
//! }
//! # Ok::<(), framegrab::FrameGrabError>(())
//! ```

use crate::{error::FrameGrabError, frame::PlanarFrame, session::VideoSession};

/// Iterator over the remaining frames of a session.
///
/// Yields `Ok(frame)` per decoded frame. If the session fails mid-stream
/// the decode error is yielded once, then iteration ends. Created via
/// [`VideoSession::frames`].
pub struct FrameIter<'a> {
    session: &'a mut VideoSession,
    done: bool,
}

impl<'a> FrameIter<'a> {
    pub(crate) fn new(session: &'a mut VideoSession) -> Self {
        Self {
            session,
            done: false,
        }
    }
}

impl Iterator for FrameIter<'_> {
    type Item = Result<PlanarFrame, FrameGrabError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let (width, height) = match self.session.size() {
            Ok(size) => size,
            Err(error) => {
                self.done = true;
                return Some(Err(error));
            }
        };

        let mut frame = PlanarFrame::new(width, height);
        match self.session.grab(&mut frame) {
            Ok(true) => Some(Ok(frame)),
            Ok(false) => {
                self.done = true;
                self.session.failure().cloned().map(Err)
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }
}
