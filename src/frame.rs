//! Planar destination buffers.
//!
//! [`PlanarFrame`] is the buffer [`VideoSession::grab`](crate::VideoSession::grab)
//! writes into: an owned `u8` array with a declared `[channels, height,
//! width]` shape. A grab only accepts a frame shaped `[3, height, width]`
//! for the session's dimensions; any other shape is rejected before the
//! buffer is touched.

use image::RgbImage;

use crate::error::FrameGrabError;

/// An owned `[channels, height, width]` byte buffer, channel planes stored
/// one after another, each row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanarFrame {
    shape: [usize; 3],
    data: Vec<u8>,
}

impl PlanarFrame {
    /// Channel count of an RGB frame.
    pub const RGB_CHANNELS: usize = 3;

    /// A zeroed `[3, height, width]` frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_shape([Self::RGB_CHANNELS, height as usize, width as usize])
    }

    /// A zeroed frame of any declared shape.
    pub fn with_shape(shape: [usize; 3]) -> Self {
        Self {
            shape,
            data: vec![0; shape.iter().product()],
        }
    }

    /// Wrap existing bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::InvalidBuffer`] if `data` does not hold
    /// exactly `channels * height * width` bytes.
    pub fn from_raw(shape: [usize; 3], data: Vec<u8>) -> Result<Self, FrameGrabError> {
        if data.len() != shape.iter().product::<usize>() {
            return Err(FrameGrabError::InvalidBuffer {
                shape,
                len: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Declared `[channels, height, width]`.
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Number of channel planes.
    pub fn channels(&self) -> usize {
        self.shape[0]
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.shape[1]
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.shape[2]
    }

    /// All planes as one slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the frame and return its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// One channel plane, or `None` if `channel` is out of range.
    pub fn plane(&self, channel: usize) -> Option<&[u8]> {
        if channel >= self.channels() {
            return None;
        }
        let plane_len = self.height() * self.width();
        Some(&self.data[channel * plane_len..(channel + 1) * plane_len])
    }

    /// RGB value at (`x`, `y`) of a three-channel frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if self.channels() != Self::RGB_CHANNELS || x >= self.width() || y >= self.height() {
            return None;
        }
        let index = y * self.width() + x;
        let plane_len = self.height() * self.width();
        Some([
            self.data[index],
            self.data[plane_len + index],
            self.data[2 * plane_len + index],
        ])
    }

    /// Interleave into an [`RgbImage`].
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::ShapeMismatch`] unless the frame has three
    /// channels.
    pub fn to_rgb_image(&self) -> Result<RgbImage, FrameGrabError> {
        let [channels, height, width] = self.shape;
        if channels != Self::RGB_CHANNELS {
            return Err(FrameGrabError::ShapeMismatch {
                expected: [Self::RGB_CHANNELS, height, width],
                actual: self.shape,
            });
        }

        let plane_len = height * width;
        let (red, rest) = self.data.split_at(plane_len);
        let (green, blue) = rest.split_at(plane_len);

        let mut packed = Vec::with_capacity(3 * plane_len);
        for index in 0..plane_len {
            packed.extend_from_slice(&[red[index], green[index], blue[index]]);
        }

        RgbImage::from_raw(width as u32, height as u32, packed).ok_or(
            FrameGrabError::InvalidBuffer {
                shape: self.shape,
                len: self.data.len(),
            },
        )
    }
}
