//! Colour conversion into the session's fixed RGB24 output frame.
//!
//! The converter is built once per session for the stream's geometry and
//! source pixel format. Its output frame is allocated up front and every
//! conversion overwrites it in place. A decoded frame whose geometry or
//! format differs from the one the converter was built for is rejected
//! rather than rescaled.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use ffmpeg_next::{
    Error as FfmpegError,
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::Context as ScalingContext,
};

use crate::{config::ScalingAlgorithm, error::FrameGrabError, grabber::FrameSink};

/// Line alignment of the output frame, in bytes.
const OUTPUT_ALIGNMENT: i32 = 32;

/// Converts decoded frames to packed RGB24 at the source resolution.
pub struct ColorConverter {
    scaler: ScalingContext,
    output: VideoFrame,
    source_format: Pixel,
    width: u32,
    height: u32,
}

impl Debug for ColorConverter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ColorConverter")
            .field("source", &describe(self.width, self.height, self.source_format))
            .field("target", &Self::TARGET_FORMAT)
            .finish_non_exhaustive()
    }
}

impl ColorConverter {
    /// Pixel format of the converted frame.
    pub const TARGET_FORMAT: Pixel = Pixel::RGB24;

    /// Build a converter for frames of `source_format` at `width`×`height`.
    ///
    /// # Errors
    ///
    /// - [`FrameGrabError::ConverterInit`] if the dimensions are zero or
    ///   swscale cannot convert from `source_format`.
    /// - [`FrameGrabError::Allocation`] if the output frame cannot be
    ///   allocated.
    pub fn new(
        source_format: Pixel,
        width: u32,
        height: u32,
        algorithm: ScalingAlgorithm,
    ) -> Result<Self, FrameGrabError> {
        if width == 0 || height == 0 {
            return Err(FrameGrabError::ConverterInit(format!(
                "stream reports empty dimensions {width}x{height}"
            )));
        }

        let scaler = ScalingContext::get(
            source_format,
            width,
            height,
            Self::TARGET_FORMAT,
            width,
            height,
            algorithm.to_ffmpeg_flags(),
        )
        .map_err(|error| {
            FrameGrabError::ConverterInit(format!("{source_format:?} to RGB24: {error}"))
        })?;

        let output = allocate_output(width, height)?;

        log::debug!(
            "Colour converter ready: {width}x{height} {source_format:?} -> RGB24 ({algorithm:?})"
        );

        Ok(Self {
            scaler,
            output,
            source_format,
            width,
            height,
        })
    }

    /// Output width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Convert `source` into the output frame.
    ///
    /// # Errors
    ///
    /// - [`FrameGrabError::DimensionChange`] if `source` differs in width,
    ///   height or pixel format from what the converter was built for.
    /// - [`FrameGrabError::FfmpegError`] if swscale fails.
    pub fn convert(&mut self, source: &VideoFrame) -> Result<(), FrameGrabError> {
        if source.width() != self.width
            || source.height() != self.height
            || source.format() != self.source_format
        {
            return Err(FrameGrabError::DimensionChange {
                expected: describe(self.width, self.height, self.source_format),
                actual: describe(source.width(), source.height(), source.format()),
            });
        }

        self.scaler.run(source, &mut self.output)?;
        Ok(())
    }

    /// The converted RGB24 frame.
    pub fn output(&self) -> &VideoFrame {
        &self.output
    }

    /// Copy the converted frame into `destination` in planar channel order.
    ///
    /// `destination` holds `3 * height * width` bytes: the red plane, then
    /// green, then blue, each row-major without padding.
    pub fn write_planar(&self, destination: &mut [u8]) {
        let width = self.width as usize;
        let height = self.height as usize;
        let plane_len = width * height;
        debug_assert_eq!(destination.len(), 3 * plane_len);

        let stride = self.output.stride(0);
        let data = self.output.data(0);
        let (red, rest) = destination.split_at_mut(plane_len);
        let (green, blue) = rest.split_at_mut(plane_len);

        for y in 0..height {
            let row = &data[y * stride..y * stride + width * 3];
            let offset = y * width;
            for (x, pixel) in row.chunks_exact(3).enumerate() {
                red[offset + x] = pixel[0];
                green[offset + x] = pixel[1];
                blue[offset + x] = pixel[2];
            }
        }
    }
}

impl FrameSink for ColorConverter {
    type Frame = VideoFrame;

    fn convert(&mut self, frame: &VideoFrame) -> Result<(), FrameGrabError> {
        ColorConverter::convert(self, frame)
    }
}

fn allocate_output(width: u32, height: u32) -> Result<VideoFrame, FrameGrabError> {
    let mut output = VideoFrame::empty();
    output.set_format(ColorConverter::TARGET_FORMAT);
    output.set_width(width);
    output.set_height(height);

    // Safety: format, width and height are set above, which is all
    // av_frame_get_buffer reads before allocating the planes.
    let status =
        unsafe { ffmpeg_sys_next::av_frame_get_buffer(output.as_mut_ptr(), OUTPUT_ALIGNMENT) };
    if status < 0 {
        return Err(FrameGrabError::Allocation(format!(
            "{width}x{height} RGB24 frame: {}",
            FfmpegError::from(status)
        )));
    }

    Ok(output)
}

fn describe(width: u32, height: u32, format: Pixel) -> String {
    format!("{width}x{height} {format:?}")
}
