//! Fixture helpers shared by the integration tests.
//!
//! Fixtures are synthesised into a temporary directory with FFmpeg's
//! built-in MPEG-4 Part 2 encoder, so their dimensions, frame count and
//! frame rate are known exactly. Each fixture keeps its directory alive
//! until it is dropped.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use ffmpeg_next::{
    Packet, Rational,
    codec::{Id, context::Context as CodecContext},
    format::{Flags as FormatFlags, Pixel},
    frame::Video as VideoFrame,
};
use tempfile::TempDir;

pub const WIDTH: u32 = 64;
pub const HEIGHT: u32 = 48;
pub const FRAME_COUNT: usize = 12;

/// A media file on disk plus what it is known to contain.
pub struct Fixture {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub frames: usize,
    _directory: TempDir,
}

impl Fixture {
    /// Write a copy of this fixture cut to `keep` of its length.
    pub fn truncated(&self, keep: f64) -> Fixture {
        let bytes = std::fs::read(&self.path).expect("Failed to read fixture");
        let directory = tempfile::tempdir().expect("Failed to create temp dir");
        let path = directory.path().join("truncated.avi");
        let cut = (bytes.len() as f64 * keep) as usize;
        std::fs::write(&path, &bytes[..cut]).expect("Failed to write truncated fixture");
        Fixture {
            path,
            width: self.width,
            height: self.height,
            frames: self.frames,
            _directory: directory,
        }
    }
}

/// Luma value of every pixel in frame `index` of a synthesised video.
pub fn luma_for_frame(index: usize) -> u8 {
    40u8.wrapping_add((index as u8).wrapping_mul(12))
}

/// 64x48, 12 frames at 30000/1001 fps.
pub fn ntsc_video() -> Fixture {
    write_video(
        "ntsc.avi",
        WIDTH,
        HEIGHT,
        FRAME_COUNT,
        Rational::new(30000, 1001),
    )
}

/// Encode `frames` flat grey frames into `name`.
pub fn write_video(
    name: &str,
    width: u32,
    height: u32,
    frames: usize,
    frame_rate: Rational,
) -> Fixture {
    write_painted_video(name, width, height, frames, frame_rate, |frame, index| {
        fill_rows(frame, 0..height as usize, luma_for_frame(index), 128, 128);
    })
}

/// YUV of a saturated red, BT.601 limited range.
pub const RED_YUV: (u8, u8, u8) = (81, 90, 240);
/// YUV of a saturated blue, BT.601 limited range.
pub const BLUE_YUV: (u8, u8, u8) = (41, 240, 110);
/// First row of the blue half of a two-tone video. Macroblock aligned.
pub const TWO_TONE_SPLIT: usize = 16;

/// 50x30, 4 frames: rows above `TWO_TONE_SPLIT` red, the rest blue.
///
/// An RGB24 row of 150 bytes is padded to a 160 byte stride.
pub fn two_tone_video() -> Fixture {
    let (width, height) = (50, 30);
    write_painted_video(
        "two_tone.avi",
        width,
        height,
        4,
        Rational::new(25, 1),
        |frame, _| {
            let (y, u, v) = RED_YUV;
            fill_rows(frame, 0..TWO_TONE_SPLIT, y, u, v);
            let (y, u, v) = BLUE_YUV;
            fill_rows(frame, TWO_TONE_SPLIT..height as usize, y, u, v);
        },
    )
}

/// Raw MPEG-4 stream whose resolution drops from 64x48 to 32x24 after
/// `frames` frames. Metadata describes the first part.
pub fn resizing_video(frames: usize) -> Fixture {
    ffmpeg_next::init().expect("Failed to initialise FFmpeg");
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let frame_rate = Rational::new(25, 1);

    let mut bytes = Vec::new();
    for (part, (width, height)) in [(WIDTH, HEIGHT), (WIDTH / 2, HEIGHT / 2)]
        .into_iter()
        .enumerate()
    {
        let path = directory.path().join(format!("part{part}.m4v"));
        encode_video(&path, width, height, frames, frame_rate, &|frame: &mut VideoFrame, index: usize| {
            fill_rows(frame, 0..height as usize, luma_for_frame(index), 128, 128);
        });
        bytes.extend(std::fs::read(&path).expect("Failed to read encoded part"));
    }

    let path = directory.path().join("resizing.m4v");
    std::fs::write(&path, bytes).expect("Failed to write resizing fixture");
    Fixture {
        path,
        width: WIDTH,
        height: HEIGHT,
        frames,
        _directory: directory,
    }
}

fn write_painted_video(
    name: &str,
    width: u32,
    height: u32,
    frames: usize,
    frame_rate: Rational,
    paint: impl Fn(&mut VideoFrame, usize),
) -> Fixture {
    ffmpeg_next::init().expect("Failed to initialise FFmpeg");
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join(name);
    encode_video(&path, width, height, frames, frame_rate, &paint);
    Fixture {
        path,
        width,
        height,
        frames,
        _directory: directory,
    }
}

/// Fill luma `rows` of a YUV420P frame and the chroma rows under them.
fn fill_rows(frame: &mut VideoFrame, rows: std::ops::Range<usize>, y: u8, u: u8, v: u8) {
    let width = frame.width() as usize;
    for (plane, value, scale) in [(0, y, 1), (1, u, 2), (2, v, 2)] {
        let stride = frame.stride(plane);
        let plane_width = width.div_ceil(scale);
        let data = frame.data_mut(plane);
        for row in rows.start / scale..rows.end.div_ceil(scale) {
            data[row * stride..row * stride + plane_width].fill(value);
        }
    }
}

fn encode_video(
    path: &Path,
    width: u32,
    height: u32,
    frames: usize,
    frame_rate: Rational,
    paint: &dyn Fn(&mut VideoFrame, usize),
) {
    let time_base = frame_rate.invert();

    // ".m4v" is claimed by several muxers; raw MPEG-4 needs naming.
    let mut output = match path.extension().and_then(|extension| extension.to_str()) {
        Some("m4v") => ffmpeg_next::format::output_as(&path, "m4v"),
        _ => ffmpeg_next::format::output(&path),
    }
    .expect("Failed to create output");
    let needs_global_header = output.format().flags().contains(FormatFlags::GLOBAL_HEADER);

    let codec = ffmpeg_next::encoder::find(Id::MPEG4).expect("MPEG-4 encoder not available");
    let mut stream = output.add_stream(codec).expect("Failed to add stream");
    let stream_index = stream.index();

    let mut encoder = CodecContext::from_parameters(stream.parameters())
        .expect("Failed to create codec context")
        .encoder()
        .video()
        .expect("Failed to create video encoder");
    encoder.set_width(width);
    encoder.set_height(height);
    encoder.set_format(Pixel::YUV420P);
    encoder.set_time_base(time_base);
    encoder.set_frame_rate(Some(frame_rate));
    if needs_global_header {
        unsafe {
            (*encoder.as_mut_ptr()).flags |= ffmpeg_sys_next::AV_CODEC_FLAG_GLOBAL_HEADER as i32;
        }
    }

    let mut encoder = encoder.open_as(codec).expect("Failed to open encoder");
    stream.set_parameters(&encoder);
    stream.set_time_base(time_base);

    output.write_header().expect("Failed to write header");
    let stream_time_base = output
        .stream(stream_index)
        .expect("Output stream missing")
        .time_base();

    // One extra pass sends EOF and flushes the encoder.
    for index in 0..=frames {
        if index < frames {
            let mut frame = VideoFrame::new(Pixel::YUV420P, width, height);
            paint(&mut frame, index);
            frame.set_pts(Some(index as i64));
            encoder.send_frame(&frame).expect("Failed to send frame");
        } else {
            encoder.send_eof().expect("Failed to flush encoder");
        }

        let mut packet = Packet::empty();
        while encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(stream_index);
            packet.rescale_ts(time_base, stream_time_base);
            packet
                .write_interleaved(&mut output)
                .expect("Failed to write packet");
        }
    }

    output.write_trailer().expect("Failed to write trailer");
}

/// A file that is not a video.
pub struct ScratchFile {
    pub path: PathBuf,
    _directory: TempDir,
}

/// Bytes no demuxer recognises.
pub fn garbage_file() -> ScratchFile {
    scratch_file("invalid.mp4", b"this is not a media file".to_vec())
}

/// 0.1 s of 8 kHz mono PCM silence in a WAV container.
pub fn audio_only_file() -> ScratchFile {
    let sample_rate: u32 = 8_000;
    let data_len: u32 = sample_rate / 10 * 2;

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(bytes.len() + data_len as usize, 0);

    scratch_file("silence.wav", bytes)
}

fn scratch_file(name: &str, bytes: Vec<u8>) -> ScratchFile {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join(name);
    std::fs::write(&path, bytes).expect("Failed to write scratch file");
    ScratchFile {
        path,
        _directory: directory,
    }
}
