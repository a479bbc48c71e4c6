//! Frame sources driving the export walk.
//!
//! The pipeline is isolated from how frames are produced behind
//! [`FrameSource`]: one provider streams real media frames with
//! frame-accurate timestamps, the other synthesizes timestamps at a fixed
//! cadence. `next_frame() == Ok(None)` is the explicit end-of-media signal;
//! the pipeline never infers completion from progress alone.

use std::collections::VecDeque;

use crate::foundation::core::FrameRgba;
use crate::foundation::error::{ReelError, ReelResult};

/// Static facts about a source the pipeline needs up front.
#[derive(Clone, Debug)]
pub struct SourceDescription {
    /// Source frame width in pixels.
    pub width: u32,
    /// Source frame height in pixels.
    pub height: u32,
    /// Frames per second delivered by this source.
    pub fps: f64,
    /// Total duration in seconds; `0.0` when unknown (progress reporting is
    /// then suppressed).
    pub duration_sec: f64,
    /// Whether the underlying container carries an audio track.
    pub has_audio: bool,
}

/// One decoded source frame with its playback timestamp.
#[derive(Clone, Debug)]
pub struct SourceFrame {
    /// Playback timestamp in seconds.
    pub timestamp_sec: f64,
    /// Decoded pixels.
    pub frame: FrameRgba,
}

/// A sequential supplier of timestamped source frames.
pub trait FrameSource {
    /// Source metadata.
    fn description(&self) -> &SourceDescription;

    /// The next frame in presentation order; `Ok(None)` signals end of media.
    fn next_frame(&mut self) -> ReelResult<Option<SourceFrame>>;
}

/// Fixed-cadence provider over caller-supplied frames.
///
/// Timestamps advance by exactly `1 / fps` per frame. This is the fallback
/// driver when a per-media-frame callback is unavailable, and the
/// deterministic driver for tests.
pub struct FixedCadenceSource {
    desc: SourceDescription,
    frames: VecDeque<FrameRgba>,
    next_index: u64,
}

impl FixedCadenceSource {
    /// Build a source over `frames` at `fps`. Duration is derived from the
    /// frame count; pass `duration_known = false` to simulate a source whose
    /// duration cannot be probed.
    pub fn new(frames: Vec<FrameRgba>, fps: f64, duration_known: bool) -> ReelResult<Self> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(ReelError::validation(
                "fixed cadence fps must be finite and > 0",
            ));
        }
        let (width, height) = frames
            .first()
            .map(|f| (f.width, f.height))
            .unwrap_or((0, 0));
        let duration_sec = if duration_known {
            frames.len() as f64 / fps
        } else {
            0.0
        };
        Ok(Self {
            desc: SourceDescription {
                width,
                height,
                fps,
                duration_sec,
                has_audio: false,
            },
            frames: frames.into(),
            next_index: 0,
        })
    }
}

impl FrameSource for FixedCadenceSource {
    fn description(&self) -> &SourceDescription {
        &self.desc
    }

    fn next_frame(&mut self) -> ReelResult<Option<SourceFrame>> {
        let Some(frame) = self.frames.pop_front() else {
            return Ok(None);
        };
        let timestamp_sec = self.next_index as f64 / self.desc.fps;
        self.next_index += 1;
        Ok(Some(SourceFrame {
            timestamp_sec,
            frame,
        }))
    }
}

/// Per-media-frame provider streaming a real container through ffmpeg.
///
/// Timestamps are frame-accurate: frame `n` of an `num/den` fps source is
/// stamped `n * den / num` seconds.
#[cfg(feature = "media-ffmpeg")]
pub struct MediaFrameSource {
    desc: SourceDescription,
    stream: crate::assets::media::RgbaFrameStream,
    width: u32,
    height: u32,
    fps_num: u32,
    fps_den: u32,
    next_index: u64,
}

#[cfg(feature = "media-ffmpeg")]
impl MediaFrameSource {
    /// Probe and open `path` for streaming decode.
    pub fn open(path: &std::path::Path) -> ReelResult<Self> {
        let info = crate::assets::media::probe_video(path)?;
        let stream = crate::assets::media::RgbaFrameStream::open(&info)?;
        Ok(Self {
            desc: SourceDescription {
                width: info.width,
                height: info.height,
                fps: info.source_fps(),
                duration_sec: info.duration_sec,
                has_audio: info.has_audio,
            },
            width: info.width,
            height: info.height,
            fps_num: info.fps_num,
            fps_den: info.fps_den,
            stream,
            next_index: 0,
        })
    }
}

#[cfg(feature = "media-ffmpeg")]
impl FrameSource for MediaFrameSource {
    fn description(&self) -> &SourceDescription {
        &self.desc
    }

    fn next_frame(&mut self) -> ReelResult<Option<SourceFrame>> {
        let Some(data) = self.stream.next_frame()? else {
            return Ok(None);
        };
        let timestamp_sec = if self.fps_num == 0 {
            0.0
        } else {
            self.next_index as f64 * f64::from(self.fps_den) / f64::from(self.fps_num)
        };
        self.next_index += 1;
        Ok(Some(SourceFrame {
            timestamp_sec,
            frame: FrameRgba {
                width: self.width,
                height: self.height,
                data,
            },
        }))
    }
}
