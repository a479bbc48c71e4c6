//! Frame sinks receiving composited output.
//!
//! [`FrameSink`] decouples the export walk from encoding so the state
//! machine can run against an in-memory buffer in tests and against the
//! system ffmpeg encoder in production.

use crate::encode::ffmpeg::{EncodeConfig, FfmpegEncoder};
use crate::foundation::core::FrameRgba;
use crate::foundation::error::{ReelError, ReelResult};

/// A consumer of composited frames in presentation order.
pub trait FrameSink {
    /// Accept the next composited frame.
    fn write_frame(&mut self, frame: &FrameRgba) -> ReelResult<()>;

    /// Flush and close the output. Must be called exactly once; further
    /// writes are rejected.
    fn finish(&mut self) -> ReelResult<()>;
}

/// In-memory sink collecting every frame it receives.
#[derive(Debug, Default)]
pub struct BufferSink {
    /// Frames written so far.
    pub frames: Vec<FrameRgba>,
    /// Whether [`FrameSink::finish`] has run.
    pub finished: bool,
}

impl FrameSink for BufferSink {
    fn write_frame(&mut self, frame: &FrameRgba) -> ReelResult<()> {
        if self.finished {
            return Err(ReelError::precondition(
                "buffer sink is already finalized",
            ));
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> ReelResult<()> {
        if self.finished {
            return Err(ReelError::precondition(
                "buffer sink is already finalized",
            ));
        }
        self.finished = true;
        Ok(())
    }
}

/// Sink writing frames into a spawned ffmpeg encoder.
pub struct EncoderSink {
    encoder: Option<FfmpegEncoder>,
}

impl EncoderSink {
    /// Spawn an encoder for `cfg`.
    pub fn new(cfg: EncodeConfig) -> ReelResult<Self> {
        Ok(Self {
            encoder: Some(FfmpegEncoder::new(cfg)?),
        })
    }
}

impl FrameSink for EncoderSink {
    fn write_frame(&mut self, frame: &FrameRgba) -> ReelResult<()> {
        let Some(encoder) = self.encoder.as_mut() else {
            return Err(ReelError::precondition("encoder sink is already finalized"));
        };
        encoder.encode_frame(frame)
    }

    fn finish(&mut self) -> ReelResult<()> {
        let Some(encoder) = self.encoder.take() else {
            return Err(ReelError::precondition("encoder sink is already finalized"));
        };
        encoder.finish()
    }
}
