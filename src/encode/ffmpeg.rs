use std::{
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    foundation::core::FrameRgba,
    foundation::error::{ReelError, ReelResult},
};

/// Audio routed into the output container alongside the piped video.
#[derive(Clone, Debug)]
pub enum AudioInput {
    /// Forward the audio track of an existing container (the A-roll source)
    /// unchanged in content, re-encoded to AAC for MP4 compatibility.
    Container {
        /// Path to the container whose audio is forwarded.
        path: PathBuf,
    },
    /// Raw interleaved f32 little-endian PCM from a file.
    RawF32le {
        /// Path to the raw PCM file.
        path: PathBuf,
        /// Sample rate in Hz.
        sample_rate: u32,
        /// Channel count.
        channels: u16,
    },
}

/// Encoder job description.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    /// Output width in pixels (must be even for yuv420p).
    pub width: u32,
    /// Output height in pixels (must be even for yuv420p).
    pub height: u32,
    /// Output frame rate.
    pub fps: u32,
    /// Destination file path.
    pub out_path: PathBuf,
    /// Whether to overwrite `out_path` if it already exists.
    pub overwrite: bool,
    /// Optional audio routed into the container.
    pub audio: Option<AudioInput>,
}

impl EncodeConfig {
    /// Validate dimensions and rate.
    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(ReelError::validation("encode fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // Default settings target yuv420p output for maximum compatibility.
            return Err(ReelError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }
}

/// Whether a usable `ffmpeg` binary is on `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Default downloadable artifact name, unique per call via an epoch-seconds
/// timestamp.
pub fn timestamped_output_name(prefix: &str) -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{prefix}_{secs}.mp4")
}

/// Streaming MP4 encoder over the system `ffmpeg` binary.
///
/// We intentionally shell out rather than link FFmpeg to avoid native dev
/// header/lib requirements. Raw RGBA frames are piped to stdin; `finish`
/// closes the pipe, waits for the muxer to flush, and surfaces stderr on
/// failure. Dropping without `finish` closes stdin, letting the child drain
/// and exit on its own.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    child: Child,
    stdin: Option<ChildStdin>,
}

impl FfmpegEncoder {
    /// Spawn the encoder for `cfg`.
    pub fn new(cfg: EncodeConfig) -> ReelResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(ReelError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(ReelError::resource(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if cfg.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
        ]);

        match &cfg.audio {
            Some(AudioInput::Container { path }) => {
                cmd.arg("-i").arg(path);
                // `1:a?` keeps silent sources working instead of failing the mux.
                cmd.args(["-map", "0:v", "-map", "1:a?", "-c:a", "aac", "-shortest"]);
            }
            Some(AudioInput::RawF32le {
                path,
                sample_rate,
                channels,
            }) => {
                cmd.args([
                    "-f",
                    "f32le",
                    "-ar",
                    &sample_rate.to_string(),
                    "-ac",
                    &channels.to_string(),
                ]);
                cmd.arg("-i").arg(path);
                cmd.args(["-map", "0:v", "-map", "1:a", "-c:a", "aac", "-shortest"]);
            }
            None => {
                cmd.arg("-an");
            }
        }

        cmd.args([
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&cfg.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            ReelError::resource(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::resource("failed to open ffmpeg stdin (unexpected)"))?;

        Ok(Self {
            cfg,
            child,
            stdin: Some(stdin),
        })
    }

    /// Append one composited frame to the stream.
    pub fn encode_frame(&mut self, frame: &FrameRgba) -> ReelResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        let expected = self.cfg.width as usize * self.cfg.height as usize * 4;
        if frame.data.len() != expected {
            return Err(ReelError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::resource("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            ReelError::resource(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    /// Close the stream, wait for the muxer to flush, and check its status.
    pub fn finish(mut self) -> ReelResult<()> {
        drop(self.stdin.take());

        let output = self
            .child
            .wait_with_output()
            .map_err(|e| ReelError::resource(format!("failed to wait for ffmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReelError::resource(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
