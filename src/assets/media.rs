use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelError, ReelResult};

/// Sample rate used for decoded audio throughout the crate.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Probed metadata for an A-roll source video.
#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    /// Absolute or caller-relative source path.
    pub source_path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frame rate numerator.
    pub fps_num: u32,
    /// Frame rate denominator.
    pub fps_den: u32,
    /// Container duration in seconds; `0.0` when unknown.
    pub duration_sec: f64,
    /// Whether the container carries an audio stream.
    pub has_audio: bool,
}

impl VideoSourceInfo {
    /// Source frame rate as a float; zero when degenerate.
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }
}

/// Probe a video container with `ffprobe`.
#[cfg(feature = "media-ffmpeg")]
pub fn probe_video(source_path: &Path) -> ReelResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| ReelError::resource(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::resource(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| ReelError::serde(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| ReelError::resource("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| ReelError::resource("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| ReelError::resource("missing video height from ffprobe"))?;

    let (fps_num, fps_den) = parse_ff_ratio(video_stream.r_frame_rate.as_deref().unwrap_or("0/1"))
        .ok_or_else(|| ReelError::resource("invalid video r_frame_rate"))?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
        has_audio,
    })
}

/// Probe stub used without the `media-ffmpeg` feature.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_video(_source_path: &Path) -> ReelResult<VideoSourceInfo> {
    Err(ReelError::resource(
        "video/audio sources require the 'media-ffmpeg' feature",
    ))
}

/// Streaming RGBA frame reader over a decoding `ffmpeg` child process.
///
/// Frames arrive in presentation order as tightly packed `width*height*4`
/// byte buffers. Dropping the stream kills the child so a caller abandoning
/// an export cannot leak a decoder process.
#[cfg(feature = "media-ffmpeg")]
pub struct RgbaFrameStream {
    child: std::process::Child,
    stdout: std::process::ChildStdout,
    frame_len: usize,
    finished: bool,
}

#[cfg(feature = "media-ffmpeg")]
impl RgbaFrameStream {
    /// Spawn a decoder streaming every frame of `info` from time zero.
    pub fn open(info: &VideoSourceInfo) -> ReelResult<Self> {
        use std::process::{Command, Stdio};

        let frame_len = info.width as usize * info.height as usize * 4;
        if frame_len == 0 {
            return Err(ReelError::resource(
                "cannot stream frames from a zero-sized video source",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(&info.source_path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                ReelError::resource(format!("failed to spawn ffmpeg for video decode: {e}"))
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ReelError::resource("failed to open ffmpeg stdout (unexpected)"))?;

        Ok(Self {
            child,
            stdout,
            frame_len,
            finished: false,
        })
    }

    /// Read the next frame; `Ok(None)` is the end-of-media signal.
    pub fn next_frame(&mut self) -> ReelResult<Option<Vec<u8>>> {
        use std::io::Read as _;

        if self.finished {
            return Ok(None);
        }
        let mut buf = vec![0u8; self.frame_len];
        let mut filled = 0usize;
        while filled < self.frame_len {
            let n = self.stdout.read(&mut buf[filled..]).map_err(|e| {
                ReelError::resource(format!("failed to read decoded frame from ffmpeg: {e}"))
            })?;
            if n == 0 {
                self.finished = true;
                if filled == 0 {
                    return Ok(None);
                }
                return Err(ReelError::resource(format!(
                    "truncated frame from ffmpeg: got {filled} of {} bytes",
                    self.frame_len
                )));
            }
            filled += n;
        }
        Ok(Some(buf))
    }
}

#[cfg(feature = "media-ffmpeg")]
impl Drop for RgbaFrameStream {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Decode a container's audio track to interleaved f32 PCM.
///
/// Files without an audio stream decode to an empty buffer rather than an
/// error, matching how exports of silent sources should behave.
#[cfg(feature = "media-ffmpeg")]
pub fn decode_audio_f32(path: &Path, sample_rate: u32, channels: u16) -> ReelResult<Vec<f32>> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &channels.to_string(),
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| ReelError::resource(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        // ffmpeg reports the absence of an audio stream as an error.
        if msg.contains("Stream specifier")
            || msg.contains("matches no streams")
            || msg.contains("does not contain any stream")
        {
            return Ok(Vec::new());
        }
        return Err(ReelError::resource(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(ReelError::resource(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(pcm)
}

/// Audio decode stub used without the `media-ffmpeg` feature.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn decode_audio_f32(_path: &Path, _sample_rate: u32, _channels: u16) -> ReelResult<Vec<f32>> {
    Err(ReelError::resource(
        "video/audio sources require the 'media-ffmpeg' feature",
    ))
}

#[cfg(feature = "media-ffmpeg")]
fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}
