//! Linear-PCM decode/encode and sample-accurate concatenation.
//!
//! Samples are held as interleaved `f32` in `[-1.0, 1.0]`. WAV output is the
//! plain 44-byte-header uncompressed 16-bit PCM form, which every speech
//! transcription endpoint accepts.

use crate::foundation::error::{ReelError, ReelResult};

/// Decoded multi-channel audio, interleaved `f32` samples in `[-1.0, 1.0]`.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved samples, `frame_count * channels` long.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Number of sample frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.interleaved_f32.len() / usize::from(self.channels)
        }
    }

    /// Duration in seconds.
    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frame_count() as f64 / f64::from(self.sample_rate)
        }
    }
}

/// Decode signed 16-bit little-endian PCM into normalized floats.
///
/// Normalization is a fixed-point division by 32768, so `i16::MIN` maps to
/// exactly `-1.0`.
pub fn decode_pcm16le(bytes: &[u8], sample_rate: u32, channels: u16) -> ReelResult<AudioPcm> {
    if sample_rate == 0 || channels == 0 {
        return Err(ReelError::validation(
            "pcm sample_rate and channels must be non-zero",
        ));
    }
    if !bytes.len().is_multiple_of(2) {
        return Err(ReelError::validation(
            "pcm16 byte length must be a multiple of 2",
        ));
    }
    let mut interleaved_f32 = Vec::with_capacity(bytes.len() / 2);
    for chunk in bytes.chunks_exact(2) {
        let v = i16::from_le_bytes([chunk[0], chunk[1]]);
        interleaved_f32.push(f32::from(v) / 32768.0);
    }
    Ok(AudioPcm {
        sample_rate,
        channels,
        interleaved_f32,
    })
}

/// Serialize to an uncompressed 16-bit PCM WAV container.
///
/// Samples are clamped to `[-1, 1]` and quantized with an asymmetric scale
/// (`*32768` for negative values, `*32767` for positive) so both extremes
/// stay within the signed 16-bit range without overflow.
pub fn encode_wav(pcm: &AudioPcm) -> ReelResult<Vec<u8>> {
    if pcm.sample_rate == 0 || pcm.channels == 0 {
        return Err(ReelError::validation(
            "wav sample_rate and channels must be non-zero",
        ));
    }
    let data_len = pcm
        .interleaved_f32
        .len()
        .checked_mul(2)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ReelError::validation("wav data too large for RIFF container"))?;

    let block_align = pcm.channels * 2;
    let byte_rate = pcm.sample_rate * u32::from(block_align);

    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&pcm.channels.to_le_bytes());
    out.extend_from_slice(&pcm.sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());

    for &sample in &pcm.interleaved_f32 {
        let s = sample.clamp(-1.0, 1.0);
        let q = if s < 0.0 {
            (f64::from(s) * 32768.0).round() as i16
        } else {
            (f64::from(s) * 32767.0).round() as i16
        };
        out.extend_from_slice(&q.to_le_bytes());
    }
    Ok(out)
}

/// Parse a 16-bit PCM WAV container back into normalized floats.
pub fn decode_wav(bytes: &[u8]) -> ReelResult<AudioPcm> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(ReelError::validation("not a RIFF/WAVE container"));
    }

    let mut sample_rate = 0u32;
    let mut channels = 0u16;
    let mut data: Option<&[u8]> = None;
    let mut pos = 12usize;
    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let len = u32::from_le_bytes([bytes[pos + 4], bytes[pos + 5], bytes[pos + 6], bytes[pos + 7]])
            as usize;
        let body_end = pos + 8 + len;
        if body_end > bytes.len() {
            return Err(ReelError::validation("truncated wav chunk"));
        }
        let body = &bytes[pos + 8..body_end];
        match id {
            b"fmt " => {
                if len < 16 {
                    return Err(ReelError::validation("wav fmt chunk too short"));
                }
                let format = u16::from_le_bytes([body[0], body[1]]);
                if format != 1 {
                    return Err(ReelError::format_mismatch(format!(
                        "only 16-bit PCM wav is supported, got format tag {format}"
                    )));
                }
                let bits = u16::from_le_bytes([body[14], body[15]]);
                if bits != 16 {
                    return Err(ReelError::format_mismatch(format!(
                        "only 16-bit PCM wav is supported, got {bits} bits"
                    )));
                }
                channels = u16::from_le_bytes([body[2], body[3]]);
                sample_rate = u32::from_le_bytes([body[4], body[5], body[6], body[7]]);
            }
            b"data" => data = Some(body),
            _ => {}
        }
        // Chunks are word-aligned; odd-sized bodies carry a pad byte.
        pos = body_end + (len & 1);
    }

    let data = data.ok_or_else(|| ReelError::validation("wav missing data chunk"))?;
    if sample_rate == 0 || channels == 0 {
        return Err(ReelError::validation("wav missing or invalid fmt chunk"));
    }
    decode_pcm16le(data, sample_rate, channels)
}

/// Concatenate clips back to back with no gap or crossfade at the splices.
///
/// The first clip's format is authoritative; any clip with a different
/// sample rate or channel count is rejected with a format mismatch rather
/// than resampled. The output frame count is the exact sum of the inputs'.
pub fn concat(clips: &[AudioPcm]) -> ReelResult<AudioPcm> {
    let Some(first) = clips.first() else {
        return Err(ReelError::precondition("concat requires at least one clip"));
    };
    for (idx, clip) in clips.iter().enumerate().skip(1) {
        if clip.sample_rate != first.sample_rate {
            return Err(ReelError::format_mismatch(format!(
                "clip {idx} is {} Hz, expected {} Hz",
                clip.sample_rate, first.sample_rate
            )));
        }
        if clip.channels != first.channels {
            return Err(ReelError::format_mismatch(format!(
                "clip {idx} has {} channels, expected {}",
                clip.channels, first.channels
            )));
        }
    }

    let total: usize = clips.iter().map(|c| c.interleaved_f32.len()).sum();
    let mut interleaved_f32 = Vec::with_capacity(total);
    for clip in clips {
        interleaved_f32.extend_from_slice(&clip.interleaved_f32);
    }
    Ok(AudioPcm {
        sample_rate: first.sample_rate,
        channels: first.channels,
        interleaved_f32,
    })
}

/// Decode a video container's audio track and re-encode it as WAV, the
/// input format handed to speech transcription. Requires the `media-ffmpeg`
/// feature at runtime.
pub fn extract_wav_from_video(path: &std::path::Path) -> ReelResult<Vec<u8>> {
    use crate::assets::media;

    let interleaved_f32 = media::decode_audio_f32(path, media::MIX_SAMPLE_RATE, 2)?;
    encode_wav(&AudioPcm {
        sample_rate: media::MIX_SAMPLE_RATE,
        channels: 2,
        interleaved_f32,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/wav.rs"]
mod tests;
