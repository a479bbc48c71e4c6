//! Reelbeat is a beat-timeline video editing and rendering engine.
//!
//! Reelbeat turns a narrated A-roll video plus generated B-roll imagery into
//! a composited short-form clip. The unit of editing is the *beat*: a
//! contiguous time interval of the output paired with narration text and an
//! overlay treatment. Beats always partition `[0, duration)` with no gaps or
//! overlaps, and every edit preserves that invariant or fails without
//! touching state.
//!
//! # Pipeline overview
//!
//! 1. **Model**: a [`Timeline`] of [`Beat`]s inside a [`Project`]
//! 2. **Edit**: character-proportional [`split`] and gallery-union [`merge`]
//! 3. **Compose**: `A-roll frame + active beat -> FrameRgba` via
//!    [`compose_frame`], shared by preview and export
//! 4. **Export**: [`export_with`] walks a [`FrameSource`] into a
//!    [`FrameSink`], encoding through the system `ffmpeg` binary
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No IO while compositing**: overlay images are front-loaded in
//!   [`OverlayStore`]; the per-frame path is pure.
//! - **Straight-alpha RGBA8** end-to-end.
//! - **End-of-media completion**: export finishes when the source says so,
//!   never when a progress estimate reaches 100%.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod audio;
mod beat;
mod compose;
mod encode;
mod foundation;
mod render;
mod service;

pub use assets::decode::{decode_image, normalize_to_png};
pub use assets::media::{MIX_SAMPLE_RATE, VideoSourceInfo, decode_audio_f32, probe_video};
pub use assets::store::{OverlayStore, PreparedImage};
pub use audio::wav::{
    AudioPcm, concat, decode_pcm16le, decode_wav, encode_wav, extract_wav_from_video,
};
pub use beat::analysis::{
    beats_from_script_segments, beats_from_timed_segments, heuristic_duration_sec,
};
pub use beat::edit::{EditCommand, EditOutcome, apply, merge, split};
pub use beat::model::{
    Beat, BeatId, OverlayMode, OverlaySettings, Project, StyleSettings, Timeline,
};
pub use compose::frame::{BACKGROUND_RGB, PixelsRgba, blit, compose_frame};
pub use compose::geometry::{
    contain_fit, cover_crop_with_pan, cover_fit, overlay_placement, split_bands,
};
pub use encode::ffmpeg::{
    AudioInput, EncodeConfig, FfmpegEncoder, ensure_parent_dir, is_ffmpeg_on_path,
    timestamped_output_name,
};
pub use foundation::core::{
    AspectPreset, Canvas, FrameRgba, Point, Rect, TIME_EPSILON, TimeRange, Vec2,
};
pub use foundation::error::{ReelError, ReelResult};
pub use render::pipeline::{
    CancelToken, ExportOptions, ExportPhase, ExportProgress, ExportStats, export_project_to_file,
    export_with,
};
pub use render::sink::{BufferSink, EncoderSink, FrameSink};
pub use render::source::{FixedCadenceSource, FrameSource, SourceDescription, SourceFrame};
#[cfg(feature = "media-ffmpeg")]
pub use render::source::MediaFrameSource;
pub use service::batch::{BatchConfig, BatchItem, BatchOutcome, generate_serially};
pub use service::contract::{
    AnalyzedSegment, AudioAnalysis, AudioAnalysisResult, ImageGeneration, ImageRequest,
    ScriptAnalysis, SpeechRequest, SpeechSynthesis, SynthesizedAudio, TimedSegment, VideoGeneration,
    VideoOperation, VideoPoll, VideoRequest,
};
pub use service::retry::{RetryConfig, backoff_delay, with_backoff};
