//! The export state machine.
//!
//! One linear pass: `Idle -> Preparing -> Encoding -> Finalizing` and then
//! `Done` or `Failed`. Overlay assets are decoded up front in `Preparing`,
//! every source frame is composited and written in `Encoding`, and the sink
//! is flushed in `Finalizing`. Completion is driven solely by the source's
//! end-of-media signal; progress is advisory and capped below `1.0` until
//! finalization succeeds.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::assets::store::OverlayStore;
use crate::beat::model::Project;
use crate::compose::frame::compose_frame;
use crate::foundation::core::AspectPreset;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::sink::FrameSink;
use crate::render::source::FrameSource;

/// Where the export currently is in its linear pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportPhase {
    /// No export running.
    Idle,
    /// Decoding overlay assets and opening the output.
    Preparing,
    /// Compositing and writing frames.
    Encoding,
    /// Source exhausted; flushing and closing the output.
    Finalizing,
    /// Output is complete and valid.
    Done,
    /// Export aborted; any partial output is invalid.
    Failed,
}

/// One progress report handed to the caller's callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportProgress {
    /// Current phase.
    pub phase: ExportPhase,
    /// Fractional completion in `[0, 1]`. `None` while the source duration
    /// is unknown. Reaches exactly `1.0` only in [`ExportPhase::Done`].
    pub progress: Option<f64>,
}

/// Cooperative cancellation flag, checked between frames.
///
/// Cloning shares the flag; any clone may request cancellation. A request
/// takes effect at the next frame boundary, so a frame mid-write is never
/// torn.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Fresh token with no cancellation requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Counters describing a finished export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Frames written to the sink.
    pub frames_total: u64,
    /// Frames that carried a B-roll overlay.
    pub frames_overlaid: u64,
}

/// Caller-facing export parameters independent of source and sink.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Output canvas preset.
    pub aspect: AspectPreset,
    /// Directory that relative asset sources resolve against.
    pub assets_root: PathBuf,
}

/// Run a full export of `project` from `source` into `sink`.
///
/// `on_progress` receives every phase transition plus periodic progress
/// during encoding. On any error the `Failed` phase is reported and the
/// error returned; the sink is left unfinished, so a partial output is never
/// presented as complete. Cancellation via `cancel` surfaces as a
/// precondition error through the same path.
pub fn export_with(
    project: &Project,
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    options: &ExportOptions,
    on_progress: &mut dyn FnMut(ExportProgress),
    cancel: &CancelToken,
) -> ReelResult<ExportStats> {
    match run(project, source, sink, options, on_progress, cancel) {
        Ok(stats) => Ok(stats),
        Err(err) => {
            on_progress(ExportProgress {
                phase: ExportPhase::Failed,
                progress: None,
            });
            Err(err)
        }
    }
}

fn run(
    project: &Project,
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    options: &ExportOptions,
    on_progress: &mut dyn FnMut(ExportProgress),
    cancel: &CancelToken,
) -> ReelResult<ExportStats> {
    project.validate()?;

    on_progress(ExportProgress {
        phase: ExportPhase::Preparing,
        progress: None,
    });
    let overlays = OverlayStore::prepare(project, &options.assets_root);
    let canvas = options.aspect.canvas();
    let duration_sec = source.description().duration_sec;
    info!(
        width = canvas.width,
        height = canvas.height,
        duration_sec,
        overlays = overlays.len(),
        "export started"
    );

    on_progress(ExportProgress {
        phase: ExportPhase::Encoding,
        progress: progress_at(0.0, duration_sec),
    });

    let mut stats = ExportStats::default();
    let mut last_progress = 0.0f64;
    loop {
        if cancel.is_cancelled() {
            info!(frames = stats.frames_total, "export cancelled");
            return Err(ReelError::precondition("export cancelled"));
        }
        let Some(src_frame) = source.next_frame()? else {
            break;
        };

        let beat = project.timeline.active_beat_at(src_frame.timestamp_sec);
        if beat.is_some() {
            stats.frames_overlaid += 1;
        }
        let composed = compose_frame(canvas, &src_frame.frame, beat, &overlays);
        sink.write_frame(&composed)?;
        stats.frames_total += 1;

        if let Some(p) = progress_at(src_frame.timestamp_sec, duration_sec) {
            // Monotonic even if source timestamps jitter backwards.
            last_progress = last_progress.max(p);
            on_progress(ExportProgress {
                phase: ExportPhase::Encoding,
                progress: Some(last_progress),
            });
        }
        if stats.frames_total.is_multiple_of(300) {
            debug!(frames = stats.frames_total, "encoding");
        }
    }

    on_progress(ExportProgress {
        phase: ExportPhase::Finalizing,
        progress: progress_at(duration_sec, duration_sec),
    });
    sink.finish()?;

    info!(
        frames = stats.frames_total,
        overlaid = stats.frames_overlaid,
        "export finished"
    );
    on_progress(ExportProgress {
        phase: ExportPhase::Done,
        progress: Some(1.0),
    });
    Ok(stats)
}

/// Advisory progress at timestamp `t`, capped at `0.99` so only a completed
/// finalization ever reports `1.0`. `None` when the duration is unknown.
fn progress_at(t: f64, duration_sec: f64) -> Option<f64> {
    if duration_sec > 0.0 {
        Some((t / duration_sec).clamp(0.0, 0.99))
    } else {
        None
    }
}

/// Export a project's attached source video to an MP4 file.
///
/// Opens the A-roll with ffmpeg, forwards its audio track when present, and
/// runs [`export_with`] over the real source and encoder.
#[cfg(feature = "media-ffmpeg")]
pub fn export_project_to_file(
    project: &Project,
    options: &ExportOptions,
    out_path: &Path,
    overwrite: bool,
    on_progress: &mut dyn FnMut(ExportProgress),
    cancel: &CancelToken,
) -> ReelResult<ExportStats> {
    use crate::encode::ffmpeg::{AudioInput, EncodeConfig};
    use crate::render::sink::EncoderSink;
    use crate::render::source::MediaFrameSource;

    let Some(rel) = project.source_video.as_deref() else {
        return Err(ReelError::precondition(
            "project has no source video attached",
        ));
    };
    let video_path = options.assets_root.join(rel);
    let mut source = MediaFrameSource::open(&video_path)?;

    let canvas = options.aspect.canvas();
    let desc = source.description();
    let fps = desc.fps.round().max(1.0) as u32;
    let audio = desc.has_audio.then(|| AudioInput::Container {
        path: video_path.clone(),
    });
    let mut sink = EncoderSink::new(EncodeConfig {
        width: canvas.width,
        height: canvas.height,
        fps,
        out_path: out_path.to_path_buf(),
        overwrite,
        audio,
    })?;

    export_with(project, &mut source, &mut sink, options, on_progress, cancel)
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Stub kept so callers get a uniform error without the feature.
pub fn export_project_to_file(
    _project: &Project,
    _options: &ExportOptions,
    _out_path: &Path,
    _overwrite: bool,
    _on_progress: &mut dyn FnMut(ExportProgress),
    _cancel: &CancelToken,
) -> ReelResult<ExportStats> {
    Err(ReelError::resource(
        "file export requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
