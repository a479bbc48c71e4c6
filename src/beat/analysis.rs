//! Building timed beats out of generative analysis output.
//!
//! Script analysis returns ordered text segments with no timing; durations
//! are assigned with a word-count heuristic (`max(2, words / 2.5)` seconds,
//! running sum). Audio analysis returns segments with service-provided
//! timestamps, which are snapped into a contiguous partition rather than
//! trusted blindly.

use crate::beat::model::{Beat, Timeline};
use crate::foundation::core::{TIME_EPSILON, TimeRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::service::contract::{AnalyzedSegment, TimedSegment};

/// Seconds of narration assumed per word.
const SECONDS_PER_WORD: f64 = 1.0 / 2.5;

/// Minimum duration assigned to any analyzed segment, in seconds.
const MIN_SEGMENT_SEC: f64 = 2.0;

/// Heuristic duration for a narration segment.
///
/// Word-count based and intentionally approximate; split timing later
/// re-divides these spans proportionally by character count.
pub fn heuristic_duration_sec(text: &str) -> f64 {
    let words = text.split_whitespace().count() as f64;
    (words * SECONDS_PER_WORD).max(MIN_SEGMENT_SEC)
}

/// Build a timeline from untimed script analysis segments, assigning each a
/// heuristic duration and laying them out back to back from zero.
pub fn beats_from_script_segments(segments: &[AnalyzedSegment]) -> ReelResult<Timeline> {
    if segments.is_empty() {
        return Err(ReelError::validation(
            "script analysis returned no segments",
        ));
    }
    let mut beats = Vec::with_capacity(segments.len());
    let mut cursor = 0.0f64;
    for seg in segments {
        let end = cursor + heuristic_duration_sec(&seg.text);
        let mut beat = Beat::new(TimeRange::new(cursor, end)?, seg.text.clone());
        beat.visual_prompt = seg.visual_prompt.clone();
        beat.overlay = seg.overlay;
        beats.push(beat);
        cursor = end;
    }
    Timeline::new(beats, cursor)
}

/// Build a timeline from audio analysis segments that carry service-provided
/// timestamps.
///
/// Segments are sorted by start time, the first is snapped to zero, and each
/// subsequent start is snapped to the previous end so the result satisfies
/// the partition invariant. Segments squeezed to nothing by snapping are
/// rejected rather than silently dropped.
pub fn beats_from_timed_segments(segments: &[TimedSegment]) -> ReelResult<Timeline> {
    if segments.is_empty() {
        return Err(ReelError::validation("audio analysis returned no segments"));
    }
    let mut ordered: Vec<&TimedSegment> = segments.iter().collect();
    ordered.sort_by(|a, b| a.start_sec.total_cmp(&b.start_sec));

    let mut beats = Vec::with_capacity(ordered.len());
    let mut cursor = 0.0f64;
    for seg in ordered {
        if seg.end_sec <= cursor + TIME_EPSILON {
            return Err(ReelError::validation(format!(
                "audio analysis segment '{}' has no duration after snapping to {cursor:.3}s",
                seg.segment.text
            )));
        }
        let mut beat = Beat::new(TimeRange::new(cursor, seg.end_sec)?, seg.segment.text.clone());
        beat.visual_prompt = seg.segment.visual_prompt.clone();
        beat.overlay = seg.segment.overlay;
        beats.push(beat);
        cursor = seg.end_sec;
    }
    Timeline::new(beats, cursor)
}

#[cfg(test)]
#[path = "../../tests/unit/beat/analysis.rs"]
mod tests;
