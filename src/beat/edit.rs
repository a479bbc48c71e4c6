//! Timeline editing as pure state transitions.
//!
//! Each operation takes the current [`Timeline`] and returns a new one,
//! leaving the input untouched. Errors are raised before any new state is
//! produced, so a failed edit never leaves a half-applied timeline. The
//! `(state, command) -> new state` shape keeps edits deterministic to test
//! and makes undo/redo a matter of keeping old values.

use crate::beat::model::{Beat, BeatId, Timeline};
use crate::foundation::core::TimeRange;
use crate::foundation::error::{ReelError, ReelResult};

/// A timeline editing command.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum EditCommand {
    /// Split one beat by character offsets into its text.
    Split {
        /// Beat to split.
        id: BeatId,
        /// Selection start, in characters.
        start_offset: usize,
        /// Selection end, in characters.
        end_offset: usize,
    },
    /// Merge the selected beats into one.
    Merge {
        /// Beats to merge, in any order.
        ids: Vec<BeatId>,
    },
}

/// Result of applying an [`EditCommand`].
#[derive(Clone, Debug)]
pub enum EditOutcome {
    /// The command produced a new timeline.
    Changed(Timeline),
    /// The command was a recognised no-op (e.g. merging fewer than 2 beats).
    Unchanged,
}

/// Apply `command` to `timeline`, producing a new timeline or a no-op.
pub fn apply(timeline: &Timeline, command: &EditCommand) -> ReelResult<EditOutcome> {
    match command {
        EditCommand::Split {
            id,
            start_offset,
            end_offset,
        } => split(timeline, *id, *start_offset, *end_offset).map(EditOutcome::Changed),
        EditCommand::Merge { ids } => Ok(match merge(timeline, ids)? {
            Some(tl) => EditOutcome::Changed(tl),
            None => EditOutcome::Unchanged,
        }),
    }
}

/// Split the beat `id` into up to three beats by character offsets into its
/// text, `0 <= start_offset < end_offset <= text chars`.
///
/// Each part's duration is the original duration scaled by its share of the
/// character count. Character-proportional timing is a deliberate
/// approximation; word or phoneme boundaries are not consulted. Empty
/// leading/trailing parts are dropped; the selected middle part is always
/// kept. Children get fresh ids, inherit overlay mode, geometry settings,
/// enablement, and style override, and start with empty image state.
pub fn split(
    timeline: &Timeline,
    id: BeatId,
    start_offset: usize,
    end_offset: usize,
) -> ReelResult<Timeline> {
    let position = timeline
        .beats
        .iter()
        .position(|b| b.id == id)
        .ok_or_else(|| ReelError::validation(format!("split: unknown beat id {id}")))?;
    let beat = &timeline.beats[position];

    let total_chars = beat.text.chars().count();
    if start_offset >= end_offset {
        return Err(ReelError::invalid_range(format!(
            "split offsets must satisfy start < end, got ({start_offset}, {end_offset})"
        )));
    }
    if end_offset > total_chars {
        return Err(ReelError::invalid_range(format!(
            "split end_offset {end_offset} exceeds text length {total_chars}"
        )));
    }

    let chars: Vec<char> = beat.text.chars().collect();
    let parts: Vec<String> = [
        chars[..start_offset].iter().collect::<String>(),
        chars[start_offset..end_offset].iter().collect(),
        chars[end_offset..].iter().collect(),
    ]
    .into_iter()
    .filter(|p: &String| !p.is_empty())
    .collect();

    let duration = beat.range.duration();
    let mut children = Vec::with_capacity(parts.len());
    let mut cursor = beat.range.start;
    for (idx, part) in parts.iter().enumerate() {
        let share = part.chars().count() as f64 / total_chars as f64;
        let end = if idx + 1 == parts.len() {
            // Last child absorbs float drift so the children exactly cover
            // the parent interval.
            beat.range.end
        } else {
            cursor + duration * share
        };
        let mut child = Beat::new(TimeRange::new(cursor, end)?, part.clone());
        child.overlay = beat.overlay;
        child.enabled = beat.enabled;
        child.settings = beat.settings;
        child.style = beat.style.clone();
        children.push(child);
        cursor = end;
    }

    let mut beats = timeline.beats.clone();
    beats.splice(position..=position, children);
    Timeline::new(beats, timeline.duration_sec)
}

/// Merge the beats named by `ids` (any order, duplicates ignored) into one
/// beat spanning from the earliest start to the latest end.
///
/// Returns `Ok(None)` when fewer than two distinct beats are selected: the
/// precondition failure is a no-effect return, not a fault. The selected
/// beats must be adjacent on the timeline; a selection that skips over an
/// unselected beat would break the partition invariant and is rejected
/// before any state is produced.
///
/// The merged beat takes its visual identity (image, overlay mode,
/// enablement, geometry, style) from the earliest selected beat; the
/// galleries of all selected beats are unioned without duplicates, with the
/// surviving beat's active image placed first.
pub fn merge(timeline: &Timeline, ids: &[BeatId]) -> ReelResult<Option<Timeline>> {
    let mut unique: Vec<BeatId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    if unique.len() < 2 {
        return Ok(None);
    }

    let mut selected: Vec<&Beat> = Vec::with_capacity(unique.len());
    for id in &unique {
        let beat = timeline
            .beat(*id)
            .ok_or_else(|| ReelError::validation(format!("merge: unknown beat id {id}")))?;
        selected.push(beat);
    }
    selected.sort_by(|a, b| a.range.start.total_cmp(&b.range.start));

    for pair in selected.windows(2) {
        if !pair[0].range.abuts(pair[1].range) {
            return Err(ReelError::validation(format!(
                "merge selection must be adjacent on the timeline; '{}' does not abut \
                 '{}' (include the beats between them in the selection)",
                pair[0].id, pair[1].id
            )));
        }
    }

    let first = selected[0];
    let span = TimeRange::new(first.range.start, selected[selected.len() - 1].range.end)?;
    let text = selected
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let mut gallery: Vec<String> = Vec::new();
    if let Some(active) = &first.broll_image {
        gallery.push(active.clone());
    }
    for beat in &selected {
        for option in &beat.broll_options {
            if !gallery.contains(option) {
                gallery.push(option.clone());
            }
        }
    }

    let merged = Beat {
        id: BeatId::new(),
        range: span,
        text,
        visual_prompt: first.visual_prompt.clone(),
        broll_image: first.broll_image.clone(),
        broll_options: gallery,
        overlay: first.overlay,
        enabled: first.enabled,
        settings: first.settings,
        style: first.style.clone(),
    };

    let mut beats: Vec<Beat> = timeline
        .beats
        .iter()
        .filter(|b| !unique.contains(&b.id))
        .cloned()
        .collect();
    beats.push(merged);
    Timeline::new(beats, timeline.duration_sec).map(Some)
}

#[cfg(test)]
#[path = "../../tests/unit/beat/edit.rs"]
mod tests;
