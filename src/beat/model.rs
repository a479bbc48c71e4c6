use crate::foundation::core::{TIME_EPSILON, TimeRange};
use crate::foundation::error::{ReelError, ReelResult};

/// Stable beat identifier, unchanged by in-place edits.
///
/// Fresh ids are minted by split/merge; an id never survives the operation
/// that destroys its beat.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct BeatId(pub uuid::Uuid);

impl BeatId {
    /// Mint a fresh random id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for BeatId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// How a beat's B-roll image is laid over the A-roll frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayMode {
    /// The B-roll image covers the whole frame as an inset overlay; the
    /// A-roll keeps its own framing underneath.
    #[default]
    Full,
    /// The frame is divided into two horizontal bands: B-roll on top,
    /// cover-cropped A-roll below.
    Split,
}

/// Geometric configuration for a beat's overlay.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlaySettings {
    /// Horizontal translation as a percentage of the overlay area width, `[-50, 50]`.
    #[serde(default)]
    pub x_pct: f64,
    /// Vertical translation as a percentage of the overlay area height, `[-50, 50]`.
    #[serde(default)]
    pub y_pct: f64,
    /// Uniform scale about the area center, `[0.5, 3.0]`.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Percentage of frame height given to the top (B-roll) band in split
    /// mode, `[20, 80]`.
    #[serde(default = "default_band_height")]
    pub band_height_pct: f64,
    /// Vertical pan of the cropped A-roll band in split mode, `[0, 100]`.
    /// `0` shows the top of the source, `100` the bottom, `50` is centered.
    #[serde(default = "default_pan")]
    pub aroll_pan_pct: f64,
}

fn default_scale() -> f64 {
    1.0
}

fn default_band_height() -> f64 {
    50.0
}

fn default_pan() -> f64 {
    50.0
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            x_pct: 0.0,
            y_pct: 0.0,
            scale: default_scale(),
            band_height_pct: default_band_height(),
            aroll_pan_pct: default_pan(),
        }
    }
}

impl OverlaySettings {
    /// Validate value ranges.
    pub fn validate(&self) -> ReelResult<()> {
        for (name, value, lo, hi) in [
            ("x_pct", self.x_pct, -50.0, 50.0),
            ("y_pct", self.y_pct, -50.0, 50.0),
            ("scale", self.scale, 0.5, 3.0),
            ("band_height_pct", self.band_height_pct, 20.0, 80.0),
            ("aroll_pan_pct", self.aroll_pan_pct, 0.0, 100.0),
        ] {
            if !value.is_finite() || value < lo || value > hi {
                return Err(ReelError::validation(format!(
                    "overlay settings {name} must be finite and within [{lo}, {hi}]",
                )));
            }
        }
        Ok(())
    }
}

/// Style settings driving image generation, either project-wide or as a
/// per-beat override.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StyleSettings {
    /// Free-text theme applied to generated imagery.
    #[serde(default)]
    pub theme_prompt: String,
    /// Images requested per generation call, `1..=4`.
    #[serde(default = "default_image_count")]
    pub image_count: u8,
    /// Optional reference image source (relative path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image: Option<String>,
    /// Optional avatar image source (relative path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_image: Option<String>,
}

fn default_image_count() -> u8 {
    1
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            theme_prompt: String::new(),
            image_count: default_image_count(),
            reference_image: None,
            avatar_image: None,
        }
    }
}

impl StyleSettings {
    /// Validate counts and image source paths.
    pub fn validate(&self) -> ReelResult<()> {
        if !(1..=4).contains(&self.image_count) {
            return Err(ReelError::validation(
                "style image_count must be within 1..=4",
            ));
        }
        if let Some(src) = &self.reference_image {
            validate_rel_source(src, "style reference_image")?;
        }
        if let Some(src) = &self.avatar_image {
            validate_rel_source(src, "style avatar_image")?;
        }
        Ok(())
    }
}

/// A contiguous time interval of the output timeline paired with its visual
/// treatment.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Beat {
    /// Stable identifier.
    pub id: BeatId,
    /// Placement `[start, end)` in seconds on the master timeline.
    pub range: TimeRange,
    /// Span of source narration text this beat corresponds to. Display and
    /// prompt input only; neighbors' text may overlap.
    pub text: String,
    /// Free-text description used to request a B-roll image.
    #[serde(default)]
    pub visual_prompt: String,
    /// Currently selected B-roll image source, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broll_image: Option<String>,
    /// Append-only gallery of previously generated/uploaded image sources.
    #[serde(default)]
    pub broll_options: Vec<String>,
    /// Overlay layout for this beat.
    #[serde(default)]
    pub overlay: OverlayMode,
    /// When false the overlay is suppressed entirely; the beat's time range
    /// and text remain.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Geometric overlay configuration.
    #[serde(default)]
    pub settings: OverlaySettings,
    /// Per-beat style override; global [`StyleSettings`] apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleSettings>,
}

fn default_enabled() -> bool {
    true
}

impl Beat {
    /// Build a beat with default visual state over `range`.
    pub fn new(range: TimeRange, text: impl Into<String>) -> Self {
        Self {
            id: BeatId::new(),
            range,
            text: text.into(),
            visual_prompt: String::new(),
            broll_image: None,
            broll_options: Vec::new(),
            overlay: OverlayMode::Full,
            enabled: true,
            settings: OverlaySettings::default(),
            style: None,
        }
    }

    /// Select `source` as the active image, appending it to the gallery if
    /// it is not already there.
    pub fn select_image(&mut self, source: impl Into<String>) {
        let source = source.into();
        if !self.broll_options.iter().any(|s| *s == source) {
            self.broll_options.push(source.clone());
        }
        self.broll_image = Some(source);
    }

    /// Validate this beat's fields.
    pub fn validate(&self) -> ReelResult<()> {
        self.range.validate()?;
        self.settings.validate()?;
        if let Some(style) = &self.style {
            style.validate()?;
        }
        if let Some(src) = &self.broll_image {
            validate_rel_source(src, "beat broll_image")?;
        }
        for src in &self.broll_options {
            validate_rel_source(src, "beat broll_options entry")?;
        }
        Ok(())
    }
}

/// Ordered, gap-free partition of `[0, duration_sec)` into beats.
///
/// The partition invariant is established by construction and by the editing
/// operations in [`crate::beat::edit`], and checked by [`Timeline::validate`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    /// Beats ordered ascending by `range.start`.
    pub beats: Vec<Beat>,
    /// Total timeline duration in seconds.
    pub duration_sec: f64,
}

impl Timeline {
    /// Build a timeline and check the partition invariant.
    pub fn new(mut beats: Vec<Beat>, duration_sec: f64) -> ReelResult<Self> {
        beats.sort_by(|a, b| a.range.start.total_cmp(&b.range.start));
        let tl = Self {
            beats,
            duration_sec,
        };
        tl.validate()?;
        Ok(tl)
    }

    /// Check the partition invariant: beats ordered ascending, contiguous,
    /// non-overlapping, covering `[0, duration_sec)` within [`TIME_EPSILON`].
    pub fn validate(&self) -> ReelResult<()> {
        if !self.duration_sec.is_finite() || self.duration_sec <= 0.0 {
            return Err(ReelError::validation(
                "timeline duration_sec must be finite and > 0",
            ));
        }
        let Some(first) = self.beats.first() else {
            return Err(ReelError::validation("timeline must contain beats"));
        };
        if first.range.start.abs() > TIME_EPSILON {
            return Err(ReelError::validation("first beat must start at 0"));
        }
        for pair in self.beats.windows(2) {
            if !pair[0].range.abuts(pair[1].range) {
                return Err(ReelError::validation(format!(
                    "beats '{}' and '{}' leave a gap or overlap at {:.6}s",
                    pair[0].id, pair[1].id, pair[0].range.end
                )));
            }
        }
        let last = &self.beats[self.beats.len() - 1];
        if (last.range.end - self.duration_sec).abs() > TIME_EPSILON {
            return Err(ReelError::validation(
                "last beat must end at timeline duration",
            ));
        }
        for beat in &self.beats {
            beat.validate()?;
        }
        Ok(())
    }

    /// The beat whose interval contains `t`, via binary search over sorted
    /// starts. The partition invariant makes at most one beat match.
    pub fn beat_at(&self, t: f64) -> Option<&Beat> {
        let idx = self.beats.partition_point(|b| b.range.start <= t);
        let candidate = self.beats.get(idx.checked_sub(1)?)?;
        candidate.range.contains(t).then_some(candidate)
    }

    /// The enabled beat containing `t`, or `None` when the containing beat
    /// is disabled (A-roll plays full-frame as if no beat existed).
    pub fn active_beat_at(&self, t: f64) -> Option<&Beat> {
        self.beat_at(t).filter(|b| b.enabled)
    }

    /// Look up a beat by id.
    pub fn beat(&self, id: BeatId) -> Option<&Beat> {
        self.beats.iter().find(|b| b.id == id)
    }

    /// Mutable lookup by id, for in-place field edits (image assignment,
    /// settings, enable toggle). Time ranges must not be edited this way.
    pub fn beat_mut(&mut self, id: BeatId) -> Option<&mut Beat> {
        self.beats.iter_mut().find(|b| b.id == id)
    }

    /// Unique B-roll image sources referenced by enabled beats, in timeline
    /// order.
    pub fn referenced_images(&self) -> Vec<&str> {
        let mut seen = Vec::<&str>::new();
        for beat in self.beats.iter().filter(|b| b.enabled) {
            if let Some(src) = beat.broll_image.as_deref()
                && !seen.contains(&src)
            {
                seen.push(src);
            }
        }
        seen
    }
}

/// In-memory project state: the timeline plus process-wide style defaults.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Project {
    /// The beat timeline.
    pub timeline: Timeline,
    /// Project-wide style settings, read by every beat without an override.
    #[serde(default)]
    pub style: StyleSettings,
    /// Relative path to the A-roll source video, when one has been attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_video: Option<String>,
}

impl Project {
    /// Validate the timeline partition, styles, and source references.
    pub fn validate(&self) -> ReelResult<()> {
        self.timeline.validate()?;
        self.style.validate()?;
        if let Some(src) = &self.source_video {
            validate_rel_source(src, "project source_video")?;
        }
        Ok(())
    }

    /// Effective style for `beat`: its own override, or the project default.
    pub fn style_for<'a>(&'a self, beat: &'a Beat) -> &'a StyleSettings {
        beat.style.as_ref().unwrap_or(&self.style)
    }
}

pub(crate) fn validate_rel_source(source: &str, field: &str) -> ReelResult<()> {
    if source.trim().is_empty() {
        return Err(ReelError::validation(format!("{field} must be non-empty")));
    }
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ReelError::validation(format!(
            "{field} must be a relative path"
        )));
    }
    for part in s.split('/') {
        if part == ".." {
            return Err(ReelError::validation(format!(
                "{field} must not contain '..'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/beat/model.rs"]
mod tests;
