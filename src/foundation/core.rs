use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Point, Rect, Vec2};

/// Tolerance in seconds for timeline float comparisons.
pub const TIME_EPSILON: f64 = 1e-6;

/// A half-open interval `[start, end)` in seconds on the master timeline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeRange {
    /// Start time in seconds (inclusive).
    pub start: f64,
    /// End time in seconds (exclusive).
    pub end: f64,
}

impl TimeRange {
    /// Build a range, rejecting non-finite or non-increasing endpoints.
    pub fn new(start: f64, end: f64) -> ReelResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ReelError::validation("TimeRange endpoints must be finite"));
        }
        if start >= end {
            return Err(ReelError::validation("TimeRange start must be < end"));
        }
        Ok(Self { start, end })
    }

    /// Re-check the endpoint constraints on a value that may not have come
    /// through [`TimeRange::new`], e.g. one deserialized from JSON.
    pub fn validate(self) -> ReelResult<()> {
        Self::new(self.start, self.end).map(|_| ())
    }

    /// Duration in seconds.
    pub fn duration(self) -> f64 {
        self.end - self.start
    }

    /// Whether `t` falls inside `[start, end)`.
    pub fn contains(self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// Whether `other` starts where `self` ends, within [`TIME_EPSILON`].
    pub fn abuts(self, other: TimeRange) -> bool {
        (self.end - other.start).abs() <= TIME_EPSILON
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The full canvas as a rect at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Width/height ratio; zero when degenerate.
    pub fn aspect(self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }
}

/// Target resolution presets for export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectPreset {
    /// 1080x1920 vertical short-form output.
    #[default]
    Portrait,
    /// 1920x1080 horizontal output.
    Landscape,
    /// 1080x1080 square output.
    Square,
}

impl AspectPreset {
    /// The output canvas for this preset.
    pub fn canvas(self) -> Canvas {
        match self {
            AspectPreset::Portrait => Canvas {
                width: 1080,
                height: 1920,
            },
            AspectPreset::Landscape => Canvas {
                width: 1920,
                height: 1080,
            },
            AspectPreset::Square => Canvas {
                width: 1080,
                height: 1080,
            },
        }
    }
}

/// Straight-alpha RGBA8 frame buffer, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes (`width * height * 4`).
    pub data: Vec<u8>,
}

impl FrameRgba {
    /// Allocate a frame filled with an opaque background color.
    pub fn filled(canvas: Canvas, rgb: [u8; 3]) -> Self {
        let px = canvas.width as usize * canvas.height as usize;
        let mut data = Vec::with_capacity(px * 4);
        for _ in 0..px {
            data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }
}
