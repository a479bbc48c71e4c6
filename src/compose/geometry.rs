//! Pure placement math for A-roll and B-roll content.
//!
//! Every function here is stateless over plain dimensions and rects so the
//! same numbers drive both live preview and offline export. Degenerate
//! inputs (non-positive dimensions) produce an empty rect instead of
//! panicking; callers treat an empty rect as "draw nothing".

use crate::beat::model::OverlaySettings;
use crate::foundation::core::{Canvas, Rect};

/// Source-space crop rect that fills a `dst_w x dst_h` area with no
/// letterboxing ("cover" semantics), with a vertical pan control.
///
/// When the source is relatively wider than the target, the crop keeps full
/// source height and trims the sides equally; pan does not apply because the
/// crop is height-preserving. Otherwise the crop keeps full width and
/// `pan_pct` selects the visible vertical window: `0` starts at the top of
/// the source, `100` at the maximum offset `src_h - cropped_h`, `50` at the
/// midpoint.
pub fn cover_crop_with_pan(src_w: f64, src_h: f64, dst_w: f64, dst_h: f64, pan_pct: f64) -> Rect {
    if src_w <= 0.0 || src_h <= 0.0 || dst_w <= 0.0 || dst_h <= 0.0 {
        return Rect::ZERO;
    }
    let dst_aspect = dst_w / dst_h;
    if src_w / src_h > dst_aspect {
        let crop_w = src_h * dst_aspect;
        let x = (src_w - crop_w) / 2.0;
        Rect::new(x, 0.0, x + crop_w, src_h)
    } else {
        let crop_h = src_w / dst_aspect;
        let y = (src_h - crop_h) * (pan_pct.clamp(0.0, 100.0) / 100.0);
        Rect::new(0.0, y, src_w, y + crop_h)
    }
}

/// Aspect-preserving fit of a `src_w x src_h` source centered inside `area`,
/// leaving blank space on the non-matching axis ("contain" semantics).
pub fn contain_fit(src_w: f64, src_h: f64, area: Rect) -> Rect {
    fit_centered(src_w, src_h, area, f64::min)
}

/// Aspect-preserving fill of `area`, centered, overflowing on the longer
/// axis ("cover" semantics). The overflow is expected to be clipped by the
/// caller.
pub fn cover_fit(src_w: f64, src_h: f64, area: Rect) -> Rect {
    fit_centered(src_w, src_h, area, f64::max)
}

fn fit_centered(src_w: f64, src_h: f64, area: Rect, pick: fn(f64, f64) -> f64) -> Rect {
    if src_w <= 0.0 || src_h <= 0.0 || area.width() <= 0.0 || area.height() <= 0.0 {
        return Rect::ZERO;
    }
    let scale = pick(area.width() / src_w, area.height() / src_h);
    let w = src_w * scale;
    let h = src_h * scale;
    let x = area.x0 + (area.width() - w) / 2.0;
    let y = area.y0 + (area.height() - h) / 2.0;
    Rect::new(x, y, x + w, y + h)
}

/// Placement rect for a B-roll image within its allocated `area`.
///
/// Two-stage: the image is first cover-fit so `scale = 1, x = 0, y = 0`
/// exactly fills the area with the image center visible, then the user's
/// translate (percent of area size) and uniform scale (about the area
/// center) are applied on top of that filled baseline. The returned rect may
/// exceed `area`; the area is always the hard clip boundary when drawing.
pub fn overlay_placement(src_w: f64, src_h: f64, area: Rect, settings: &OverlaySettings) -> Rect {
    let base = cover_fit(src_w, src_h, area);
    if base.is_zero_area() {
        return base;
    }
    let dx = settings.x_pct / 100.0 * area.width();
    let dy = settings.y_pct / 100.0 * area.height();
    let cx = area.x0 + area.width() / 2.0 + dx;
    let cy = area.y0 + area.height() / 2.0 + dy;
    let w = base.width() * settings.scale;
    let h = base.height() * settings.scale;
    Rect::new(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0)
}

/// Top (B-roll) and bottom (A-roll) bands for split mode. Band heights sum
/// exactly to the canvas height.
pub fn split_bands(canvas: Canvas, band_height_pct: f64) -> (Rect, Rect) {
    let full = canvas.rect();
    let split_y = full.height() * (band_height_pct.clamp(20.0, 80.0) / 100.0);
    let top = Rect::new(full.x0, full.y0, full.x1, split_y);
    let bottom = Rect::new(full.x0, split_y, full.x1, full.y1);
    (top, bottom)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/geometry.rs"]
mod tests;
