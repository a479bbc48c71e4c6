//! CPU compositing of one output frame.
//!
//! [`compose_frame`] is the single draw routine used by both live preview
//! and offline export, so the two can never disagree about placement. All
//! geometry comes from [`crate::compose::geometry`]; this module only
//! rasterizes: bilinear-sampled scaled blits with source-over straight-alpha
//! blending and hard rect clipping.

use crate::{
    assets::store::{OverlayStore, PreparedImage},
    beat::model::{Beat, OverlayMode},
    compose::geometry::{contain_fit, cover_crop_with_pan, overlay_placement, split_bands},
    foundation::core::{Canvas, FrameRgba, Rect},
};

/// Background color flooded behind all content.
pub const BACKGROUND_RGB: [u8; 3] = [18, 20, 28];

/// Composite one output frame.
///
/// `beat` is the active enabled beat for the current timestamp, or `None`
/// when no overlay applies (no beat, or the containing beat is disabled);
/// in that case the A-roll is contain-fit full frame. A beat whose image is
/// missing from `overlays` renders its band/area as background fill.
pub fn compose_frame(
    canvas: Canvas,
    aroll: &FrameRgba,
    beat: Option<&Beat>,
    overlays: &OverlayStore,
) -> FrameRgba {
    let mut out = FrameRgba::filled(canvas, BACKGROUND_RGB);
    let full = canvas.rect();
    let (src_w, src_h) = (f64::from(aroll.width), f64::from(aroll.height));
    let src_rect = Rect::new(0.0, 0.0, src_w, src_h);

    match beat {
        None => {
            let dst = contain_fit(src_w, src_h, full);
            blit(&mut out, aroll.into(), src_rect, dst, full);
        }
        Some(beat) if beat.overlay == OverlayMode::Full => {
            let dst = contain_fit(src_w, src_h, full);
            blit(&mut out, aroll.into(), src_rect, dst, full);
            if let Some(img) = lookup(beat, overlays) {
                let placement =
                    overlay_placement(f64::from(img.width), f64::from(img.height), full, &beat.settings);
                blit(&mut out, img.into(), image_rect(img), placement, full);
            }
        }
        Some(beat) => {
            let (top, bottom) = split_bands(canvas, beat.settings.band_height_pct);
            let crop = cover_crop_with_pan(
                src_w,
                src_h,
                bottom.width(),
                bottom.height(),
                beat.settings.aroll_pan_pct,
            );
            blit(&mut out, aroll.into(), crop, bottom, bottom);
            if let Some(img) = lookup(beat, overlays) {
                let placement =
                    overlay_placement(f64::from(img.width), f64::from(img.height), top, &beat.settings);
                blit(&mut out, img.into(), image_rect(img), placement, top);
            }
        }
    }
    out
}

fn lookup<'a>(beat: &Beat, overlays: &'a OverlayStore) -> Option<&'a PreparedImage> {
    overlays.get(beat.broll_image.as_deref()?)
}

fn image_rect(img: &PreparedImage) -> Rect {
    Rect::new(0.0, 0.0, f64::from(img.width), f64::from(img.height))
}

/// Borrowed view over an RGBA8 pixel buffer used as a blit source.
#[derive(Clone, Copy)]
pub struct PixelsRgba<'a> {
    /// Pixel bytes, `width * height * 4`.
    pub data: &'a [u8],
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl<'a> From<&'a FrameRgba> for PixelsRgba<'a> {
    fn from(f: &'a FrameRgba) -> Self {
        Self {
            data: &f.data,
            width: f.width,
            height: f.height,
        }
    }
}

impl<'a> From<&'a PreparedImage> for PixelsRgba<'a> {
    fn from(i: &'a PreparedImage) -> Self {
        Self {
            data: i.rgba8.as_slice(),
            width: i.width,
            height: i.height,
        }
    }
}

/// Stretch `src_rect` (source pixel space) onto `dst_rect` (destination
/// pixel space), clipped to `clip` and the destination bounds, blending
/// source-over with straight alpha.
pub fn blit(dst: &mut FrameRgba, src: PixelsRgba<'_>, src_rect: Rect, dst_rect: Rect, clip: Rect) {
    if src_rect.is_zero_area() || dst_rect.is_zero_area() || src.width == 0 || src.height == 0 {
        return;
    }
    let bounds = Rect::new(0.0, 0.0, f64::from(dst.width), f64::from(dst.height));
    let visible = dst_rect.intersect(clip).intersect(bounds);
    if visible.is_zero_area() {
        return;
    }

    let x_lo = visible.x0.floor().max(0.0) as usize;
    let x_hi = (visible.x1.ceil() as usize).min(dst.width as usize);
    let y_lo = visible.y0.floor().max(0.0) as usize;
    let y_hi = (visible.y1.ceil() as usize).min(dst.height as usize);

    for py in y_lo..y_hi {
        let cy = py as f64 + 0.5;
        if cy < visible.y0 || cy >= visible.y1 {
            continue;
        }
        let v = (cy - dst_rect.y0) / dst_rect.height();
        let sy = src_rect.y0 + v * src_rect.height();
        for px in x_lo..x_hi {
            let cx = px as f64 + 0.5;
            if cx < visible.x0 || cx >= visible.x1 {
                continue;
            }
            let u = (cx - dst_rect.x0) / dst_rect.width();
            let sx = src_rect.x0 + u * src_rect.width();
            let rgba = sample_bilinear(src, sx, sy);
            let idx = (py * dst.width as usize + px) * 4;
            blend_over(&mut dst.data[idx..idx + 4], rgba);
        }
    }
}

/// Bilinear sample at continuous source coordinates, clamped to the image.
fn sample_bilinear(src: PixelsRgba<'_>, sx: f64, sy: f64) -> [u8; 4] {
    let max_x = (src.width - 1) as f64;
    let max_y = (src.height - 1) as f64;
    let fx = (sx - 0.5).clamp(0.0, max_x);
    let fy = (sy - 0.5).clamp(0.0, max_y);
    let x0 = fx.floor() as usize;
    let y0 = fy.floor() as usize;
    let x1 = (x0 + 1).min(max_x as usize);
    let y1 = (y0 + 1).min(max_y as usize);
    let tx = fx - x0 as f64;
    let ty = fy - y0 as f64;

    let px = |x: usize, y: usize| -> [f64; 4] {
        let i = (y * src.width as usize + x) * 4;
        [
            f64::from(src.data[i]),
            f64::from(src.data[i + 1]),
            f64::from(src.data[i + 2]),
            f64::from(src.data[i + 3]),
        ]
    };
    let (p00, p10, p01, p11) = (px(x0, y0), px(x1, y0), px(x0, y1), px(x1, y1));

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] + (p10[c] - p00[c]) * tx;
        let bot = p01[c] + (p11[c] - p01[c]) * tx;
        out[c] = (top + (bot - top) * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Source-over blend of a straight-alpha RGBA8 pixel onto `dst`.
fn blend_over(dst: &mut [u8], src: [u8; 4]) {
    let sa = u16::from(src[3]);
    if sa == 255 {
        dst.copy_from_slice(&src);
        return;
    }
    if sa == 0 {
        return;
    }
    let inv = 255 - sa;
    for c in 0..3 {
        let s = u16::from(src[c]);
        let d = u16::from(dst[c]);
        dst[c] = (((s * sa) + (d * inv) + 127) / 255) as u8;
    }
    let da = u16::from(dst[3]);
    dst[3] = (sa + ((da * inv) + 127) / 255).min(255) as u8;
}

#[cfg(test)]
#[path = "../../tests/unit/compose/frame.rs"]
mod tests;
