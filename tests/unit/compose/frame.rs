use super::*;

use std::sync::Arc;

use crate::foundation::core::TimeRange;

fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> FrameRgba {
    FrameRgba::filled(Canvas { width, height }, rgb)
}

fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> PreparedImage {
    let px = (width * height) as usize;
    let mut data = Vec::with_capacity(px * 4);
    for _ in 0..px {
        data.extend_from_slice(&rgba);
    }
    PreparedImage {
        width,
        height,
        rgba8: Arc::new(data),
    }
}

fn pixel(frame: &FrameRgba, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn test_beat(mode: OverlayMode) -> Beat {
    let mut beat = Beat::new(TimeRange::new(0.0, 1.0).unwrap(), "b");
    beat.overlay = mode;
    beat
}

const BG: [u8; 4] = [18, 20, 28, 255];
const RED: [u8; 3] = [200, 0, 0];
const GREEN: [u8; 3] = [0, 180, 0];

#[test]
fn no_beat_contains_the_aroll_with_background_bars() {
    // Square source in a wide canvas: centered, pillar bars on the sides.
    let canvas = Canvas {
        width: 8,
        height: 4,
    };
    let aroll = solid_frame(4, 4, RED);
    let out = compose_frame(canvas, &aroll, None, &OverlayStore::default());

    assert_eq!(pixel(&out, 0, 0), BG);
    assert_eq!(pixel(&out, 7, 3), BG);
    assert_eq!(pixel(&out, 4, 2), [200, 0, 0, 255]);
}

#[test]
fn full_mode_without_an_image_matches_no_beat() {
    let canvas = Canvas {
        width: 8,
        height: 4,
    };
    let aroll = solid_frame(4, 4, RED);
    let beat = test_beat(OverlayMode::Full);

    let plain = compose_frame(canvas, &aroll, None, &OverlayStore::default());
    let with_beat = compose_frame(canvas, &aroll, Some(&beat), &OverlayStore::default());
    assert_eq!(plain.data, with_beat.data);
}

#[test]
fn full_mode_overlay_covers_the_frame_at_default_settings() {
    let canvas = Canvas {
        width: 8,
        height: 8,
    };
    let aroll = solid_frame(4, 4, RED);
    let mut beat = test_beat(OverlayMode::Full);
    beat.select_image("b.png");
    let mut overlays = OverlayStore::default();
    overlays.insert("b.png", solid_image(2, 2, [0, 0, 255, 255]));

    let out = compose_frame(canvas, &aroll, Some(&beat), &overlays);
    // Opaque cover-fit overlay hides the A-roll entirely.
    for (x, y) in [(0, 0), (4, 4), (7, 7)] {
        assert_eq!(pixel(&out, x, y), [0, 0, 255, 255]);
    }
}

#[test]
fn split_mode_draws_aroll_in_the_bottom_band_only() {
    let canvas = Canvas {
        width: 8,
        height: 8,
    };
    let aroll = solid_frame(8, 8, GREEN);
    let beat = test_beat(OverlayMode::Split);

    let out = compose_frame(canvas, &aroll, Some(&beat), &OverlayStore::default());
    // Top band: no image prepared, so background shows.
    assert_eq!(pixel(&out, 4, 1), BG);
    // Bottom band: cover-cropped A-roll.
    assert_eq!(pixel(&out, 4, 6), [0, 180, 0, 255]);
}

#[test]
fn split_mode_clips_the_overlay_to_the_top_band() {
    let canvas = Canvas {
        width: 8,
        height: 8,
    };
    let aroll = solid_frame(8, 8, GREEN);
    let mut beat = test_beat(OverlayMode::Split);
    beat.settings.scale = 3.0;
    beat.select_image("b.png");
    let mut overlays = OverlayStore::default();
    overlays.insert("b.png", solid_image(4, 4, [0, 0, 255, 255]));

    let out = compose_frame(canvas, &aroll, Some(&beat), &overlays);
    // Even scaled far beyond the band, the overlay never bleeds below the
    // band boundary at y = 4.
    assert_eq!(pixel(&out, 4, 1), [0, 0, 255, 255]);
    assert_eq!(pixel(&out, 4, 6), [0, 180, 0, 255]);
}

#[test]
fn blit_blends_straight_alpha_over_the_destination() {
    let canvas = Canvas {
        width: 2,
        height: 2,
    };
    let mut dst = FrameRgba::filled(canvas, [0, 0, 0]);
    let src = solid_image(2, 2, [255, 255, 255, 128]);
    let full = canvas.rect();
    blit(&mut dst, (&src).into(), full, full, full);

    let px = pixel(&dst, 0, 0);
    // 50% white over black lands near mid grey.
    assert!(px[0] >= 127 && px[0] <= 129, "got {px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn blit_outside_the_clip_is_a_no_op() {
    let canvas = Canvas {
        width: 4,
        height: 4,
    };
    let mut dst = FrameRgba::filled(canvas, [1, 2, 3]);
    let before = dst.data.clone();
    let src = solid_image(2, 2, [255, 0, 0, 255]);
    blit(
        &mut dst,
        (&src).into(),
        Rect::new(0.0, 0.0, 2.0, 2.0),
        Rect::new(0.0, 0.0, 2.0, 2.0),
        Rect::new(3.0, 3.0, 3.0, 3.0),
    );
    assert_eq!(dst.data, before);
}
