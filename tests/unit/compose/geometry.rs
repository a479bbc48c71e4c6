use super::*;

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-6, "expected {b}, got {a}");
}

#[test]
fn cover_crop_pans_vertically_when_width_limited() {
    // 1920x1080 source into a 1080x600 band: full width kept, the crop
    // window slides over src_h - crop_h = 1080 - 1066.666 px of slack.
    let crop_h = 1920.0 / (1080.0 / 600.0);
    let slack = 1080.0 - crop_h;

    let top = cover_crop_with_pan(1920.0, 1080.0, 1080.0, 600.0, 0.0);
    assert_close(top.y0, 0.0);
    assert_close(top.height(), crop_h);
    assert_close(top.width(), 1920.0);

    let mid = cover_crop_with_pan(1920.0, 1080.0, 1080.0, 600.0, 50.0);
    assert_close(mid.y0, slack / 2.0);

    let bottom = cover_crop_with_pan(1920.0, 1080.0, 1080.0, 600.0, 100.0);
    assert_close(bottom.y1, 1080.0);
}

#[test]
fn cover_crop_trims_sides_when_height_limited() {
    // A very wide source keeps full height; pan has nothing to do.
    let a = cover_crop_with_pan(4000.0, 1000.0, 1000.0, 1000.0, 0.0);
    let b = cover_crop_with_pan(4000.0, 1000.0, 1000.0, 1000.0, 100.0);
    assert_eq!(a, b);
    assert_close(a.height(), 1000.0);
    assert_close(a.width(), 1000.0);
    assert_close(a.x0, 1500.0);
}

#[test]
fn cover_crop_pan_is_clamped() {
    let over = cover_crop_with_pan(1920.0, 1080.0, 1080.0, 600.0, 250.0);
    let max = cover_crop_with_pan(1920.0, 1080.0, 1080.0, 600.0, 100.0);
    assert_eq!(over, max);
}

#[test]
fn contain_fit_letterboxes_and_centers() {
    let area = Rect::new(0.0, 0.0, 1080.0, 1920.0);
    let dst = contain_fit(1920.0, 1080.0, area);
    assert_close(dst.width(), 1080.0);
    assert_close(dst.height(), 1080.0 * 1080.0 / 1920.0);
    assert_close(dst.x0, 0.0);
    assert_close((area.height() - dst.height()) / 2.0, dst.y0);
}

#[test]
fn cover_fit_fills_the_area_on_both_axes() {
    let area = Rect::new(100.0, 200.0, 1180.0, 2120.0);
    let dst = cover_fit(1920.0, 1080.0, area);
    assert!(dst.width() >= area.width() - 1e-6);
    assert!(dst.height() >= area.height() - 1e-6);
    assert_close(dst.height(), area.height());
    // Centered: overflow is symmetric.
    assert_close(area.x0 - dst.x0, dst.x1 - area.x1);
}

#[test]
fn overlay_baseline_exactly_fills_a_matching_area() {
    let area = Rect::new(0.0, 0.0, 1080.0, 1080.0);
    let placement = overlay_placement(512.0, 512.0, area, &OverlaySettings::default());
    assert_close(placement.x0, 0.0);
    assert_close(placement.y0, 0.0);
    assert_close(placement.x1, 1080.0);
    assert_close(placement.y1, 1080.0);
}

#[test]
fn overlay_translate_is_a_percentage_of_the_area() {
    let area = Rect::new(0.0, 0.0, 1000.0, 500.0);
    let settings = OverlaySettings {
        x_pct: 25.0,
        y_pct: -10.0,
        ..OverlaySettings::default()
    };
    let base = overlay_placement(500.0, 250.0, area, &OverlaySettings::default());
    let moved = overlay_placement(500.0, 250.0, area, &settings);
    assert_close(moved.x0 - base.x0, 250.0);
    assert_close(moved.y0 - base.y0, -50.0);
    assert_close(moved.width(), base.width());
}

#[test]
fn overlay_scale_grows_about_the_shifted_center() {
    let area = Rect::new(0.0, 0.0, 1000.0, 1000.0);
    let settings = OverlaySettings {
        scale: 2.0,
        ..OverlaySettings::default()
    };
    let placement = overlay_placement(500.0, 500.0, area, &settings);
    assert_close(placement.width(), 2000.0);
    assert_close((placement.x0 + placement.x1) / 2.0, 500.0);
    assert_close((placement.y0 + placement.y1) / 2.0, 500.0);
}

#[test]
fn split_bands_partition_the_canvas_exactly() {
    let canvas = Canvas {
        width: 1080,
        height: 1920,
    };
    let (top, bottom) = split_bands(canvas, 40.0);
    assert_close(top.height(), 1920.0 * 0.4);
    assert_close(top.height() + bottom.height(), 1920.0);
    assert_close(top.y1, bottom.y0);
    assert_close(bottom.y1, 1920.0);
}

#[test]
fn split_band_height_is_clamped_to_its_range() {
    let canvas = Canvas {
        width: 1080,
        height: 1000,
    };
    let (low, _) = split_bands(canvas, 5.0);
    assert_close(low.height(), 200.0);
    let (high, _) = split_bands(canvas, 95.0);
    assert_close(high.height(), 800.0);
}

#[test]
fn degenerate_inputs_produce_empty_rects() {
    assert!(cover_crop_with_pan(0.0, 100.0, 50.0, 50.0, 50.0).is_zero_area());
    assert!(contain_fit(100.0, 100.0, Rect::ZERO).is_zero_area());
    assert!(cover_fit(-1.0, 100.0, Rect::new(0.0, 0.0, 10.0, 10.0)).is_zero_area());
    assert!(
        overlay_placement(0.0, 0.0, Rect::new(0.0, 0.0, 10.0, 10.0), &OverlaySettings::default())
            .is_zero_area()
    );
}
