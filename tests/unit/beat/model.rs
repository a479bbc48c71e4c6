use super::*;

fn beat(start: f64, end: f64, text: &str) -> Beat {
    Beat::new(TimeRange::new(start, end).unwrap(), text)
}

fn three_beat_timeline() -> Timeline {
    Timeline::new(
        vec![beat(0.0, 2.0, "a"), beat(2.0, 5.0, "b"), beat(5.0, 10.0, "c")],
        10.0,
    )
    .unwrap()
}

#[test]
fn construction_sorts_beats_by_start() {
    let tl = Timeline::new(
        vec![beat(5.0, 10.0, "c"), beat(0.0, 2.0, "a"), beat(2.0, 5.0, "b")],
        10.0,
    )
    .unwrap();
    let texts: Vec<&str> = tl.beats.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
}

#[test]
fn validation_rejects_partition_violations() {
    // Gap between beats.
    assert!(Timeline::new(vec![beat(0.0, 2.0, "a"), beat(3.0, 10.0, "b")], 10.0).is_err());
    // Overlapping beats.
    assert!(Timeline::new(vec![beat(0.0, 5.0, "a"), beat(4.0, 10.0, "b")], 10.0).is_err());
    // First beat not at zero.
    assert!(Timeline::new(vec![beat(1.0, 10.0, "a")], 10.0).is_err());
    // Last beat not at the duration.
    assert!(Timeline::new(vec![beat(0.0, 9.0, "a")], 10.0).is_err());
    // No beats at all.
    assert!(Timeline::new(vec![], 10.0).is_err());
    // Degenerate duration.
    assert!(Timeline::new(vec![beat(0.0, 1.0, "a")], 0.0).is_err());
}

#[test]
fn validation_rejects_deserialized_inverted_ranges() {
    // Serde fills ranges without going through TimeRange::new, so an
    // inverted range can slip in through project JSON. The seam checks
    // alone pass here: 5.0 abuts 5.0, and the "last" beat ends at the
    // declared duration.
    let json = r#"{
        "timeline": {
            "beats": [
                { "id": "5f0c9cdd-2ce1-4f3a-9d1a-0a4f3bdbda60",
                  "range": { "start": 0.0, "end": 5.0 },
                  "text": "a" },
                { "id": "9a1f64a2-7a51-49a5-8a34-c0de8d6a2a11",
                  "range": { "start": 5.0, "end": 2.0 },
                  "text": "b" }
            ],
            "duration_sec": 2.0
        }
    }"#;
    let project: Project = serde_json::from_str(json).unwrap();
    assert!(matches!(
        project.validate(),
        Err(ReelError::Validation(_))
    ));
}

#[test]
fn validation_rejects_non_finite_ranges() {
    let mut tl = three_beat_timeline();
    tl.beats[1].range = TimeRange {
        start: f64::NAN,
        end: 5.0,
    };
    assert!(tl.validate().is_err());

    let mut tl = three_beat_timeline();
    tl.beats[2].range = TimeRange {
        start: 5.0,
        end: f64::INFINITY,
    };
    assert!(tl.validate().is_err());
}

#[test]
fn validation_tolerates_epsilon_seams() {
    let tl = Timeline::new(
        vec![beat(0.0, 2.0, "a"), beat(2.0 + TIME_EPSILON / 2.0, 10.0, "b")],
        10.0,
    );
    assert!(tl.is_ok());
}

#[test]
fn beat_at_resolves_boundaries_to_the_later_beat() {
    let tl = three_beat_timeline();
    assert_eq!(tl.beat_at(0.0).unwrap().text, "a");
    assert_eq!(tl.beat_at(1.999).unwrap().text, "a");
    assert_eq!(tl.beat_at(2.0).unwrap().text, "b");
    assert_eq!(tl.beat_at(5.0).unwrap().text, "c");
    assert_eq!(tl.beat_at(9.999).unwrap().text, "c");
    assert!(tl.beat_at(10.0).is_none());
    assert!(tl.beat_at(-0.001).is_none());
}

#[test]
fn active_beat_skips_disabled_beats() {
    let mut tl = three_beat_timeline();
    let id = tl.beats[1].id;
    tl.beat_mut(id).unwrap().enabled = false;

    assert!(tl.beat_at(3.0).is_some());
    assert!(tl.active_beat_at(3.0).is_none());
    assert_eq!(tl.active_beat_at(0.5).unwrap().text, "a");
}

#[test]
fn select_image_appends_to_gallery_once() {
    let mut b = beat(0.0, 1.0, "x");
    b.select_image("img/a.png");
    b.select_image("img/b.png");
    b.select_image("img/a.png");

    assert_eq!(b.broll_image.as_deref(), Some("img/a.png"));
    assert_eq!(b.broll_options, vec!["img/a.png", "img/b.png"]);
}

#[test]
fn referenced_images_are_unique_and_skip_disabled() {
    let mut tl = three_beat_timeline();
    let ids: Vec<BeatId> = tl.beats.iter().map(|b| b.id).collect();
    tl.beat_mut(ids[0]).unwrap().select_image("a.png");
    tl.beat_mut(ids[1]).unwrap().select_image("a.png");
    tl.beat_mut(ids[2]).unwrap().select_image("b.png");
    tl.beat_mut(ids[2]).unwrap().enabled = false;

    assert_eq!(tl.referenced_images(), vec!["a.png"]);
}

#[test]
fn overlay_settings_ranges_are_enforced() {
    assert!(OverlaySettings::default().validate().is_ok());

    let mut s = OverlaySettings::default();
    s.x_pct = 51.0;
    assert!(s.validate().is_err());

    let mut s = OverlaySettings::default();
    s.scale = 0.4;
    assert!(s.validate().is_err());

    let mut s = OverlaySettings::default();
    s.band_height_pct = 81.0;
    assert!(s.validate().is_err());

    let mut s = OverlaySettings::default();
    s.aroll_pan_pct = f64::NAN;
    assert!(s.validate().is_err());
}

#[test]
fn source_paths_must_be_relative_and_contained() {
    assert!(validate_rel_source("img/a.png", "f").is_ok());
    assert!(validate_rel_source("", "f").is_err());
    assert!(validate_rel_source("   ", "f").is_err());
    assert!(validate_rel_source("/etc/passwd", "f").is_err());
    assert!(validate_rel_source("../secret.png", "f").is_err());
    assert!(validate_rel_source("img\\..\\secret.png", "f").is_err());
}

#[test]
fn project_json_defaults_fill_missing_fields() {
    let json = r#"{
        "timeline": {
            "beats": [
                { "id": "5f0c9cdd-2ce1-4f3a-9d1a-0a4f3bdbda60",
                  "range": { "start": 0.0, "end": 4.0 },
                  "text": "hello there" }
            ],
            "duration_sec": 4.0
        }
    }"#;
    let project: Project = serde_json::from_str(json).unwrap();
    project.validate().unwrap();

    let b = &project.timeline.beats[0];
    assert!(b.enabled);
    assert_eq!(b.overlay, OverlayMode::Full);
    assert_eq!(b.settings, OverlaySettings::default());
    assert!(b.broll_image.is_none());
    assert_eq!(project.style.image_count, 1);
}

#[test]
fn style_override_wins_over_project_default() {
    let mut tl = three_beat_timeline();
    let id = tl.beats[0].id;
    tl.beat_mut(id).unwrap().style = Some(StyleSettings {
        theme_prompt: "noir".into(),
        ..StyleSettings::default()
    });
    let project = Project {
        timeline: tl,
        style: StyleSettings {
            theme_prompt: "pastel".into(),
            ..StyleSettings::default()
        },
        source_video: None,
    };

    assert_eq!(
        project.style_for(&project.timeline.beats[0]).theme_prompt,
        "noir"
    );
    assert_eq!(
        project.style_for(&project.timeline.beats[1]).theme_prompt,
        "pastel"
    );
}
