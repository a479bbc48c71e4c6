use super::*;

use crate::beat::model::OverlayMode;

fn segment(text: &str) -> AnalyzedSegment {
    AnalyzedSegment {
        text: text.into(),
        visual_prompt: format!("visual of {text}"),
        overlay: OverlayMode::Full,
    }
}

fn timed(text: &str, start_sec: f64, end_sec: f64) -> TimedSegment {
    TimedSegment {
        segment: segment(text),
        start_sec,
        end_sec,
    }
}

#[test]
fn heuristic_scales_with_word_count_above_a_floor() {
    // 0.4s per word, floored at 2 seconds.
    assert_eq!(heuristic_duration_sec(""), 2.0);
    assert_eq!(heuristic_duration_sec("one two three"), 2.0);
    assert_eq!(
        heuristic_duration_sec("one two three four five six seven eight nine ten"),
        4.0
    );
}

#[test]
fn script_segments_lay_out_back_to_back_from_zero() {
    let segments = vec![
        segment("one two three four five"),
        segment("six seven eight nine ten eleven twelve"),
    ];
    let tl = beats_from_script_segments(&segments).unwrap();
    tl.validate().unwrap();

    assert_eq!(tl.beats.len(), 2);
    assert_eq!(tl.beats[0].range.start, 0.0);
    assert!((tl.beats[0].range.end - 2.0).abs() < 1e-9);
    assert!((tl.beats[1].range.end - 4.8).abs() < 1e-9);
    assert!((tl.duration_sec - 4.8).abs() < 1e-9);
    assert_eq!(tl.beats[0].visual_prompt, "visual of one two three four five");
    assert_eq!(tl.beats[0].overlay, OverlayMode::Full);
}

#[test]
fn script_analysis_with_no_segments_is_an_error() {
    assert!(beats_from_script_segments(&[]).is_err());
}

#[test]
fn timed_segments_are_sorted_and_snapped_contiguous() {
    // Out of order, with a leading gap and a seam gap.
    let segments = vec![timed("second", 1.1, 2.9), timed("first", 0.2, 1.0)];
    let tl = beats_from_timed_segments(&segments).unwrap();
    tl.validate().unwrap();

    assert_eq!(tl.beats.len(), 2);
    assert_eq!(tl.beats[0].text, "first");
    assert_eq!(tl.beats[0].range.start, 0.0);
    assert_eq!(tl.beats[0].range.end, 1.0);
    assert_eq!(tl.beats[1].range.start, 1.0);
    assert_eq!(tl.beats[1].range.end, 2.9);
    assert_eq!(tl.duration_sec, 2.9);
}

#[test]
fn timed_segment_swallowed_by_snapping_is_rejected() {
    // The second segment ends before the first does; snapping its start to
    // 5.0 leaves it with nothing.
    let segments = vec![timed("long", 0.0, 5.0), timed("swallowed", 1.0, 4.0)];
    assert!(beats_from_timed_segments(&segments).is_err());
}

#[test]
fn timed_analysis_with_no_segments_is_an_error() {
    assert!(beats_from_timed_segments(&[]).is_err());
}
