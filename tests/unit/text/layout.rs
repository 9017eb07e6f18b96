use super::*;
use crate::text::measure::FixedAdvance;

const SENTENCE: &str = "the quick brown fox jumps over the lazy dog again and again";

#[test]
fn wrap_is_greedy() {
    let mut m = FixedAdvance::default();
    // 5px per char at size 10; budget fits 10 chars
    let lines = wrap(&mut m, "aaa bbb ccc ddd", 10.0, 50.0).unwrap();
    assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
}

#[test]
fn long_word_sits_alone_and_is_not_split() {
    let mut m = FixedAdvance::default();
    let lines = wrap(&mut m, "a incomprehensibilities b", 10.0, 40.0).unwrap();
    assert_eq!(lines, vec!["a", "incomprehensibilities", "b"]);
}

#[test]
fn newlines_force_breaks_and_blank_text_is_empty() {
    let mut m = FixedAdvance::default();
    let lines = wrap(&mut m, "one\ntwo three", 10.0, 1000.0).unwrap();
    assert_eq!(lines, vec!["one", "two three"]);
    assert!(wrap(&mut m, "   ", 10.0, 100.0).unwrap().is_empty());
}

#[test]
fn words_survive_wrapping_intact() {
    let mut m = FixedAdvance::default();
    for width in [30.0, 80.0, 150.0, 400.0] {
        let lines = wrap(&mut m, SENTENCE, 10.0, width).unwrap();
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, SENTENCE, "width {width}");
    }
}

#[test]
fn paragraph_picks_largest_fitting_size() {
    let mut m = FixedAdvance::default();
    let (w, h) = (200.0, 90.0);
    let fit = fit_paragraph(&mut m, SENTENCE, 40.0, 8.0, w, h).unwrap();
    assert!(!fit.overflow);
    assert!(fit.height() <= h);

    let bigger = paragraph_at(&mut m, SENTENCE, fit.size + 1.0, w).unwrap();
    assert!(bigger.height() > h, "size {} also fits", fit.size + 1.0);
}

#[test]
fn paragraph_keeps_start_size_when_it_fits() {
    let mut m = FixedAdvance::default();
    let fit = fit_paragraph(&mut m, "short", 30.0, 12.0, 500.0, 500.0).unwrap();
    assert_eq!(fit.size, 30.0);
    assert_eq!(fit.lines, vec!["short"]);
    assert!((fit.spacing - fit.line_height * LINE_SPACING).abs() < 1e-6);
}

#[test]
fn paragraph_overflow_at_floor_is_not_an_error() {
    let mut m = FixedAdvance::default();
    let fit = fit_paragraph(&mut m, SENTENCE, 40.0, 12.0, 60.0, 10.0).unwrap();
    assert_eq!(fit.size, 12.0);
    assert!(fit.overflow);
    assert!(fit.height() > 10.0);
}

#[test]
fn title_shrinks_until_it_fits() {
    let mut m = FixedAdvance::default();
    // 10 chars: width = 5 * size
    let fit = fit_title(&mut m, "abcdefghij", 100.0, 400.0).unwrap();
    assert_eq!(fit.size, 80.0);
    assert_eq!(fit.width, 400.0);
    assert!(!fit.overflow);
}

#[test]
fn title_floors_at_half_base() {
    let mut m = FixedAdvance::default();
    let fit = fit_title(&mut m, "abcdefghij", 100.0, 10.0).unwrap();
    assert_eq!(fit.size, 50.0);
    assert!(fit.overflow);
}

#[test]
fn invalid_boxes_are_rejected() {
    let mut m = FixedAdvance::default();
    assert!(fit_paragraph(&mut m, "x", 10.0, 5.0, 0.0, 10.0).is_err());
    assert!(fit_title(&mut m, "x", 10.0, f32::NAN).is_err());
}
