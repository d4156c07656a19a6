use super::*;
use crate::render::recording::RecordingCanvas;

#[test]
fn unknown_system_is_fracture() {
    assert_eq!(system_style(None).name, "fracture");
    assert_eq!(system_style(Some("nope")).name, "fracture");
    assert_eq!(system_style(Some(" Orbit ")).layout, LayoutMode::Circular);
    assert_eq!(system_names().count(), 7);
}

#[test]
fn empty_text_or_width_floors_at_minimum() {
    let mut c = RecordingCanvas::new(800.0, 600.0);
    let s = system_style(Some("glass"));
    assert_eq!(compute_fit_font_size(&mut c, "", 800.0, &s), MIN_FONT_PX);
    assert_eq!(compute_fit_font_size(&mut c, "rise", 0.0, &s), MIN_FONT_PX);
    assert_eq!(compute_fit_font_size(&mut c, "rise", f64::NAN, &s), MIN_FONT_PX);
}

#[test]
fn spacing_larger_than_width_floors_at_minimum() {
    let mut c = RecordingCanvas::new(10.0, 10.0);
    let s = system_style(Some("orbit"));
    assert_eq!(compute_fit_font_size(&mut c, "abcdefgh", 10.0, &s), MIN_FONT_PX);
}

#[test]
fn fit_matches_linear_solution() {
    let mut c = RecordingCanvas::new(1000.0, 600.0);
    let s = system_style(Some("paper"));
    // 4 chars at 100 px measure 220 px on the recording canvas.
    let expected = (0.8 * 1000.0 - 4.0 * 0.5) * 100.0 / 220.0;
    let got = compute_fit_font_size(&mut c, "rise", 1000.0, &s);
    assert!((got - expected).abs() < 1e-9, "{got} vs {expected}");
}

#[test]
fn fit_is_monotonic_in_width() {
    let mut c = RecordingCanvas::new(100.0, 100.0);
    for name in system_names() {
        let s = system_style(Some(name));
        let mut prev = 0.0;
        for w in [100.0, 200.0, 400.0, 800.0, 1600.0] {
            let f = compute_fit_font_size(&mut c, "we rise up", w, &s);
            assert!(f >= prev, "{name}: {f} < {prev} at {w}");
            assert!(f >= MIN_FONT_PX);
            prev = f;
        }
    }
}

#[test]
fn fitting_leaves_canvas_state_untouched() {
    let mut c = RecordingCanvas::new(400.0, 400.0);
    c.set_font(FontSpec::new("Inter", 10.0));
    let _ = compute_fit_font_size(&mut c, "hello", 400.0, &system_style(None));
    assert!((c.measure_text("ab") - 11.0).abs() < 1e-9);
}
