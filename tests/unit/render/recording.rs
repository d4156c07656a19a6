use super::*;
use crate::foundation::color::Color;

#[test]
fn records_calls_in_order() {
    let mut c = RecordingCanvas::new(200.0, 100.0);
    c.save();
    c.set_global_alpha(2.0);
    c.set_fill(Paint::Solid(Color::WHITE));
    c.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
    c.fill_circle(Point::ZERO, 0.0);
    c.fill_text("", 0.0, 0.0);
    c.restore();
    c.restore();
    assert_eq!(
        c.commands(),
        &[
            DrawCmd::Save,
            DrawCmd::GlobalAlpha(1.0),
            DrawCmd::Fill(Paint::Solid(Color::WHITE)),
            DrawCmd::FillRect(Rect::new(0.0, 0.0, 1.0, 1.0)),
            DrawCmd::Restore,
        ]
    );
    assert_eq!(c.draw_count(), 1);
}

#[test]
fn text_metrics_are_deterministic() {
    let mut c = RecordingCanvas::new(200.0, 100.0);
    c.set_font(FontSpec::new("Inter", 100.0));
    assert!((c.measure_text("rise") - 220.0).abs() < 1e-9);
    c.save();
    c.set_font(FontSpec::new("Inter", 10.0));
    c.restore();
    assert!((c.measure_text("ab") - 110.0).abs() < 1e-9);
}

#[test]
fn take_empties_the_recording() {
    let mut c = RecordingCanvas::new(10.0, 10.0);
    c.fill_text("x", 1.0, 2.0);
    assert_eq!(c.texts().collect::<Vec<_>>(), vec!["x"]);
    assert_eq!(c.take().len(), 1);
    assert!(c.commands().is_empty());
    let mut empty = RecordingCanvas::new(f64::NAN, -3.0);
    assert!(Canvas2d::is_empty(&empty));
    empty.resize(5.0, 5.0);
    assert!(!Canvas2d::is_empty(&empty));
}
