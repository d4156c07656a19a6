use super::*;
use crate::render::recording::RecordingCanvas;

#[test]
fn linear_gradient_samples_endpoints_and_middle() {
    let p = Paint::linear(
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        &[(0.0, Color::BLACK), (1.0, Color::WHITE)],
    );
    assert_eq!(p.color_at(Point::new(-5.0, 0.0)), Color::BLACK);
    assert_eq!(p.color_at(Point::new(20.0, 3.0)), Color::WHITE);
    let mid = p.color_at(Point::new(5.0, 0.0));
    assert!((mid.r - 0.5).abs() < 1e-9);
}

#[test]
fn radial_gradient_and_max_alpha() {
    let p = Paint::radial(
        Point::new(0.0, 0.0),
        10.0,
        &[(1.0, Color::WHITE.with_alpha(0.0)), (0.0, Color::WHITE.with_alpha(0.7))],
    );
    assert!((p.color_at(Point::ZERO).a - 0.7).abs() < 1e-9);
    assert_eq!(p.color_at(Point::new(10.0, 0.0)).a, 0.0);
    assert!((p.max_alpha() - 0.7).abs() < 1e-9);
    assert_eq!(sample_stops(&[], 0.5), Color::TRANSPARENT);
}

#[test]
fn counting_canvas_counts_draws_only() {
    let mut rec = RecordingCanvas::new(100.0, 50.0);
    let mut c = CountingCanvas::new(&mut rec);
    c.save();
    c.set_fill(Color::WHITE.into());
    c.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
    c.fill_circle(Point::new(5.0, 5.0), 2.0);
    c.fill_text("hi", 5.0, 5.0);
    c.restore();
    assert_eq!(c.draw_calls(), 3);
    assert_eq!(c.bounds(), Rect::new(0.0, 0.0, 100.0, 50.0));
    assert!(!c.is_empty());
}
