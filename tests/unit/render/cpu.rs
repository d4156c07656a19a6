use super::*;

fn pixel(data: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
    let i = (y * width + x) * 4;
    [data[i], data[i + 1], data[i + 2], data[i + 3]]
}

#[test]
fn rejects_degenerate_sizes() {
    assert!(CpuCanvas::new(0, 10).is_err());
    assert!(CpuCanvas::new(10, 70_000).is_err());
    assert!(CpuCanvas::with_font(4, 4, vec![1, 2, 3]).is_err());
}

#[test]
fn solid_rect_fills_pixels() {
    let mut c = CpuCanvas::new(4, 4).unwrap();
    c.set_fill(Paint::Solid(Color::rgb(1.0, 0.0, 0.0)));
    c.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
    let data = c.render_to_rgba8();
    assert_eq!(data.len(), 4 * 4 * 4);
    assert_eq!(pixel(&data, 4, 1, 1), [255, 0, 0, 255]);
}

#[test]
fn clip_and_alpha_are_scoped_by_save() {
    let mut c = CpuCanvas::new(4, 4).unwrap();
    c.save();
    c.clip_rect(Rect::new(0.0, 0.0, 2.0, 4.0));
    c.set_global_alpha(0.0);
    c.restore();
    c.save();
    c.clip_rect(Rect::new(0.0, 0.0, 2.0, 4.0));
    c.set_fill(Paint::Solid(Color::WHITE));
    c.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
    c.restore();
    let data = c.render_to_rgba8();
    assert_eq!(pixel(&data, 4, 0, 0)[3], 255);
    assert_eq!(pixel(&data, 4, 3, 0)[3], 0);
}

#[test]
fn gradient_fill_is_baked() {
    let mut c = CpuCanvas::new(8, 2).unwrap();
    c.set_fill(Paint::linear(
        Point::new(0.0, 0.0),
        Point::new(8.0, 0.0),
        &[(0.0, Color::BLACK), (1.0, Color::WHITE)],
    ));
    c.fill_rect(Rect::new(0.0, 0.0, 8.0, 2.0));
    let data = c.render_to_rgba8();
    let left = pixel(&data, 8, 0, 0);
    let right = pixel(&data, 8, 7, 0);
    assert!(left[3] > 200 && right[3] > 200);
    assert!(right[0] > left[0]);
}

#[test]
fn text_without_font_is_a_noop() {
    let mut c = CpuCanvas::new(16, 16).unwrap();
    assert!(!c.has_font());
    c.set_font(FontSpec::new("Inter", 10.0));
    assert!((c.measure_text("ab") - 11.0).abs() < 1e-9);
    c.set_fill(Paint::Solid(Color::WHITE));
    c.fill_text("ab", 8.0, 8.0);
    let data = c.render_to_rgba8();
    assert!(data.iter().all(|&b| b == 0));
}
