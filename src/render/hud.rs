//! Foreground playhead.

use crate::direction::palette::PaletteRoles;
use crate::foundation::core::{Point, Rect, clamp_progress};
use crate::render::canvas::{Canvas2d, Paint};

const BAR_HEIGHT: f64 = 3.0;
const MARGIN: f64 = 16.0;

/// Draw the progress track, its filled part and the playhead knob along the bottom edge.
pub fn draw_hud(canvas: &mut dyn Canvas2d, progress: f64, roles: &PaletteRoles) {
    if canvas.is_empty() {
        return;
    }
    let (w, h) = (canvas.width(), canvas.height());
    let x0 = MARGIN.min(w / 4.0);
    let x1 = w - x0;
    let y = h - MARGIN.min(h / 4.0);
    let head = x0 + (x1 - x0) * clamp_progress(progress);

    canvas.save();
    canvas.set_fill(Paint::Solid(roles.text.with_alpha(0.2)));
    canvas.fill_rect(Rect::new(x0, y - BAR_HEIGHT / 2.0, x1, y + BAR_HEIGHT / 2.0));
    if head > x0 {
        canvas.set_fill(Paint::Solid(roles.accent.with_alpha(0.85)));
        canvas.fill_rect(Rect::new(x0, y - BAR_HEIGHT / 2.0, head, y + BAR_HEIGHT / 2.0));
    }
    canvas.set_fill(Paint::Solid(roles.text));
    canvas.fill_circle(Point::new(head, y), BAR_HEIGHT * 1.5);
    canvas.restore();
}

#[cfg(test)]
#[path = "../../tests/unit/render/hud.rs"]
mod tests;
