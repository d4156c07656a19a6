//! The 2D drawing surface every renderer draws through.
//!
//! Renderers never talk to a raster backend directly; they issue [`Canvas2d`] calls so the same
//! frame can be recorded for inspection ([`crate::RecordingCanvas`]) or rasterized
//! ([`crate::CpuCanvas`]).

use crate::foundation::color::Color;
use crate::foundation::core::{BezPath, Point, Rect};
use smallvec::SmallVec;

/// One color stop of a gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient in `[0, 1]`.
    pub offset: f64,
    /// Color at `offset`.
    pub color: Color,
}

/// Gradient color stops; most gradients here have at most four.
pub type GradientStops = SmallVec<[GradientStop; 4]>;

/// Linear gradient between two points.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    /// Start point (offset 0).
    pub start: Point,
    /// End point (offset 1).
    pub end: Point,
    /// Stops, ascending by offset.
    pub stops: GradientStops,
}

/// Radial gradient from a center outward.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    /// Center (offset 0).
    pub center: Point,
    /// Radius at offset 1.
    pub radius: f64,
    /// Stops, ascending by offset.
    pub stops: GradientStops,
}

/// Fill or stroke source.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// Flat color.
    Solid(Color),
    /// Linear gradient.
    Linear(LinearGradient),
    /// Radial gradient.
    Radial(RadialGradient),
}

impl Default for Paint {
    fn default() -> Self {
        Self::Solid(Color::BLACK)
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Self::Solid(c)
    }
}

impl Paint {
    /// Linear gradient from `(offset, color)` pairs.
    pub fn linear(start: Point, end: Point, stops: &[(f64, Color)]) -> Self {
        Self::Linear(LinearGradient {
            start,
            end,
            stops: to_stops(stops),
        })
    }

    /// Radial gradient from `(offset, color)` pairs.
    pub fn radial(center: Point, radius: f64, stops: &[(f64, Color)]) -> Self {
        Self::Radial(RadialGradient {
            center,
            radius: radius.max(0.0),
            stops: to_stops(stops),
        })
    }

    /// Color of this paint at a point.
    pub fn color_at(&self, p: Point) -> Color {
        match self {
            Self::Solid(c) => *c,
            Self::Linear(g) => {
                let d = g.end - g.start;
                let len2 = d.hypot2();
                let t = if len2 > 0.0 {
                    (p - g.start).dot(d) / len2
                } else {
                    0.0
                };
                sample_stops(&g.stops, t)
            }
            Self::Radial(g) => {
                let t = if g.radius > 0.0 {
                    (p - g.center).hypot() / g.radius
                } else {
                    1.0
                };
                sample_stops(&g.stops, t)
            }
        }
    }

    /// Highest alpha any part of this paint reaches.
    pub fn max_alpha(&self) -> f64 {
        match self {
            Self::Solid(c) => c.a,
            Self::Linear(LinearGradient { stops, .. })
            | Self::Radial(RadialGradient { stops, .. }) => {
                stops.iter().map(|s| s.color.a).fold(0.0, f64::max)
            }
        }
    }
}

fn to_stops(stops: &[(f64, Color)]) -> GradientStops {
    let mut out: GradientStops = stops
        .iter()
        .map(|&(offset, color)| GradientStop {
            offset: if offset.is_finite() {
                offset.clamp(0.0, 1.0)
            } else {
                0.0
            },
            color,
        })
        .collect();
    out.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    out
}

/// Interpolate stops at `t` (clamped to the first and last stop).
pub fn sample_stops(stops: &[GradientStop], t: f64) -> Color {
    let Some(first) = stops.first() else {
        return Color::TRANSPARENT;
    };
    let t = if t.is_finite() { t } else { 0.0 };
    if t <= first.offset {
        return first.color;
    }
    for w in stops.windows(2) {
        let (a, b) = (w[0], w[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let k = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return a.color.mix(b.color, k);
        }
    }
    stops[stops.len() - 1].color
}

/// Horizontal anchor for [`Canvas2d::fill_text`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// `x` is the left edge.
    Left,
    /// `x` is the horizontal center.
    #[default]
    Center,
}

/// Font selection for text calls.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Family name; backends may substitute.
    pub family: String,
    /// Size in px.
    pub size: f64,
    /// CSS-style weight.
    pub weight: u16,
    /// Horizontal anchor.
    pub align: TextAlign,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Inter".to_owned(),
            size: 16.0,
            weight: 400,
            align: TextAlign::Center,
        }
    }
}

impl FontSpec {
    /// Font of a family at a size, default weight and alignment.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            ..Self::default()
        }
    }

    /// Same font with a different weight.
    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    /// Same font with a different size.
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }
}

/// Immediate-mode 2D canvas.
///
/// State (`alpha`, paints, font, clip) is saved and restored as a stack. Calls on an empty
/// canvas are no-ops; implementations never fail.
pub trait Canvas2d {
    /// Width in px.
    fn width(&self) -> f64;
    /// Height in px.
    fn height(&self) -> f64;
    /// Push the current state.
    fn save(&mut self);
    /// Pop to the last saved state (no-op on an empty stack).
    fn restore(&mut self);
    /// Multiply every subsequent draw by `alpha` (clamped to `[0, 1]`).
    fn set_global_alpha(&mut self, alpha: f64);
    /// Paint used by fills and text.
    fn set_fill(&mut self, paint: Paint);
    /// Paint and line width used by strokes.
    fn set_stroke(&mut self, paint: Paint, width: f64);
    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect);
    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: f64);
    /// Fill an arbitrary path (non-zero winding).
    fn fill_path(&mut self, path: &BezPath);
    /// Stroke a path.
    fn stroke_path(&mut self, path: &BezPath);
    /// Intersect the clip with a rectangle until the next `restore`.
    fn clip_rect(&mut self, rect: Rect);
    /// Font used by text calls.
    fn set_font(&mut self, font: FontSpec);
    /// Advance width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f64;
    /// Fill `text` with its baseline at `y`, anchored at `x` per the font's alignment.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    /// Clear to transparent.
    fn clear(&mut self);

    /// Canvas bounds.
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width(), self.height())
    }

    /// True when nothing drawn can be visible.
    fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }
}

/// Pass-through canvas that counts draw calls.
pub struct CountingCanvas<'a> {
    inner: &'a mut dyn Canvas2d,
    draw_calls: u64,
}

impl<'a> CountingCanvas<'a> {
    /// Wrap a canvas.
    pub fn new(inner: &'a mut dyn Canvas2d) -> Self {
        Self {
            inner,
            draw_calls: 0,
        }
    }

    /// Fills, strokes and text calls issued so far.
    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }
}

impl Canvas2d for CountingCanvas<'_> {
    fn width(&self) -> f64 {
        self.inner.width()
    }
    fn height(&self) -> f64 {
        self.inner.height()
    }
    fn save(&mut self) {
        self.inner.save();
    }
    fn restore(&mut self) {
        self.inner.restore();
    }
    fn set_global_alpha(&mut self, alpha: f64) {
        self.inner.set_global_alpha(alpha);
    }
    fn set_fill(&mut self, paint: Paint) {
        self.inner.set_fill(paint);
    }
    fn set_stroke(&mut self, paint: Paint, width: f64) {
        self.inner.set_stroke(paint, width);
    }
    fn fill_rect(&mut self, rect: Rect) {
        self.draw_calls += 1;
        self.inner.fill_rect(rect);
    }
    fn fill_circle(&mut self, center: Point, radius: f64) {
        self.draw_calls += 1;
        self.inner.fill_circle(center, radius);
    }
    fn fill_path(&mut self, path: &BezPath) {
        self.draw_calls += 1;
        self.inner.fill_path(path);
    }
    fn stroke_path(&mut self, path: &BezPath) {
        self.draw_calls += 1;
        self.inner.stroke_path(path);
    }
    fn clip_rect(&mut self, rect: Rect) {
        self.inner.clip_rect(rect);
    }
    fn set_font(&mut self, font: FontSpec) {
        self.inner.set_font(font);
    }
    fn measure_text(&mut self, text: &str) -> f64 {
        self.inner.measure_text(text)
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.draw_calls += 1;
        self.inner.fill_text(text, x, y);
    }
    fn clear(&mut self) {
        self.inner.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
