use std::sync::Arc;

use kurbo::{PathEl, Shape};

use crate::foundation::color::Color;
use crate::foundation::core::{BezPath, Point, Rect};
use crate::foundation::error::{LyricDanceError, LyricDanceResult};
use crate::render::canvas::{Canvas2d, FontSpec, Paint, TextAlign};

const CHAR_ADVANCE_EM: f64 = 0.55;
const CIRCLE_TOLERANCE: f64 = 0.1;

#[derive(Clone, Debug)]
struct DrawState {
    alpha: f64,
    fill: Paint,
    stroke: Paint,
    stroke_width: f64,
    font: FontSpec,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            fill: Paint::Solid(Color::BLACK),
            stroke: Paint::Solid(Color::BLACK),
            stroke_width: 1.0,
            font: FontSpec::default(),
        }
    }
}

/// Parley shaping state for the single caller-supplied font.
struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<[u8; 4]>,
    family: String,
    font: vello_cpu::peniko::FontData,
}

impl TextShaper {
    fn from_bytes(font_bytes: Vec<u8>) -> LyricDanceResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| {
                LyricDanceError::validation("no font families registered from font bytes")
            })?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LyricDanceError::validation("registered font family has no name"))?
            .to_string();
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font,
        })
    }

    fn layout(&mut self, text: &str, size_px: f32) -> parley::Layout<[u8; 4]> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        let mut layout: parley::Layout<[u8; 4]> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

/// Raster canvas on `vello_cpu`.
///
/// Gradients are baked into images covering the drawn shape's bounds. Text needs font bytes
/// ([`CpuCanvas::with_font`]); without them `fill_text` is a no-op and `measure_text` falls
/// back to an advance estimate.
pub struct CpuCanvas {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    text: Option<TextShaper>,
    state: DrawState,
    stack: Vec<(DrawState, usize)>,
    open_layers: usize,
}

impl CpuCanvas {
    /// Transparent canvas. Both sides must be in `1..=65535`.
    pub fn new(width: u32, height: u32) -> LyricDanceResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| LyricDanceError::validation("canvas width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| LyricDanceError::validation("canvas height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(LyricDanceError::validation("canvas width/height must be > 0"));
        }
        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
            text: None,
            state: DrawState::default(),
            stack: Vec::new(),
            open_layers: 0,
        })
    }

    /// Same as [`CpuCanvas::new`], with text shaped from `font_bytes` (TTF/OTF).
    pub fn with_font(width: u32, height: u32, font_bytes: Vec<u8>) -> LyricDanceResult<Self> {
        let mut canvas = Self::new(width, height)?;
        canvas.text = Some(TextShaper::from_bytes(font_bytes)?);
        Ok(canvas)
    }

    /// True when text can be drawn.
    pub fn has_font(&self) -> bool {
        self.text.is_some()
    }

    /// Rasterize everything drawn so far into premultiplied RGBA8.
    ///
    /// Open clip layers are closed first, so call this once per frame after drawing.
    pub fn render_to_rgba8(&mut self) -> Vec<u8> {
        while self.open_layers > 0 {
            self.ctx.pop_layer();
            self.open_layers -= 1;
        }
        self.stack.clear();
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);
        pixmap.data_as_u8_slice().to_vec()
    }

    fn reset_transforms(&mut self) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    /// Install `paint` for a shape covering `bounds`. Returns `false` when nothing would show.
    fn apply_paint(&mut self, paint: &Paint, bounds: Rect) -> bool {
        let alpha = self.state.alpha;
        if alpha <= 0.0 {
            return false;
        }
        self.reset_transforms();
        match paint {
            Paint::Solid(c) => {
                let [r, g, b, a] = c.fade(alpha).to_rgba8();
                if a == 0 {
                    return false;
                }
                self.ctx
                    .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                true
            }
            gradient => {
                let Some((image, origin)) = self.bake_gradient(gradient, bounds, alpha) else {
                    return false;
                };
                self.ctx
                    .set_paint_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
                self.ctx.set_paint(image);
                true
            }
        }
    }

    fn bake_gradient(
        &self,
        paint: &Paint,
        bounds: Rect,
        alpha: f64,
    ) -> Option<(vello_cpu::Image, Point)> {
        let clipped = bounds.intersect(Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
        let x0 = clipped.x0.floor().max(0.0);
        let y0 = clipped.y0.floor().max(0.0);
        let w = (clipped.x1.ceil() - x0).max(0.0) as u16;
        let h = (clipped.y1.ceil() - y0).max(0.0) as u16;
        if w == 0 || h == 0 {
            return None;
        }

        let mut pixels = Vec::with_capacity(usize::from(w) * usize::from(h));
        for py in 0..h {
            for px in 0..w {
                let p = Point::new(x0 + f64::from(px) + 0.5, y0 + f64::from(py) + 0.5);
                let c = paint.color_at(p).fade(alpha).to_rgba8_premul();
                pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                    r: c.r,
                    g: c.g,
                    b: c.b,
                    a: c.a,
                });
            }
        }
        let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
        Some((
            vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            Point::new(x0, y0),
        ))
    }

    fn fill_bez(&mut self, path: &BezPath) {
        let paint = self.state.fill.clone();
        if self.apply_paint(&paint, path.bounding_box()) {
            self.ctx.fill_path(&bezpath_to_cpu(path));
        }
    }
}

impl Canvas2d for CpuCanvas {
    fn width(&self) -> f64 {
        f64::from(self.width)
    }

    fn height(&self) -> f64 {
        f64::from(self.height)
    }

    fn save(&mut self) {
        self.stack.push((self.state.clone(), self.open_layers));
    }

    fn restore(&mut self) {
        let Some((state, layers)) = self.stack.pop() else {
            return;
        };
        while self.open_layers > layers {
            self.ctx.pop_layer();
            self.open_layers -= 1;
        }
        self.state = state;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    fn set_fill(&mut self, paint: Paint) {
        self.state.fill = paint;
    }

    fn set_stroke(&mut self, paint: Paint, width: f64) {
        self.state.stroke = paint;
        self.state.stroke_width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    }

    fn fill_rect(&mut self, rect: Rect) {
        let paint = self.state.fill.clone();
        if self.apply_paint(&paint, rect) {
            self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                rect.x0, rect.y0, rect.x1, rect.y1,
            ));
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64) {
        if !radius.is_finite() || radius <= 0.0 {
            return;
        }
        let path = kurbo::Circle::new(center, radius).to_path(CIRCLE_TOLERANCE);
        self.fill_bez(&path);
    }

    fn fill_path(&mut self, path: &BezPath) {
        self.fill_bez(path);
    }

    fn stroke_path(&mut self, path: &BezPath) {
        let width = self.state.stroke_width;
        if width <= 0.0 {
            return;
        }
        let paint = self.state.stroke.clone();
        if self.apply_paint(&paint, path.bounding_box().inflate(width, width)) {
            self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
            self.ctx.stroke_path(&bezpath_to_cpu(path));
        }
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.reset_transforms();
        let path = rect.to_path(CIRCLE_TOLERANCE);
        self.ctx.push_clip_layer(&bezpath_to_cpu(&path));
        self.open_layers += 1;
    }

    fn set_font(&mut self, font: FontSpec) {
        self.state.font = font;
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        let size = self.state.font.size;
        if text.is_empty() || !size.is_finite() || size <= 0.0 {
            return 0.0;
        }
        match self.text.as_mut() {
            Some(shaper) => f64::from(shaper.layout(text, size as f32).width()),
            None => text.chars().count() as f64 * size * CHAR_ADVANCE_EM,
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let size = self.state.font.size;
        if text.is_empty() || !size.is_finite() || size <= 0.0 || self.state.alpha <= 0.0 {
            return;
        }
        let align = self.state.font.align;
        let Some(shaper) = self.text.as_mut() else {
            return;
        };
        let layout = shaper.layout(text, size as f32);
        let width = f64::from(layout.width());
        let baseline = layout
            .lines()
            .next()
            .map(|l| f64::from(l.metrics().baseline))
            .unwrap_or(0.0);
        let left = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
        };
        let font = shaper.font.clone();

        let bounds = Rect::new(left, y - size, left + width, y + size * 0.3);
        let paint = self.state.fill.clone();
        let paint = match paint {
            Paint::Solid(_) => paint,
            gradient => Paint::Solid(gradient.color_at(bounds.center())),
        };
        if !self.apply_paint(&paint, bounds) {
            return;
        }
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((left, y - baseline)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    fn clear(&mut self) {
        self.ctx.reset();
        self.stack.clear();
        self.open_layers = 0;
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
