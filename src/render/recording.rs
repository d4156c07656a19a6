use crate::foundation::core::{BezPath, Point, Rect};
use crate::render::canvas::{Canvas2d, FontSpec, Paint};

/// Advance of one character as a fraction of the font size.
const CHAR_ADVANCE_EM: f64 = 0.55;

/// One recorded canvas call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    /// `save()`.
    Save,
    /// `restore()`.
    Restore,
    /// `set_global_alpha()` (clamped value).
    GlobalAlpha(f64),
    /// `set_fill()`.
    Fill(Paint),
    /// `set_stroke()`.
    Stroke(Paint, f64),
    /// `fill_rect()`.
    FillRect(Rect),
    /// `fill_circle()`.
    FillCircle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
    },
    /// `fill_path()`.
    FillPath(BezPath),
    /// `stroke_path()`.
    StrokePath(BezPath),
    /// `clip_rect()`.
    ClipRect(Rect),
    /// `set_font()`.
    Font(FontSpec),
    /// `fill_text()`.
    FillText {
        /// Text drawn.
        text: String,
        /// Anchor x.
        x: f64,
        /// Baseline y.
        y: f64,
    },
    /// `clear()`.
    Clear,
}

impl DrawCmd {
    /// True for calls that put pixels on the canvas.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Self::FillRect(_)
                | Self::FillCircle { .. }
                | Self::FillPath(_)
                | Self::StrokePath(_)
                | Self::FillText { .. }
        )
    }
}

/// Canvas that records calls instead of rasterizing.
///
/// Text metrics are deterministic (`chars × size × 0.55`) so layout is reproducible without
/// fonts.
#[derive(Clone, Debug)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    font_size: f64,
    font_stack: Vec<f64>,
    commands: Vec<DrawCmd>,
}

impl RecordingCanvas {
    /// Empty recording of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        let sane = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sane(width),
            height: sane(height),
            font_size: FontSpec::default().size,
            font_stack: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Recorded calls, in order.
    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// Drop recorded calls and return them.
    pub fn take(&mut self) -> Vec<DrawCmd> {
        std::mem::take(&mut self.commands)
    }

    /// Number of pixel-producing calls recorded.
    pub fn draw_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_draw()).count()
    }

    /// Every string passed to `fill_text`.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCmd::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Every radial gradient set as a fill.
    pub fn radial_fills(&self) -> impl Iterator<Item = &crate::render::canvas::RadialGradient> {
        self.commands.iter().filter_map(|c| match c {
            DrawCmd::Fill(Paint::Radial(g)) => Some(g),
            _ => None,
        })
    }

    /// Change the canvas size; keeps the recording.
    pub fn resize(&mut self, width: f64, height: f64) {
        let fresh = Self::new(width, height);
        self.width = fresh.width;
        self.height = fresh.height;
    }
}

impl Canvas2d for RecordingCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.font_stack.push(self.font_size);
        self.commands.push(DrawCmd::Save);
    }

    fn restore(&mut self) {
        if let Some(size) = self.font_stack.pop() {
            self.font_size = size;
            self.commands.push(DrawCmd::Restore);
        }
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        let a = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.commands.push(DrawCmd::GlobalAlpha(a));
    }

    fn set_fill(&mut self, paint: Paint) {
        self.commands.push(DrawCmd::Fill(paint));
    }

    fn set_stroke(&mut self, paint: Paint, width: f64) {
        self.commands.push(DrawCmd::Stroke(paint, width.max(0.0)));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCmd::FillRect(rect));
    }

    fn fill_circle(&mut self, center: Point, radius: f64) {
        if radius > 0.0 {
            self.commands.push(DrawCmd::FillCircle { center, radius });
        }
    }

    fn fill_path(&mut self, path: &BezPath) {
        self.commands.push(DrawCmd::FillPath(path.clone()));
    }

    fn stroke_path(&mut self, path: &BezPath) {
        self.commands.push(DrawCmd::StrokePath(path.clone()));
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCmd::ClipRect(rect));
    }

    fn set_font(&mut self, font: FontSpec) {
        self.font_size = if font.size.is_finite() {
            font.size.max(0.0)
        } else {
            0.0
        };
        self.commands.push(DrawCmd::Font(font));
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size * CHAR_ADVANCE_EM
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        if text.is_empty() {
            return;
        }
        self.commands.push(DrawCmd::FillText {
            text: text.to_owned(),
            x,
            y,
        });
    }

    fn clear(&mut self) {
        self.commands.push(DrawCmd::Clear);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/recording.rs"]
mod tests;
