//! Procedural backgrounds and their redraw gate.

use crate::direction::palette::PaletteRoles;
use crate::direction::resolvers::BackgroundSystem;
use crate::foundation::color::Color;
use crate::foundation::core::{BezPath, Point, Rect};
use crate::foundation::math::{fract01, trig_noise};
use crate::render::canvas::{Canvas2d, Paint};

/// Beat level whose crossing always forces a redraw.
pub const BEAT_CROSSING: f64 = 0.2;
const BEAT_DELTA: f64 = 0.2;
const PROGRESS_DELTA: f64 = 0.05;

/// Why the background was redrawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedrawReason {
    /// Nothing drawn yet.
    First,
    /// The active chapter or section title changed.
    TitleChanged,
    /// Enough time passed and beat or progress moved enough.
    Drift,
    /// Beat intensity crossed [`BEAT_CROSSING`].
    BeatCrossing,
}

/// Inputs of the redraw gate for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundFrame<'a> {
    /// Active chapter or section title.
    pub title: Option<&'a str>,
    /// Beat intensity in `[0, 1]`.
    pub beat: f64,
    /// Song progress in `[0, 1]`.
    pub progress: f64,
    /// Clock in milliseconds.
    pub now_ms: f64,
}

/// State remembered from the last background draw.
#[derive(Clone, Debug, Default)]
pub struct BackgroundGate {
    last_title: Option<String>,
    last_beat: f64,
    last_progress: f64,
    last_draw_ms: Option<f64>,
    min_interval_ms: f64,
}

impl BackgroundGate {
    /// Gate requiring `min_interval_ms` between drift redraws.
    pub fn new(min_interval_ms: f64) -> Self {
        Self {
            min_interval_ms: min_interval_ms.max(0.0),
            ..Self::default()
        }
    }

    /// Reason to redraw this frame, if any. Does not update the gate.
    pub fn check(&self, f: &BackgroundFrame<'_>) -> Option<RedrawReason> {
        let Some(last_ms) = self.last_draw_ms else {
            return Some(RedrawReason::First);
        };
        if self.last_title.as_deref() != f.title {
            return Some(RedrawReason::TitleChanged);
        }
        if (self.last_beat > BEAT_CROSSING) != (f.beat > BEAT_CROSSING) {
            return Some(RedrawReason::BeatCrossing);
        }
        let elapsed = (f.now_ms - last_ms).abs();
        let moved = (f.beat - self.last_beat).abs() > BEAT_DELTA
            || (f.progress - self.last_progress).abs() > PROGRESS_DELTA;
        (elapsed > self.min_interval_ms && moved).then_some(RedrawReason::Drift)
    }

    /// Record a redraw for this frame.
    pub fn mark_drawn(&mut self, f: &BackgroundFrame<'_>) {
        self.last_title = f.title.map(str::to_owned);
        self.last_beat = f.beat;
        self.last_progress = f.progress;
        self.last_draw_ms = Some(f.now_ms);
    }

    /// Check and, when a redraw is due, record it.
    pub fn poll(&mut self, f: &BackgroundFrame<'_>) -> Option<RedrawReason> {
        let reason = self.check(f)?;
        tracing::debug!(?reason, title = ?f.title, "background redraw");
        self.mark_drawn(f);
        Some(reason)
    }

    /// Forget the last draw; the next poll redraws.
    pub fn reset(&mut self) {
        *self = Self::new(self.min_interval_ms);
    }
}

/// Clear `canvas` and draw the background of `system`.
pub fn draw_background(
    canvas: &mut dyn Canvas2d,
    system: BackgroundSystem,
    roles: &PaletteRoles,
    beat: f64,
    progress: f64,
    time: f64,
) {
    canvas.clear();
    if canvas.is_empty() {
        return;
    }
    let beat = if beat.is_finite() { beat.clamp(0.0, 1.0) } else { 0.0 };
    let time = if time.is_finite() { time } else { 0.0 };
    let (w, h) = (canvas.width(), canvas.height());

    let (top, bottom) = base_colors(system, roles);
    canvas.set_fill(Paint::linear(
        Point::new(0.0, 0.0),
        Point::new(0.0, h),
        &[(0.0, top), (1.0, bottom)],
    ));
    canvas.fill_rect(Rect::new(0.0, 0.0, w, h));

    match system {
        BackgroundSystem::Default => {
            let c = Point::new(w / 2.0, h / 2.0);
            let r = w.max(h) * (0.45 + 0.1 * beat);
            glow(canvas, c, r, roles.accent.with_alpha(0.12 + 0.18 * beat));
        }
        BackgroundSystem::Fire => {
            for i in 0..3 {
                let fi = f64::from(i);
                let c = Point::new(
                    w * (0.2 + 0.3 * fi),
                    h * (1.0 - 0.05 * trig_noise(time * 2.0, fi)),
                );
                let color = Color::rgb(1.0, 0.35 + 0.1 * fi, 0.05);
                glow(canvas, c, h * (0.35 + 0.15 * beat), color.with_alpha(0.25 + 0.35 * beat));
            }
        }
        BackgroundSystem::Ocean => {
            for i in 0..3 {
                let fi = f64::from(i);
                let base_y = h * (0.55 + 0.15 * fi);
                let amp = h * (0.02 + 0.02 * beat);
                let path = wave_band(w, h, base_y, amp, 1.5 + fi * 0.7, time * (0.4 + 0.2 * fi));
                let tone = roles.secondary.mix(roles.accent, fi / 2.0);
                canvas.set_fill(Paint::Solid(tone.with_alpha(0.18 + 0.08 * fi)));
                canvas.fill_path(&path);
            }
        }
        BackgroundSystem::Storm => {
            for i in 0..5 {
                let fi = f64::from(i);
                let c = Point::new(
                    w * fract01(0.13 + fi * 0.29 + time * 0.01),
                    h * (0.1 + 0.08 * trig_noise(fi, 2.0)),
                );
                glow(canvas, c, w * 0.25, Color::rgb(0.25, 0.27, 0.32).with_alpha(0.5));
            }
            if beat > 0.7 {
                canvas.set_fill(Paint::Solid(Color::WHITE.with_alpha((beat - 0.7) * 0.6)));
                canvas.fill_rect(Rect::new(0.0, 0.0, w, h));
            }
        }
        BackgroundSystem::Aurora => {
            for i in 0..3 {
                let fi = f64::from(i);
                let band = ribbon(w, h * (0.2 + 0.12 * fi), h * 0.08, time * (0.2 + 0.1 * fi) + fi);
                let a = Color::rgb(0.2, 0.95, 0.6).mix(Color::rgb(0.6, 0.3, 1.0), fi / 2.0);
                canvas.set_fill(Paint::linear(
                    Point::new(0.0, 0.0),
                    Point::new(w, 0.0),
                    &[
                        (0.0, a.with_alpha(0.0)),
                        (0.5, a.with_alpha(0.25 + 0.2 * beat)),
                        (1.0, a.with_alpha(0.0)),
                    ],
                ));
                canvas.fill_path(&band);
            }
        }
        BackgroundSystem::Urban => {
            let buildings = 12;
            let bw = w / f64::from(buildings);
            for i in 0..buildings {
                let fi = f64::from(i);
                let bh = h * (0.2 + 0.35 * trig_noise(fi, 9.0));
                canvas.set_fill(Paint::Solid(Color::rgb(0.05, 0.05, 0.08)));
                canvas.fill_rect(Rect::new(fi * bw, h - bh, (fi + 1.0) * bw - 2.0, h));
                if trig_noise(fi, 4.0 + (progress * 20.0).floor()) > 0.5 {
                    canvas.set_fill(Paint::Solid(roles.accent.with_alpha(0.5 + 0.4 * beat)));
                    canvas.fill_rect(Rect::new(
                        fi * bw + bw * 0.3,
                        h - bh * 0.8,
                        fi * bw + bw * 0.5,
                        h - bh * 0.7,
                    ));
                }
            }
        }
        BackgroundSystem::Intimate => {
            let flicker = 0.9 + 0.1 * (time * 9.0).sin();
            let c = Point::new(w / 2.0, h * 0.8);
            let ember = Color::rgb(1.0, 0.7, 0.35).with_alpha(0.3 + 0.15 * beat);
            glow(canvas, c, h * 0.6 * flicker, ember);
        }
        BackgroundSystem::Void => {
            let c = Point::new(w / 2.0, h / 2.0);
            glow(canvas, c, w.min(h) * 0.3, roles.text.with_alpha(0.04 + 0.06 * beat));
        }
    }
}

fn base_colors(system: BackgroundSystem, roles: &PaletteRoles) -> (Color, Color) {
    let bg = roles.background;
    match system {
        BackgroundSystem::Fire => (bg, Color::rgb(0.35, 0.06, 0.02)),
        BackgroundSystem::Ocean => (bg, Color::rgb(0.02, 0.12, 0.22)),
        BackgroundSystem::Storm => (Color::rgb(0.08, 0.09, 0.11), bg),
        BackgroundSystem::Aurora => (Color::rgb(0.01, 0.02, 0.06), bg),
        BackgroundSystem::Urban => (Color::rgb(0.06, 0.04, 0.12), bg),
        BackgroundSystem::Intimate => (bg, Color::rgb(0.18, 0.09, 0.04)),
        BackgroundSystem::Void => (Color::BLACK, bg.mix(Color::BLACK, 0.8)),
        BackgroundSystem::Default => (bg, bg.mix(roles.secondary, 0.35)),
    }
}

fn glow(canvas: &mut dyn Canvas2d, center: Point, radius: f64, color: Color) {
    canvas.set_fill(Paint::radial(center, radius, &[(0.0, color), (1.0, color.with_alpha(0.0))]));
    canvas.fill_circle(center, radius);
}

fn wave_band(w: f64, h: f64, base_y: f64, amp: f64, cycles: f64, phase: f64) -> BezPath {
    let mut p = BezPath::new();
    p.move_to(Point::new(0.0, h));
    let steps = 24;
    for s in 0..=steps {
        let x = w * f64::from(s) / f64::from(steps);
        let y = base_y + amp * (std::f64::consts::TAU * cycles * x / w.max(1.0) + phase).sin();
        p.line_to(Point::new(x, y));
    }
    p.line_to(Point::new(w, h));
    p.close_path();
    p
}

fn ribbon(w: f64, center_y: f64, thickness: f64, phase: f64) -> BezPath {
    let steps = 24;
    let y_at = |x: f64| center_y + thickness * (x / w.max(1.0) * 5.0 + phase).sin();
    let mut p = BezPath::new();
    p.move_to(Point::new(0.0, y_at(0.0)));
    for s in 1..=steps {
        let x = w * f64::from(s) / f64::from(steps);
        p.line_to(Point::new(x, y_at(x)));
    }
    for s in (0..=steps).rev() {
        let x = w * f64::from(s) / f64::from(steps);
        p.line_to(Point::new(x, y_at(x) + thickness));
    }
    p.close_path();
    p
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
