//! Light pass drawn over the background and behind the text every frame.

use crate::direction::palette::PaletteRoles;
use crate::direction::resolvers::TensionStage;
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Rect};
use crate::foundation::math::trig_noise;
use crate::render::canvas::{Canvas2d, Paint};

const DEFAULT_BRIGHTNESS: f64 = 0.5;

/// Light treatment named by a chapter's light directive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LightMode {
    /// Even wash.
    #[default]
    Steady,
    /// Wash pulsing with the beat.
    Pulse,
    /// Narrow cone from the top.
    Spotlight,
    /// Wash with irregular dips.
    Flicker,
    /// Warm wash.
    Golden,
    /// Heavy vignette, little wash.
    Dim,
}

impl LightMode {
    /// Map free directive text to a mode by keyword; unknown text is steady.
    pub fn parse(directive: &str) -> Self {
        let d = directive.to_lowercase();
        if d.contains("pulse") || d.contains("strobe") {
            Self::Pulse
        } else if d.contains("spot") {
            Self::Spotlight
        } else if d.contains("flicker") || d.contains("candle") {
            Self::Flicker
        } else if d.contains("golden") || d.contains("warm") || d.contains("sunset") {
            Self::Golden
        } else if d.contains("dim") || d.contains("dark") || d.contains("shadow") {
            Self::Dim
        } else {
            Self::Steady
        }
    }
}

/// Light intensity: stage brightness plus a beat lift, at most 1.
pub fn lighting_intensity(stage: Option<&TensionStage>, beat: f64) -> f64 {
    let brightness = stage.map_or(DEFAULT_BRIGHTNESS, |s| s.light_brightness);
    let beat = if beat.is_finite() { beat.clamp(0.0, 1.0) } else { 0.0 };
    (brightness + beat * 0.3).clamp(0.0, 1.0)
}

/// Draw the light pass for one layer.
pub fn draw_lighting(
    canvas: &mut dyn Canvas2d,
    mode: LightMode,
    roles: &PaletteRoles,
    intensity: f64,
    beat: f64,
    time: f64,
) {
    if canvas.is_empty() {
        return;
    }
    let mut k = if intensity.is_finite() { intensity.clamp(0.0, 1.0) } else { 0.0 };
    let (w, h) = (canvas.width(), canvas.height());
    let center = Point::new(w / 2.0, h / 2.0);
    let reach = w.hypot(h) / 2.0;

    let (tint, wash_center, wash_radius) = match mode {
        LightMode::Steady => (roles.highlight, center, reach),
        LightMode::Pulse => {
            k *= 0.6 + 0.4 * beat.clamp(0.0, 1.0);
            (roles.accent, center, reach * (0.8 + 0.2 * beat.clamp(0.0, 1.0)))
        }
        LightMode::Spotlight => (Color::WHITE, Point::new(w / 2.0, 0.0), h * 0.9),
        LightMode::Flicker => {
            k *= 0.75 + 0.25 * trig_noise((time * 10.0).floor(), 0.7);
            (Color::rgb(1.0, 0.8, 0.55), center, reach)
        }
        LightMode::Golden => (Color::rgb(1.0, 0.75, 0.4), Point::new(w / 2.0, h), reach),
        LightMode::Dim => {
            k *= 0.4;
            (roles.highlight, center, reach * 0.6)
        }
    };

    canvas.save();
    canvas.set_fill(Paint::radial(
        wash_center,
        wash_radius,
        &[(0.0, tint.with_alpha(0.22 * k)), (1.0, tint.with_alpha(0.0))],
    ));
    canvas.fill_rect(Rect::new(0.0, 0.0, w, h));

    let vignette = (1.0 - k) * if mode == LightMode::Dim { 0.8 } else { 0.5 };
    if vignette > 0.0 {
        canvas.set_fill(Paint::radial(
            center,
            reach,
            &[(0.55, Color::BLACK.with_alpha(0.0)), (1.0, Color::BLACK.with_alpha(vignette))],
        ));
        canvas.fill_rect(Rect::new(0.0, 0.0, w, h));
    }
    canvas.restore();
}

#[cfg(test)]
#[path = "../../tests/unit/render/lighting.rs"]
mod tests;
