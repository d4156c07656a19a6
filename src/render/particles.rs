//! Ambient particle field.
//!
//! Particles have no stored state: each one's position is a function of its index, the song time
//! and the field configuration, so a frame can be drawn at any time in any order.

use crate::direction::palette::PaletteRoles;
use crate::direction::resolvers::MotionPhysics;
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Rect};
use crate::foundation::math::{fract01, trig_noise};
use crate::render::canvas::{Canvas2d, Paint};
use serde::Serialize;
use std::f64::consts::TAU;

/// Particle behavior named by a chapter's particle directive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    /// Slow two-axis drift.
    #[default]
    Ambient,
    /// Rising warm sparks.
    Embers,
    /// Fast falling streaks.
    Rain,
    /// Slow falling flakes with sway.
    Snow,
    /// Bursts from the center.
    Sparks,
    /// Rising bubbles.
    Bubbles,
}

impl ParticleKind {
    /// Map free directive text to a kind by keyword; unknown text is ambient.
    pub fn parse(directive: &str) -> Self {
        let d = directive.to_lowercase();
        if d.contains("spark") || d.contains("burst") || d.contains("firework") {
            Self::Sparks
        } else if d.contains("ember") || d.contains("cinder") || d.contains("fire") {
            Self::Embers
        } else if d.contains("rain") || d.contains("storm") {
            Self::Rain
        } else if d.contains("snow") || d.contains("frost") {
            Self::Snow
        } else if d.contains("bubble") || d.contains("underwater") {
            Self::Bubbles
        } else {
            Self::Ambient
        }
    }
}

/// Resolved particle field for a stretch of the song.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ParticleConfig {
    /// Behavior.
    pub kind: ParticleKind,
    /// Fill color.
    pub color: Color,
    /// Speed multiplier.
    pub speed: f64,
    /// Base radius in px.
    pub size: f64,
    /// Positional jitter in `[0, 1]`.
    pub chaos: f64,
}

/// Particle field for a directive under a motion archetype.
pub fn particle_config(
    directive: &str,
    physics: &MotionPhysics,
    roles: &PaletteRoles,
) -> ParticleConfig {
    let kind = ParticleKind::parse(directive);
    let color = match kind {
        ParticleKind::Embers => Color::rgb(1.0, 0.55, 0.15),
        ParticleKind::Rain => roles.secondary.mix(Color::WHITE, 0.4),
        ParticleKind::Snow => Color::WHITE,
        ParticleKind::Sparks => roles.highlight,
        ParticleKind::Bubbles => roles.accent.mix(Color::WHITE, 0.5),
        ParticleKind::Ambient => roles.accent,
    };
    let size = match kind {
        ParticleKind::Rain => 1.0,
        ParticleKind::Snow | ParticleKind::Bubbles => 2.5,
        _ => 1.8,
    };
    ParticleConfig {
        kind,
        color,
        speed: (0.5 + physics.heat) * (1.2 - 0.5 * physics.weight.clamp(0.0, 1.0)),
        size,
        chaos: physics.chaos.clamp(0.0, 1.0),
    }
}

/// Share of the budget drawn at density 1; multipliers above 1 spend the rest.
pub const BASE_BUDGET_SHARE: f64 = 0.5;

/// Particles to draw for a density multiplier under a budget.
pub fn particle_count(budget: usize, density: f64) -> usize {
    if !density.is_finite() || density <= 0.0 {
        return 0;
    }
    ((budget as f64 * BASE_BUDGET_SHARE * density).round() as usize).min(budget)
}

/// Draw `count` particles at `time`; returns how many were drawn.
pub fn draw_particles(
    canvas: &mut dyn Canvas2d,
    cfg: &ParticleConfig,
    count: usize,
    time: f64,
    beat: f64,
) -> usize {
    if canvas.is_empty() || count == 0 {
        return 0;
    }
    let (w, h) = (canvas.width(), canvas.height());
    let t = if time.is_finite() { time.max(0.0) } else { 0.0 };
    let beat = if beat.is_finite() { beat.clamp(0.0, 1.0) } else { 0.0 };
    let size = cfg.size * (1.0 + 0.5 * beat);

    canvas.save();
    for i in 0..count {
        let fi = i as f64;
        let x0 = trig_noise(fi, 1.3);
        let y0 = trig_noise(fi, 2.7);
        let sf = (0.5 + trig_noise(fi, 4.1)) * cfg.speed;
        let jitter = cfg.chaos * (trig_noise(fi + (t * 8.0).floor(), 6.2) - 0.5) * 0.02;
        let twinkle = 0.5 + 0.5 * (t * 2.0 + fi * 1.7).sin();
        let alpha = (0.25 + 0.45 * twinkle) * (0.7 + 0.3 * beat);

        let (p, r) = match cfg.kind {
            ParticleKind::Ambient => (
                Point::new(fract01(x0 + t * 0.01 * sf + jitter), fract01(y0 + t * 0.006 * sf)),
                size,
            ),
            ParticleKind::Embers => (
                Point::new(x0 + 0.02 * (t * 1.5 + fi).sin() + jitter, fract01(y0 - t * 0.08 * sf)),
                size,
            ),
            ParticleKind::Snow => (
                Point::new(
                    fract01(x0 + 0.03 * (t * 0.8 + fi).sin() + jitter),
                    fract01(y0 + t * 0.04 * sf),
                ),
                size * (0.6 + 0.8 * trig_noise(fi, 8.8)),
            ),
            ParticleKind::Bubbles => (
                Point::new(x0 + 0.015 * (t * 2.0 + fi).sin() + jitter, fract01(y0 - t * 0.05 * sf)),
                size * (0.5 + trig_noise(fi, 3.3)),
            ),
            ParticleKind::Sparks => {
                let angle = TAU * x0;
                let dist = fract01(y0 + t * 0.3 * sf) * 0.5;
                (
                    Point::new(0.5 + dist * angle.cos() + jitter, 0.5 + dist * angle.sin()),
                    size * (1.0 - dist),
                )
            }
            ParticleKind::Rain => {
                let p = Point::new(fract01(x0 + jitter), fract01(y0 + t * 0.6 * sf));
                canvas.set_fill(Paint::Solid(cfg.color.with_alpha(alpha)));
                let (x, y) = (p.x * w, p.y * h);
                canvas.fill_rect(Rect::new(x, y, x + size.max(0.5), y + 8.0 + 6.0 * beat));
                continue;
            }
        };
        canvas.set_fill(Paint::Solid(cfg.color.with_alpha(alpha)));
        canvas.fill_circle(Point::new(p.x * w, p.y * h), r.max(0.3));
    }
    canvas.restore();
    count
}

#[cfg(test)]
#[path = "../../tests/unit/render/particles.rs"]
mod tests;
