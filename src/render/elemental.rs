//! Elemental word treatments (water, rain, fire, smoke, electric, neon).
//!
//! Every particle is recomputed from `time` on each call: pseudo-randomness comes from
//! [`trig_noise`] over time and particle index, never from stored state, so the same inputs
//! always draw the same frame.

use crate::foundation::color::Color;
use crate::foundation::core::{BezPath, CanvasSize, Point, Rect};
use crate::foundation::math::{fract01, trig_noise};
use crate::render::canvas::{Canvas2d, FontSpec, Paint};
use crate::words::classify::normalize_token;
use serde::{Deserialize, Serialize};

/// Elemental identity of a word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementalClass {
    /// Wet glyph, bubbles and drips.
    Water,
    /// Like water with heavier, faster drips.
    Rain,
    /// Flickering gradient and embers.
    Fire,
    /// Dim glyph with a rising puff.
    Smoke,
    /// Glow, orbs and beat-triggered lightning.
    Electric,
    /// Electric treatment in a pink accent.
    Neon,
    /// Plain glyph.
    #[default]
    None,
}

impl ElementalClass {
    /// Parse a class name (case-insensitive). Unknown names are [`ElementalClass::None`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "water" => Self::Water,
            "rain" => Self::Rain,
            "fire" => Self::Fire,
            "smoke" => Self::Smoke,
            "electric" => Self::Electric,
            "neon" => Self::Neon,
            _ => Self::None,
        }
    }
}

/// Default elemental association of a word.
pub fn elemental_for_word(word: &str) -> ElementalClass {
    match normalize_token(word).as_str() {
        "fire" | "burn" | "burning" | "flame" | "flames" => ElementalClass::Fire,
        "rain" | "tears" | "cry" | "crying" => ElementalClass::Rain,
        "water" | "ocean" | "sea" | "wave" | "waves" => ElementalClass::Water,
        "smoke" | "haze" | "ghost" => ElementalClass::Smoke,
        "electric" | "neon" | "light" | "spark" => ElementalClass::Electric,
        _ => ElementalClass::None,
    }
}

/// Particle budget tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectQuality {
    /// Reduced particle counts.
    Low,
    /// Full particle counts.
    #[default]
    High,
}

/// One word to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementalWord<'a> {
    /// Glyph text.
    pub text: &'a str,
    /// Horizontal center.
    pub x: f64,
    /// Baseline.
    pub y: f64,
    /// Font size in px.
    pub font_size: f64,
    /// Measured glyph width in px.
    pub word_width: f64,
    /// Treatment.
    pub class: ElementalClass,
    /// Song time in seconds.
    pub time: f64,
    /// Beat intensity in `[0, 1]`.
    pub beat_intensity: f64,
    /// Appearances of this word so far.
    pub appearance_count: u32,
    /// Replaces the treatment's base glyph color.
    pub color_override: Option<Color>,
    /// Hero words get a stronger glow.
    pub is_hero: bool,
}

/// Drawing options shared by a frame's words.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementalOptions {
    /// Particle budget tier.
    pub effect_quality: EffectQuality,
    /// Fixed bubble positions as fractions of the word width; empty derives a count.
    pub bubble_positions: Vec<f64>,
    /// When set, words fully outside this canvas (plus a margin) are skipped.
    pub cull_to: Option<CanvasSize>,
    /// Font family for glyphs.
    pub font_family: Option<String>,
}

const WATER_BASE: Color = Color::rgb(0.56, 0.70, 0.79);
const FIRE_BASE: Color = Color::rgb(0.16, 0.04, 0.0);
const SMOKE_BASE: Color = Color::rgb(0.69, 0.69, 0.69);
const EMBER: Color = Color::rgb(1.0, 0.55, 0.1);
const ELECTRIC_ACCENT: Color = Color::rgb(0.49, 0.98, 1.0);
const NEON_ACCENT: Color = Color::rgb(1.0, 0.24, 0.94);
const LIGHTNING_BEAT: f64 = 0.55;

fn glyph_bounds(w: &ElementalWord<'_>) -> Rect {
    let half = w.word_width.max(0.0) / 2.0;
    Rect::new(
        w.x - half,
        w.y - 0.8 * w.font_size,
        w.x + half,
        w.y + 0.2 * w.font_size,
    )
}

fn is_culled(w: &ElementalWord<'_>, opts: &ElementalOptions) -> bool {
    let Some(size) = opts.cull_to else {
        return false;
    };
    let margin = w.font_size.max(0.0);
    let b = glyph_bounds(w);
    b.x1 < -margin || b.x0 > size.w() + margin || b.y1 < -margin || b.y0 > size.h() + margin
}

/// Draw one word with its elemental treatment.
pub fn draw_elemental_word(
    canvas: &mut dyn Canvas2d,
    word: &ElementalWord<'_>,
    opts: &ElementalOptions,
) {
    let sized = word.font_size.is_finite() && word.font_size > 0.0;
    if canvas.is_empty() || word.text.is_empty() || !sized {
        return;
    }
    if is_culled(word, opts) {
        return;
    }
    let word = ElementalWord {
        beat_intensity: if word.beat_intensity.is_finite() {
            word.beat_intensity.clamp(0.0, 1.0)
        } else {
            0.0
        },
        time: if word.time.is_finite() { word.time.max(0.0) } else { 0.0 },
        ..word.clone()
    };

    canvas.save();
    let family = opts.font_family.clone().unwrap_or_else(|| FontSpec::default().family);
    canvas.set_font(FontSpec::new(family, word.font_size));
    match word.class {
        ElementalClass::Water => draw_water(canvas, &word, opts, false),
        ElementalClass::Rain => draw_water(canvas, &word, opts, true),
        ElementalClass::Fire => draw_fire(canvas, &word, opts),
        ElementalClass::Smoke => draw_smoke(canvas, &word),
        ElementalClass::Electric => draw_electric(canvas, &word, opts, ELECTRIC_ACCENT),
        ElementalClass::Neon => draw_electric(canvas, &word, opts, NEON_ACCENT),
        ElementalClass::None => {
            canvas.set_fill(Paint::Solid(word.color_override.unwrap_or(Color::WHITE)));
            canvas.fill_text(word.text, word.x, word.y);
        }
    }
    canvas.restore();
}

fn bubble_count(word: &ElementalWord<'_>, opts: &ElementalOptions) -> usize {
    let cap = match opts.effect_quality {
        EffectQuality::High => 12,
        EffectQuality::Low => 8,
    };
    let wanted = if opts.bubble_positions.is_empty() {
        3 + 2 * word.appearance_count as usize
    } else {
        opts.bubble_positions.len()
    };
    wanted.min(cap)
}

fn draw_water(
    canvas: &mut dyn Canvas2d,
    w: &ElementalWord<'_>,
    opts: &ElementalOptions,
    rain: bool,
) {
    let fs = w.font_size;
    let bounds = glyph_bounds(w);
    canvas.set_fill(Paint::Solid(w.color_override.unwrap_or(WATER_BASE)));
    canvas.fill_text(w.text, w.x, w.y);

    canvas.save();
    canvas.clip_rect(Rect::new(
        bounds.x0,
        bounds.y0,
        bounds.x1,
        bounds.y0 + bounds.height() * 0.45,
    ));
    canvas.set_global_alpha(0.6);
    canvas.set_fill(Paint::linear(
        Point::new(w.x, bounds.y0),
        Point::new(w.x, bounds.y0 + bounds.height() * 0.45),
        &[
            (0.0, Color::WHITE.with_alpha(0.55)),
            (1.0, Color::WHITE.with_alpha(0.0)),
        ],
    ));
    canvas.fill_text(w.text, w.x, w.y);
    canvas.restore();

    for i in 0..bubble_count(w, opts) {
        let fi = i as f64;
        let frac = opts
            .bubble_positions
            .get(i)
            .copied()
            .unwrap_or_else(|| fract01(0.137 + fi * 0.618));
        let phase = fract01(w.time * 0.35 + fi * 0.17);
        let center = Point::new(
            bounds.x0 + bounds.width() * frac,
            w.y - phase * fs * 1.2,
        );
        let r = fs * (0.03 + 0.02 * trig_noise(fi, 1.0));
        canvas.set_fill(Paint::Solid(Color::WHITE.with_alpha((1.0 - phase) * 0.6)));
        canvas.fill_circle(center, r);
    }

    let (drips, period) = match (rain, opts.effect_quality) {
        (true, EffectQuality::High) => (4, 0.9),
        (true, EffectQuality::Low) => (2, 0.9),
        (false, EffectQuality::High) => (2, 1.6),
        (false, EffectQuality::Low) => (1, 1.6),
    };
    for i in 0..drips {
        let fi = f64::from(i);
        let phase = ((w.time + fi * 0.53) % period) / period;
        let dx = bounds.x0 + bounds.width() * (0.2 + 0.6 * (fi + 0.5) / f64::from(drips));
        let dy = w.y + 0.15 * fs + phase * fs * 0.8;
        canvas.set_fill(Paint::Solid(WATER_BASE.with_alpha(1.0 - phase)));
        canvas.fill_circle(Point::new(dx, dy), fs * if rain { 0.05 } else { 0.04 });
    }
}

fn draw_fire(canvas: &mut dyn Canvas2d, w: &ElementalWord<'_>, opts: &ElementalOptions) {
    let fs = w.font_size;
    let bounds = glyph_bounds(w);
    canvas.set_fill(Paint::Solid(w.color_override.unwrap_or(FIRE_BASE)));
    canvas.fill_text(w.text, w.x, w.y);

    let flicker = (w.time * 12.0).sin() * 0.05 + (w.time * 7.3 + 1.3).sin() * 0.03;
    canvas.save();
    canvas.clip_rect(bounds);
    canvas.set_global_alpha(0.85);
    canvas.set_fill(Paint::linear(
        Point::new(w.x, bounds.y1),
        Point::new(w.x, bounds.y0),
        &[
            (0.0, Color::rgb(0.9, 0.1, 0.05)),
            (0.35 + flicker, Color::rgb(1.0, 0.5, 0.0)),
            (0.7 + flicker, Color::rgb(1.0, 0.85, 0.2)),
            (1.0, Color::WHITE),
        ],
    ));
    canvas.fill_text(w.text, w.x, w.y);
    canvas.restore();

    let cap = match opts.effect_quality {
        EffectQuality::High => 12,
        EffectQuality::Low => 6,
    };
    let embers = ((4.0 + w.beat_intensity * 8.0).round() as usize).min(cap);
    for i in 0..embers {
        let fi = i as f64;
        let phase = fract01(w.time * 0.6 + fi * 0.23);
        let center = Point::new(
            w.x + (trig_noise(fi, 3.1) - 0.5) * bounds.width() + (w.time * 2.0 + fi).sin() * 4.0,
            bounds.y0 - phase * fs * 1.5,
        );
        canvas.set_fill(Paint::Solid(EMBER.with_alpha((1.0 - phase) * 0.9)));
        canvas.fill_circle(center, 1.5 + 1.5 * trig_noise(fi, 7.0));
    }
}

fn draw_smoke(canvas: &mut dyn Canvas2d, w: &ElementalWord<'_>) {
    let fs = w.font_size;
    let base = w.color_override.unwrap_or(SMOKE_BASE);
    canvas.save();
    canvas.set_global_alpha(0.55);
    canvas.set_fill(Paint::Solid(base));
    canvas.fill_text(w.text, w.x, w.y);
    canvas.restore();

    let phase = fract01(w.time * 0.4);
    let radius = fs * (0.4 + phase * 1.2);
    let center = Point::new(w.x, w.y - 0.5 * fs - phase * fs);
    canvas.set_fill(Paint::radial(
        center,
        radius,
        &[
            (0.0, base.with_alpha((1.0 - phase) * 0.35)),
            (1.0, base.with_alpha(0.0)),
        ],
    ));
    canvas.fill_circle(center, radius);
}

/// Glow radius and alpha behind an electric word; both grow with the beat.
pub fn electric_glow(font_size: f64, beat_intensity: f64, is_hero: bool) -> (f64, f64) {
    let hero = if is_hero { 1.4 } else { 1.0 };
    let radius = font_size * (1.2 + beat_intensity * 0.8) * hero;
    let alpha = ((0.25 + beat_intensity * 0.5) * if is_hero { 1.3 } else { 1.0 }).min(1.0);
    (radius, alpha)
}

fn draw_electric(
    canvas: &mut dyn Canvas2d,
    w: &ElementalWord<'_>,
    opts: &ElementalOptions,
    accent: Color,
) {
    let fs = w.font_size;
    let bounds = glyph_bounds(w);
    let accent = w.color_override.unwrap_or(accent);
    let (radius, alpha) = electric_glow(fs, w.beat_intensity, w.is_hero);
    let center = Point::new(w.x, w.y - 0.35 * fs);
    canvas.set_fill(Paint::radial(
        center,
        radius,
        &[(0.0, accent.with_alpha(alpha)), (1.0, accent.with_alpha(0.0))],
    ));
    canvas.fill_circle(center, radius);

    canvas.set_fill(Paint::Solid(Color::WHITE));
    canvas.fill_text(w.text, w.x, w.y);

    let orbs = match opts.effect_quality {
        EffectQuality::High => 3,
        EffectQuality::Low => 2,
    };
    for i in 0..orbs {
        let fi = f64::from(i);
        let pulse = 0.5 + 0.5 * (w.time * 6.0 + fi * 2.1).sin();
        let orb = Point::new(
            bounds.x0 + bounds.width() * (fi + 0.5) / f64::from(orbs),
            w.y - 0.9 * fs,
        );
        canvas.set_fill(Paint::Solid(accent.with_alpha(0.4 + 0.5 * pulse)));
        canvas.fill_circle(orb, fs * 0.05 * (1.0 + pulse));
    }

    if w.beat_intensity > LIGHTNING_BEAT {
        let mut bolt = BezPath::new();
        let mut p = Point::new(w.x, w.y - 0.4 * fs);
        bolt.move_to(p);
        for k in 0..6 {
            let dx = (trig_noise(w.time * 13.0 + f64::from(k), 5.7) - 0.5) * fs * 0.5;
            p = Point::new(p.x + dx, p.y - fs * 0.25);
            bolt.line_to(p);
        }
        canvas.save();
        canvas.set_global_alpha(w.beat_intensity);
        canvas.set_stroke(Paint::Solid(accent), 2.0);
        canvas.stroke_path(&bolt);
        canvas.restore();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/elemental.rs"]
mod tests;
