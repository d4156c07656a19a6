use crate::foundation::color::Color;
use crate::words::classify::{
    PhoneticClass, WordClass, classify_word, has_long_vowel, normalize_token, phonetic_class,
};
use serde::Serialize;

/// Line-level animation state the word props are derived from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineAnim {
    /// Progress through the line in `[0, 1]`.
    pub progress: f64,
    /// Line scale before per-word adjustments.
    pub scale: f64,
    /// Line opacity before per-word adjustments.
    pub opacity: f64,
    /// Line text color.
    pub base_color: Color,
}

impl Default for LineAnim {
    fn default() -> Self {
        Self {
            progress: 0.0,
            scale: 1.0,
            opacity: 1.0,
            base_color: Color::WHITE,
        }
    }
}

/// Per-word visual treatment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WordVisualProps {
    /// Scale multiplier in `[0.5, 2]`.
    pub scale: f64,
    /// Fill color.
    pub color: Color,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Horizontal offset in px.
    pub x_offset: f64,
    /// Vertical offset in px (positive is down).
    pub y_offset: f64,
    /// Glow radius in px.
    pub glow_radius: f64,
    /// Entry delay in seconds.
    pub delay: f64,
    /// Extra letter spacing in em.
    pub letter_spacing: f64,
    /// Draw ghost copies behind the word.
    pub show_trail: bool,
    /// Number of ghost copies.
    pub trail_count: u32,
}

const IMPACT_COLOR: Color = Color::rgb(1.0, 0.42, 0.17);
const TENDER_COLOR: Color = Color::rgb(1.0, 0.71, 0.76);
const TRANSCENDENT_COLOR: Color = Color::rgb(1.0, 0.93, 0.7);
const WORD_DELAY_SEC: f64 = 0.06;

/// Horizontal and vertical drift for motion verbs.
fn motion_direction(word: &str) -> (f64, f64) {
    match normalize_token(word).as_str() {
        "rise" | "fly" | "climb" | "jump" | "float" => (0.0, -6.0),
        "fall" | "dive" => (0.0, 6.0),
        "leave" | "escape" | "drift" | "slide" | "go" => (-6.0, 0.0),
        _ => (6.0, 0.0),
    }
}

/// Compute a word's visual props.
///
/// Pure: identical inputs always produce identical props.
pub fn word_visual_props(
    word: &str,
    word_index: usize,
    line_anim: &LineAnim,
    beat_intensity: f64,
    appearance_count: u32,
) -> WordVisualProps {
    let beat = if beat_intensity.is_finite() {
        beat_intensity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let class = classify_word(word);

    let mut p = WordVisualProps {
        scale: line_anim.scale * (1.0 + 0.08 * beat),
        color: line_anim.base_color,
        opacity: line_anim.opacity,
        x_offset: 0.0,
        y_offset: 0.0,
        glow_radius: 4.0 * beat,
        delay: word_index as f64 * WORD_DELAY_SEC,
        letter_spacing: 0.0,
        show_trail: false,
        trail_count: 0,
    };

    let repeats = appearance_count.saturating_sub(1) as f64;
    p.scale *= 1.0 + 0.1 * repeats;
    p.opacity = (p.opacity * (1.0 + 0.1 * repeats)).min(1.0);

    match class {
        WordClass::Impact => {
            p.scale = (p.scale * 1.15).max(1.15);
            p.color = p.color.mix(IMPACT_COLOR, 0.8);
            p.y_offset += 4.0;
            p.glow_radius += 4.0;
        }
        WordClass::Tender => {
            p.color = p.color.mix(TENDER_COLOR, 0.5).desaturate(0.3);
            p.y_offset -= 3.0;
            p.letter_spacing += 0.05;
        }
        WordClass::Motion => {
            let (dx, dy) = motion_direction(word);
            p.x_offset += dx;
            p.y_offset += dy;
            p.show_trail = true;
            p.trail_count = 3;
        }
        WordClass::Negation => {
            p.scale *= 0.85;
            p.opacity *= 0.7;
            p.y_offset -= 5.0;
        }
        WordClass::SelfRef => {
            p.glow_radius += 10.0;
        }
        WordClass::Transcendent => {
            p.color = p.color.mix(TRANSCENDENT_COLOR, 0.6);
            p.glow_radius += 14.0;
            p.y_offset -= 2.0;
        }
        WordClass::Other => {
            p.glow_radius += 3.0;
        }
        WordClass::Question => {
            p.letter_spacing += 0.03;
            p.opacity *= 0.9;
        }
        WordClass::Filler => {
            p.scale *= 0.9;
            p.opacity *= 0.85;
        }
        WordClass::Neutral => {}
    }

    if appearance_count >= 4 {
        p.color = Color::WHITE;
        p.scale = p.scale.max(1.3);
        p.glow_radius = p.glow_radius.max(12.0);
    }

    match phonetic_class(word) {
        PhoneticClass::Soft => p.opacity *= 0.95,
        PhoneticClass::Hard if class == WordClass::Impact => p.scale *= 1.05,
        _ => {}
    }

    if has_long_vowel(word) {
        p.scale *= 1.03;
        p.letter_spacing += 0.02;
    }

    p.scale = p.scale.clamp(0.5, 2.0);
    p.opacity = p.opacity.clamp(0.0, 1.0);
    p.glow_radius = p.glow_radius.max(0.0);
    p
}

#[cfg(test)]
#[path = "../../tests/unit/words/props.rs"]
mod tests;
