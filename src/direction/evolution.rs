//! Evolution rules: how a repeated word changes with each appearance.
//!
//! Rules are parsed once from directive text into an [`EvolutionRule`]. Resolving a rule is a
//! pure function of the rule, the appearance count and the palette, so every result can be
//! memoized; the only drawing happens in [`draw_evolution_overlay`].

use crate::foundation::color::Color;
use crate::foundation::core::Point;
use crate::render::canvas::{Canvas2d, Paint};
use crate::words::history::WordHistory;
use serde::Serialize;

/// Appearance count after which `Consume` takes over the word.
pub const CONSUME_THRESHOLD: u32 = 8;

/// Parsed evolution rule.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "rules", rename_all = "snake_case")]
pub enum EvolutionRule {
    /// Scale grows with each repeat.
    Grow,
    /// Glow radius grows with each repeat.
    Glow,
    /// Word sinks lower with each repeat.
    Sink,
    /// Word fades with each repeat.
    Fade,
    /// Scale grows and a ring is drawn around the word.
    ExpandAura,
    /// Past [`CONSUME_THRESHOLD`] repeats the word dominates the frame.
    Consume,
    /// Fill cycles through the palette.
    ColorShift,
    /// Several rules applied in order.
    Compound(Vec<EvolutionRule>),
    /// No evolution.
    None,
}

const KEYWORDS: [(&[&str], EvolutionRule); 7] = [
    (&["larger", "bigger", "grow"], EvolutionRule::Grow),
    (&["glow", "luminous", "bright"], EvolutionRule::Glow),
    (&["heavier", "sink"], EvolutionRule::Sink),
    (&["fade", "recede"], EvolutionRule::Fade),
    (&["expand", "aura"], EvolutionRule::ExpandAura),
    (&["consum"], EvolutionRule::Consume),
    (&["color", "colour", "shift"], EvolutionRule::ColorShift),
];

impl EvolutionRule {
    /// Classify free directive text. Total: unrecognized text is [`EvolutionRule::None`].
    pub fn parse(text: &str) -> Self {
        let t = text.to_lowercase();
        let mut rules: Vec<Self> = KEYWORDS
            .iter()
            .filter(|(kws, _)| kws.iter().any(|k| t.contains(k)))
            .map(|(_, rule)| rule.clone())
            .collect();
        match rules.len() {
            0 => Self::None,
            1 => rules.remove(0),
            _ => Self::Compound(rules),
        }
    }

    /// True for rules that draw an overlay at some count.
    pub fn has_overlay(&self) -> bool {
        match self {
            Self::ExpandAura | Self::Consume => true,
            Self::Compound(rules) => rules.iter().any(Self::has_overlay),
            _ => false,
        }
    }
}

/// Ring drawn around an evolved word.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EvolutionOverlay {
    /// Ring radius as a multiple of the font size.
    pub radius_em: f64,
    /// Ring opacity.
    pub alpha: f64,
    /// Ring stroke width in px.
    pub line_width: f64,
}

/// Resolved evolution adjustments for one word.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EvolutionProps {
    /// Scale multiplier in `[1, 2]`.
    pub scale_multiplier: f64,
    /// Glow radius in `[0, 40]` px.
    pub glow_radius: f64,
    /// Opacity multiplier in `[0.2, 1]`.
    pub opacity_multiplier: f64,
    /// Downward offset in `[0, 20]` px.
    pub y_offset: f64,
    /// Fill override.
    pub color_override: Option<Color>,
    /// Ring to draw, if any.
    pub overlay: Option<EvolutionOverlay>,
}

impl Default for EvolutionProps {
    fn default() -> Self {
        Self {
            scale_multiplier: 1.0,
            glow_radius: 0.0,
            opacity_multiplier: 1.0,
            y_offset: 0.0,
            color_override: None,
            overlay: None,
        }
    }
}

fn apply(rule: &EvolutionRule, count: u32, palette: &[Color], p: &mut EvolutionProps) {
    let c = f64::from(count);
    match rule {
        EvolutionRule::Grow => p.scale_multiplier *= (1.0 + 0.1 * c).min(1.6),
        EvolutionRule::Glow => p.glow_radius += (5.0 * c).min(35.0),
        EvolutionRule::Sink => p.y_offset += (3.0 * c).min(20.0),
        EvolutionRule::Fade => p.opacity_multiplier *= (1.0 - 0.1 * c).max(0.3),
        EvolutionRule::ExpandAura => {
            p.scale_multiplier += 0.05 * c;
            if count > 0 {
                p.overlay = Some(EvolutionOverlay {
                    radius_em: 1.0 + 0.1 * c.min(10.0),
                    alpha: 0.25,
                    line_width: 2.0,
                });
            }
        }
        EvolutionRule::Consume => {
            if count > CONSUME_THRESHOLD {
                p.scale_multiplier = p.scale_multiplier.max(1.5);
                p.glow_radius = p.glow_radius.max(30.0);
                p.overlay = Some(EvolutionOverlay {
                    radius_em: 2.5,
                    alpha: 0.35,
                    line_width: 4.0,
                });
            }
        }
        EvolutionRule::ColorShift => {
            if !palette.is_empty() {
                p.color_override = Some(palette[count as usize % palette.len()]);
            }
        }
        EvolutionRule::Compound(rules) => {
            for r in rules {
                apply(r, count, palette, p);
            }
        }
        EvolutionRule::None => {}
    }
}

fn clamp_or(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_finite() { v.clamp(lo, hi) } else { lo }
}

/// Resolve a rule against a word's history. `None` history means the word is new.
pub fn resolve_evolution(
    rule: &EvolutionRule,
    history: Option<&WordHistory>,
    palette: &[Color],
) -> EvolutionProps {
    resolve_evolution_for_count(rule, history.map_or(0, |h| h.count), palette)
}

/// Resolve a rule for an appearance count. All outputs are clamped.
pub fn resolve_evolution_for_count(
    rule: &EvolutionRule,
    count: u32,
    palette: &[Color],
) -> EvolutionProps {
    let mut p = EvolutionProps::default();
    apply(rule, count, palette, &mut p);
    p.scale_multiplier = clamp_or(p.scale_multiplier, 1.0, 2.0);
    p.glow_radius = clamp_or(p.glow_radius, 0.0, 40.0);
    p.opacity_multiplier = clamp_or(p.opacity_multiplier, 0.2, 1.0);
    p.y_offset = clamp_or(p.y_offset, 0.0, 20.0);
    p
}

/// Draw the props' overlay ring centered on `(x, y)`. No-op without an overlay.
pub fn draw_evolution_overlay(
    canvas: &mut dyn Canvas2d,
    props: &EvolutionProps,
    x: f64,
    y: f64,
    font_size: f64,
) {
    let Some(overlay) = props.overlay else {
        return;
    };
    let radius = overlay.radius_em * font_size.max(0.0);
    if radius <= 0.0 {
        return;
    }
    let color = props.color_override.unwrap_or(Color::WHITE);
    let ring = kurbo::Circle::new(Point::new(x, y), radius);
    canvas.save();
    canvas.set_global_alpha(overlay.alpha);
    canvas.set_stroke(Paint::Solid(color), overlay.line_width);
    canvas.stroke_path(&kurbo::Shape::to_path(&ring, 0.1));
    canvas.restore();
}

#[cfg(test)]
#[path = "../../tests/unit/direction/evolution.rs"]
mod tests;
