use crate::foundation::color::Color;
use crate::model::direction::PaletteRef;

const DEFAULT_PALETTE: [&str; 5] = ["#0a0a0f", "#f5f5f5", "#8b5cf6", "#ec4899", "#22d3ee"];

/// Named palettes: background, text, accent, secondary accent, highlight.
const NAMED_PALETTES: [(&str, [&str; 5]); 14] = [
    (
        "neon-green",
        ["#050a05", "#e8ffe8", "#39ff14", "#00c853", "#b2ff59"],
    ),
    (
        "midnight",
        ["#05060f", "#dfe6ff", "#3d5afe", "#7c4dff", "#18ffff"],
    ),
    (
        "sunset",
        ["#1a0b12", "#fff3e0", "#ff6f3c", "#ff3d68", "#ffc93c"],
    ),
    ("ocean", ["#021018", "#e0f7fa", "#0288d1", "#26c6da", "#80deea"]),
    ("ember", ["#120604", "#fff1e6", "#ff4500", "#ff8c00", "#ffd166"]),
    (
        "rose-gold",
        ["#1a1012", "#fff5f5", "#e8a598", "#b76e79", "#f7d1cd"],
    ),
    (
        "monochrome",
        ["#0b0b0b", "#f2f2f2", "#9e9e9e", "#616161", "#ffffff"],
    ),
    ("aurora", ["#030b14", "#eafff7", "#00e5a0", "#7b61ff", "#00b3ff"]),
    ("forest", ["#07120b", "#eef7ea", "#2e7d32", "#8bc34a", "#c5e1a5"]),
    ("candy", ["#160b1a", "#fff0fb", "#ff71ce", "#01cdfe", "#fffb96"]),
    ("storm", ["#0a0d12", "#e3e9f0", "#546e7a", "#90a4ae", "#ffee58"]),
    ("desert", ["#1a130a", "#fff8e7", "#d4a373", "#e76f51", "#f4a261"]),
    ("ice", ["#06101a", "#f0fbff", "#a5f3fc", "#7dd3fc", "#e0f2fe"]),
    ("vapor", ["#12061f", "#fdf0ff", "#ff00c8", "#00fff0", "#9d00ff"]),
];

fn parse_five(hex: &[&str; 5]) -> Vec<Color> {
    hex.iter()
        .map(|h| Color::from_hex_or(h, Color::WHITE))
        .collect()
}

/// Built-in default palette.
pub fn default_palette() -> Vec<Color> {
    parse_five(&DEFAULT_PALETTE)
}

/// Names of the built-in palettes, in table order.
pub fn palette_names() -> impl Iterator<Item = &'static str> {
    NAMED_PALETTES.iter().map(|(n, _)| *n)
}

/// Resolve a palette by name.
///
/// Unknown or missing names use `fallback` when it carries at least three colors, otherwise the
/// built-in default five colors.
pub fn resolve_palette(name: Option<&str>, fallback: &[Color]) -> Vec<Color> {
    let key = name.map(|n| n.trim().to_ascii_lowercase());
    if let Some(key) = key.as_deref()
        && let Some((_, hex)) = NAMED_PALETTES.iter().find(|(n, _)| *n == key)
    {
        return parse_five(hex);
    }
    if fallback.len() >= 3 {
        return fallback.to_vec();
    }
    default_palette()
}

/// Resolve a direction-document palette reference against a caller fallback.
pub fn resolve_palette_ref(palette: Option<&PaletteRef>, fallback: &[Color]) -> Vec<Color> {
    match palette {
        Some(PaletteRef::Named(name)) => resolve_palette(Some(name), fallback),
        Some(PaletteRef::Colors(colors)) if colors.len() >= 3 => colors.clone(),
        Some(PaletteRef::Colors(_)) | None => resolve_palette(None, fallback),
    }
}

/// Role accessors over a resolved palette (missing slots fall back to the default palette).
#[derive(Clone, Debug, PartialEq)]
pub struct PaletteRoles {
    /// Background base.
    pub background: Color,
    /// Primary text.
    pub text: Color,
    /// Main accent.
    pub accent: Color,
    /// Secondary accent.
    pub secondary: Color,
    /// Highlight.
    pub highlight: Color,
}

impl PaletteRoles {
    /// Map a palette's first five slots to roles.
    pub fn from_palette(palette: &[Color]) -> Self {
        let defaults = default_palette();
        let at = |i: usize| palette.get(i).copied().unwrap_or(defaults[i]);
        Self {
            background: at(0),
            text: at(1),
            accent: at(2),
            secondary: at(3),
            highlight: at(4),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/direction/palette.rs"]
mod tests;
