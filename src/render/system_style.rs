use crate::direction::resolvers::TextTransform;
use crate::render::canvas::{Canvas2d, FontSpec};
use serde::Serialize;

/// Smallest font size the fitter returns.
pub const MIN_FONT_PX: f64 = 12.0;
/// Share of the canvas width a fitted line may occupy.
pub const FIT_WIDTH_RATIO: f64 = 0.8;
const REFERENCE_PX: f64 = 100.0;

/// How lines are arranged on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Words stacked vertically.
    Stacked,
    /// One centered line.
    Centered,
    /// Words scattered around the center.
    Scattered,
    /// Words around a circle.
    Circular,
    /// Left-aligned editorial block.
    Editorial,
}

/// How text color is derived from the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Text against the palette background at full contrast.
    Contrast,
    /// Single text color.
    Mono,
    /// Muted text.
    Soft,
    /// Warm accent mix.
    Heat,
    /// Accent to secondary gradient.
    Gradient,
    /// Dark ink on light.
    Ink,
    /// Semi-transparent text.
    Translucent,
}

/// Complete typographic identity of a named system.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SystemStyle {
    /// System name.
    pub name: &'static str,
    /// Font family.
    pub font: &'static str,
    /// CSS-style weight.
    pub weight: u16,
    /// Extra spacing per character in px.
    pub letter_spacing: f64,
    /// Case transform.
    pub text_transform: TextTransform,
    /// Line arrangement.
    pub layout: LayoutMode,
    /// Color derivation.
    pub color_mode: ColorMode,
    /// Italic glyphs.
    pub italics: bool,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
}

const fn style(
    name: &'static str,
    font: &'static str,
    weight: u16,
    letter_spacing: f64,
    text_transform: TextTransform,
    layout: LayoutMode,
    color_mode: ColorMode,
    italics: bool,
    line_height: f64,
) -> SystemStyle {
    SystemStyle {
        name,
        font,
        weight,
        letter_spacing,
        text_transform,
        layout,
        color_mode,
        italics,
        line_height,
    }
}

const SYSTEMS: [SystemStyle; 7] = [
    style(
        "fracture",
        "Archivo Black",
        900,
        2.0,
        TextTransform::Uppercase,
        LayoutMode::Stacked,
        ColorMode::Contrast,
        false,
        0.95,
    ),
    style(
        "pressure",
        "Oswald",
        700,
        1.0,
        TextTransform::Uppercase,
        LayoutMode::Centered,
        ColorMode::Mono,
        false,
        1.0,
    ),
    style(
        "breath",
        "Cormorant Garamond",
        300,
        4.0,
        TextTransform::None,
        LayoutMode::Centered,
        ColorMode::Soft,
        true,
        1.3,
    ),
    style(
        "combustion",
        "Bebas Neue",
        400,
        3.0,
        TextTransform::Uppercase,
        LayoutMode::Scattered,
        ColorMode::Heat,
        false,
        0.9,
    ),
    style(
        "orbit",
        "Space Grotesk",
        500,
        6.0,
        TextTransform::Lowercase,
        LayoutMode::Circular,
        ColorMode::Gradient,
        false,
        1.1,
    ),
    style(
        "paper",
        "Playfair Display",
        400,
        0.5,
        TextTransform::None,
        LayoutMode::Editorial,
        ColorMode::Ink,
        true,
        1.25,
    ),
    style(
        "glass",
        "Inter",
        200,
        3.0,
        TextTransform::None,
        LayoutMode::Centered,
        ColorMode::Translucent,
        false,
        1.2,
    ),
];

/// Names of the built-in systems.
pub fn system_names() -> impl Iterator<Item = &'static str> {
    SYSTEMS.iter().map(|s| s.name)
}

/// Style of a named system; unknown or missing names use `fracture`.
pub fn system_style(name: Option<&str>) -> SystemStyle {
    let key = name.map(|n| n.trim().to_ascii_lowercase());
    key.as_deref()
        .and_then(|k| SYSTEMS.iter().find(|s| s.name == k))
        .unwrap_or(&SYSTEMS[0])
        .clone()
}

/// Largest font size at which `text` fills 80% of `canvas_width`.
///
/// Measures once at 100 px and solves the linear relation
/// `measured × size / 100 + chars × letter_spacing = 0.8 × width`. Never below 12 px.
pub fn compute_fit_font_size(
    canvas: &mut dyn Canvas2d,
    text: &str,
    canvas_width: f64,
    style: &SystemStyle,
) -> f64 {
    let text = style.text_transform.apply(text);
    if text.is_empty() || !canvas_width.is_finite() || canvas_width <= 0.0 {
        return MIN_FONT_PX;
    }

    canvas.save();
    canvas.set_font(FontSpec::new(style.font, REFERENCE_PX).with_weight(style.weight));
    let measured = canvas.measure_text(&text);
    canvas.restore();
    if !measured.is_finite() || measured <= 0.0 {
        return MIN_FONT_PX;
    }

    let chars = text.chars().count() as f64;
    let available = FIT_WIDTH_RATIO * canvas_width - chars * style.letter_spacing;
    if !available.is_finite() || available <= 0.0 {
        return MIN_FONT_PX;
    }
    (available * REFERENCE_PX / measured).max(MIN_FONT_PX)
}

#[cfg(test)]
#[path = "../../tests/unit/render/system_style.rs"]
mod tests;
