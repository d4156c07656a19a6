//! Pure lookups from direction tokens to rendering parameters.
//!
//! Every function here is total: unknown or missing keys resolve to a documented default.

use crate::foundation::core::clamp_progress;
use crate::model::direction::{DirectionSection, WordDirective};
use crate::words::classify::normalize_token;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Case transform applied before drawing text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    /// Leave text as written.
    #[default]
    None,
    /// Upper-case.
    Uppercase,
    /// Lower-case.
    Lowercase,
}

impl TextTransform {
    /// Apply the transform.
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::None => text.to_owned(),
            Self::Uppercase => text.to_uppercase(),
            Self::Lowercase => text.to_lowercase(),
        }
    }
}

/// Concrete typography for a typography key.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TypographyProfile {
    /// Font family name.
    pub font_family: &'static str,
    /// CSS-style weight (100..900).
    pub font_weight: u16,
    /// Case transform.
    pub text_transform: TextTransform,
    /// Letter spacing in em.
    pub letter_spacing: f64,
    /// Short personality tag.
    pub personality: &'static str,
}

const DEFAULT_TYPOGRAPHY: &str = "clean-modern";

const TYPOGRAPHY_TABLE: [(&str, TypographyProfile); 8] = [
    (
        "bold-impact",
        TypographyProfile {
            font_family: "Oswald",
            font_weight: 700,
            text_transform: TextTransform::Uppercase,
            letter_spacing: 0.05,
            personality: "loud",
        },
    ),
    (
        "clean-modern",
        TypographyProfile {
            font_family: "Inter",
            font_weight: 500,
            text_transform: TextTransform::None,
            letter_spacing: 0.0,
            personality: "neutral",
        },
    ),
    (
        "elegant-serif",
        TypographyProfile {
            font_family: "Playfair Display",
            font_weight: 400,
            text_transform: TextTransform::None,
            letter_spacing: 0.02,
            personality: "romantic",
        },
    ),
    (
        "raw-handwritten",
        TypographyProfile {
            font_family: "Permanent Marker",
            font_weight: 400,
            text_transform: TextTransform::None,
            letter_spacing: 0.0,
            personality: "raw",
        },
    ),
    (
        "tech-mono",
        TypographyProfile {
            font_family: "JetBrains Mono",
            font_weight: 500,
            text_transform: TextTransform::Uppercase,
            letter_spacing: 0.08,
            personality: "cold",
        },
    ),
    (
        "editorial-light",
        TypographyProfile {
            font_family: "Cormorant Garamond",
            font_weight: 300,
            text_transform: TextTransform::None,
            letter_spacing: 0.04,
            personality: "reflective",
        },
    ),
    (
        "brutalist",
        TypographyProfile {
            font_family: "Archivo Black",
            font_weight: 900,
            text_transform: TextTransform::Uppercase,
            letter_spacing: -0.02,
            personality: "aggressive",
        },
    ),
    (
        "soft-rounded",
        TypographyProfile {
            font_family: "Nunito",
            font_weight: 600,
            text_transform: TextTransform::Lowercase,
            letter_spacing: 0.01,
            personality: "tender",
        },
    ),
];

fn table_key(key: Option<&str>) -> Option<String> {
    key.map(|k| k.trim().to_ascii_lowercase().replace([' ', '_'], "-"))
        .filter(|k| !k.is_empty())
}

/// Resolve a typography key; unknown keys use `clean-modern`.
pub fn resolve_typography(key: Option<&str>) -> TypographyProfile {
    let key = table_key(key);
    let lookup = |k: &str| TYPOGRAPHY_TABLE.iter().find(|(n, _)| *n == k);
    key.as_deref()
        .and_then(lookup)
        .or_else(|| lookup(DEFAULT_TYPOGRAPHY))
        .map(|(_, p)| p.clone())
        .unwrap_or(TYPOGRAPHY_TABLE[1].1.clone())
}

/// Physical feel of a motion archetype.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MotionPhysics {
    /// Visual heat (warmth and agitation).
    pub heat: f64,
    /// How strongly motion reacts to beats.
    pub beat_response: f64,
    /// Inertia of moving elements.
    pub weight: f64,
    /// Randomness of motion.
    pub chaos: f64,
    /// Particle density multiplier hint.
    pub particle_density: f64,
}

const DEFAULT_MOTION: &str = "fluid";

const MOTION_TABLE: [(&str, MotionPhysics); 5] = [
    (
        "fluid",
        MotionPhysics {
            heat: 0.4,
            beat_response: 0.5,
            weight: 0.3,
            chaos: 0.15,
            particle_density: 1.0,
        },
    ),
    (
        "elastic",
        MotionPhysics {
            heat: 0.55,
            beat_response: 0.8,
            weight: 0.25,
            chaos: 0.3,
            particle_density: 1.1,
        },
    ),
    (
        "weighted",
        MotionPhysics {
            heat: 0.5,
            beat_response: 0.4,
            weight: 0.85,
            chaos: 0.1,
            particle_density: 0.8,
        },
    ),
    (
        "glitch",
        MotionPhysics {
            heat: 0.75,
            beat_response: 0.9,
            weight: 0.4,
            chaos: 0.85,
            particle_density: 1.3,
        },
    ),
    (
        "drift",
        MotionPhysics {
            heat: 0.2,
            beat_response: 0.25,
            weight: 0.15,
            chaos: 0.1,
            particle_density: 0.7,
        },
    ),
];

/// Resolve a motion archetype; unknown keys use `fluid`.
pub fn resolve_motion_physics(key: Option<&str>) -> MotionPhysics {
    let key = table_key(key);
    let lookup = |k: &str| MOTION_TABLE.iter().find(|(n, _)| *n == k).map(|(_, m)| *m);
    key.as_deref()
        .and_then(lookup)
        .or_else(|| lookup(DEFAULT_MOTION))
        .unwrap_or(MOTION_TABLE[0].1)
}

/// Procedural background system identities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundSystem {
    /// Neutral gradient.
    #[default]
    Default,
    /// Warm flickering glow.
    Fire,
    /// Rolling blue bands.
    Ocean,
    /// Dark sky with flashes.
    Storm,
    /// Drifting color curtains.
    Aurora,
    /// Neon grid glow.
    Urban,
    /// Warm vignette.
    Intimate,
    /// Near-black.
    Void,
}

impl BackgroundSystem {
    /// Stable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Fire => "fire",
            Self::Ocean => "ocean",
            Self::Storm => "storm",
            Self::Aurora => "aurora",
            Self::Urban => "urban",
            Self::Intimate => "intimate",
            Self::Void => "void",
        }
    }

    /// Parse a system name (`None` for unknown names).
    pub fn parse(name: &str) -> Option<Self> {
        let n = name.trim().to_ascii_lowercase();
        [
            Self::Default,
            Self::Fire,
            Self::Ocean,
            Self::Storm,
            Self::Aurora,
            Self::Urban,
            Self::Intimate,
            Self::Void,
        ]
        .into_iter()
        .find(|s| s.name() == n)
    }
}

const ATMOSPHERE_TABLE: [(&str, BackgroundSystem); 15] = [
    ("fiery", BackgroundSystem::Fire),
    ("burning", BackgroundSystem::Fire),
    ("oceanic", BackgroundSystem::Ocean),
    ("underwater", BackgroundSystem::Ocean),
    ("stormy", BackgroundSystem::Storm),
    ("electric", BackgroundSystem::Storm),
    ("dreamy", BackgroundSystem::Aurora),
    ("cosmic", BackgroundSystem::Aurora),
    ("urban", BackgroundSystem::Urban),
    ("neon", BackgroundSystem::Urban),
    ("intimate", BackgroundSystem::Intimate),
    ("candlelit", BackgroundSystem::Intimate),
    ("foggy", BackgroundSystem::Void),
    ("dark", BackgroundSystem::Void),
    ("minimal", BackgroundSystem::Void),
];

/// Resolve an atmosphere key to a background system; unknown keys use `Default`.
pub fn resolve_atmosphere_system(key: Option<&str>) -> BackgroundSystem {
    let Some(key) = table_key(key) else {
        return BackgroundSystem::Default;
    };
    ATMOSPHERE_TABLE
        .iter()
        .find(|(n, _)| *n == key)
        .map(|(_, s)| *s)
        .or_else(|| BackgroundSystem::parse(&key))
        .unwrap_or_default()
}

const BACKGROUND_KEYWORDS: [(BackgroundSystem, &[&str]); 7] = [
    (BackgroundSystem::Fire, &["fire", "burn", "flame", "blaze"]),
    (BackgroundSystem::Ocean, &["ocean", "water", "wave", "sea"]),
    (BackgroundSystem::Storm, &["storm", "lightning", "thunder"]),
    (BackgroundSystem::Aurora, &["aurora", "cosmic", "space", "stars"]),
    (BackgroundSystem::Urban, &["city", "urban", "neon", "street"]),
    (BackgroundSystem::Intimate, &["intimate", "candle", "cozy", "warm room"]),
    (BackgroundSystem::Void, &["void", "dark", "empty"]),
];

/// Map a free-text scene description to a background system.
///
/// Categories are scanned in a fixed priority order; the first category with any keyword
/// contained in the lowercased description wins.
pub fn map_background_system(description: &str) -> BackgroundSystem {
    let d = description.to_lowercase();
    BACKGROUND_KEYWORDS
        .iter()
        .find(|(_, kws)| kws.iter().any(|k| d.contains(k)))
        .map(|(s, _)| *s)
        .unwrap_or_default()
}

/// Fill in section ratios.
///
/// No sections yields three equal thirds (Opening / Middle / Climax). Otherwise each missing or
/// invalid ratio pair is replaced by the even split `i/n .. (i+1)/n`.
pub fn enrich_sections(sections: &[DirectionSection]) -> Vec<DirectionSection> {
    if sections.is_empty() {
        return ["Opening", "Middle", "Climax"]
            .iter()
            .enumerate()
            .map(|(i, name)| DirectionSection {
                section_index: Some(i as u32),
                description: Some((*name).to_owned()),
                start_ratio: Some(i as f64 / 3.0),
                end_ratio: Some(if i == 2 { 1.0 } else { (i + 1) as f64 / 3.0 }),
                ..Default::default()
            })
            .collect();
    }

    let n = sections.len() as f64;
    sections
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let even_start = i as f64 / n;
            let even_end = if i + 1 == sections.len() {
                1.0
            } else {
                (i + 1) as f64 / n
            };
            let start = s
                .start_ratio
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(0.0, 1.0))
                .unwrap_or(even_start);
            let end = s
                .end_ratio
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(0.0, 1.0))
                .unwrap_or(even_end);
            let (start, end) = if end > start {
                (start, end)
            } else {
                (even_start, even_end)
            };
            DirectionSection {
                section_index: s.section_index.or(Some(i as u32)),
                start_ratio: Some(start),
                end_ratio: Some(end),
                ..s.clone()
            }
        })
        .collect()
}

pub(crate) fn section_bounds(sections: &[DirectionSection], i: usize) -> (f64, f64) {
    let n = sections.len().max(1) as f64;
    let s = &sections[i];
    (
        s.start_ratio.unwrap_or(i as f64 / n),
        s.end_ratio.unwrap_or((i + 1) as f64 / n),
    )
}

/// Index of the section whose `[start, end)` contains `progress`.
///
/// Progress is clamped to `[0, 1]`; when nothing matches (including `progress == 1`) the last
/// section is returned. `None` only for an empty slice.
pub fn find_section_index_by_progress(
    sections: &[DirectionSection],
    progress: f64,
) -> Option<usize> {
    if sections.is_empty() {
        return None;
    }
    let p = clamp_progress(progress);
    (0..sections.len())
        .find(|&i| {
            let (start, end) = section_bounds(sections, i);
            start <= p && p < end
        })
        .or(Some(sections.len() - 1))
}

/// Section containing `progress` (see [`find_section_index_by_progress`]).
pub fn find_section_by_progress(
    sections: &[DirectionSection],
    progress: f64,
) -> Option<&DirectionSection> {
    find_section_index_by_progress(sections, progress).map(|i| &sections[i])
}

/// Word directives keyed by normalized word.
pub type WordDirectiveMap = HashMap<String, WordDirective>;

/// Index word directives by normalized word (later entries win on duplicate keys).
pub fn build_word_directive_map(directives: &[WordDirective]) -> WordDirectiveMap {
    directives
        .iter()
        .filter_map(|d| {
            let key = normalize_token(&d.word);
            (!key.is_empty()).then(|| (key, d.clone()))
        })
        .collect()
}

/// Exact lookup after normalization. `"fire"` never matches `"firelight"`.
pub fn find_word_directive<'a>(map: &'a WordDirectiveMap, word: &str) -> Option<&'a WordDirective> {
    let key = normalize_token(word);
    if key.is_empty() {
        return None;
    }
    map.get(&key)
}

/// One stage of an emotional arc.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TensionStage {
    /// Stage name (Setup, Build, Peak, Release).
    pub stage: String,
    /// Start as a fraction of the song.
    pub start_ratio: f64,
    /// End as a fraction of the song.
    pub end_ratio: f64,
    /// Motion intensity hint in `[0, 1]`.
    pub motion_intensity: f64,
    /// Particle density multiplier hint.
    pub particle_density: f64,
    /// Light brightness in `[0, 1]`.
    pub light_brightness: f64,
    /// Camera movement name.
    pub camera_movement: String,
    /// Typography aggression in `[0, 1]`.
    pub typography_aggression: f64,
}

type StageRow = (&'static str, f64, f64, f64, f64, f64, &'static str, f64);

const SLOW_BURN: [StageRow; 4] = [
    ("Setup", 0.0, 0.3, 0.2, 0.3, 0.35, "drift", 0.2),
    ("Build", 0.3, 0.65, 0.45, 0.55, 0.5, "push-in", 0.45),
    ("Peak", 0.65, 0.85, 0.9, 1.0, 0.85, "shake", 0.85),
    ("Release", 0.85, 1.0, 0.3, 0.35, 0.4, "pull-back", 0.25),
];
const SURGE: [StageRow; 4] = [
    ("Setup", 0.0, 0.15, 0.35, 0.4, 0.45, "drift", 0.3),
    ("Build", 0.15, 0.4, 0.65, 0.7, 0.65, "push-in", 0.6),
    ("Peak", 0.4, 0.8, 1.0, 1.0, 0.95, "shake", 0.95),
    ("Release", 0.8, 1.0, 0.5, 0.5, 0.55, "pull-back", 0.4),
];
const COLLAPSE: [StageRow; 4] = [
    ("Setup", 0.0, 0.08, 0.7, 0.8, 0.8, "push-in", 0.7),
    ("Peak", 0.08, 0.25, 1.0, 1.0, 0.95, "shake", 1.0),
    ("Release", 0.25, 0.7, 0.45, 0.45, 0.5, "pull-back", 0.35),
    ("Build", 0.7, 1.0, 0.2, 0.25, 0.3, "drift", 0.15),
];
const DAWN: [StageRow; 4] = [
    ("Setup", 0.0, 0.4, 0.15, 0.2, 0.2, "drift", 0.15),
    ("Build", 0.4, 0.75, 0.4, 0.45, 0.5, "push-in", 0.35),
    ("Peak", 0.75, 0.92, 0.8, 0.85, 1.0, "rise", 0.7),
    ("Release", 0.92, 1.0, 0.5, 0.5, 0.8, "hold", 0.4),
];
const FLATLINE: [StageRow; 4] = [
    ("Setup", 0.0, 0.25, 0.3, 0.3, 0.4, "static", 0.3),
    ("Build", 0.25, 0.5, 0.35, 0.35, 0.45, "static", 0.35),
    ("Peak", 0.5, 0.75, 0.4, 0.4, 0.5, "drift", 0.4),
    ("Release", 0.75, 1.0, 0.3, 0.3, 0.4, "static", 0.3),
];
const ERUPTION: [StageRow; 4] = [
    ("Setup", 0.0, 0.2, 0.3, 0.35, 0.4, "drift", 0.3),
    ("Build", 0.2, 0.5, 0.6, 0.7, 0.65, "push-in", 0.6),
    ("Peak", 0.5, 0.75, 1.0, 1.0, 1.0, "shake", 1.0),
    ("Release", 0.75, 1.0, 0.55, 0.6, 0.6, "pull-back", 0.45),
];

fn rows_for_arc(arc: Option<&str>) -> &'static [StageRow; 4] {
    match table_key(arc).as_deref() {
        Some("surge") => &SURGE,
        Some("collapse") => &COLLAPSE,
        Some("dawn") => &DAWN,
        Some("flatline") => &FLATLINE,
        Some("eruption") => &ERUPTION,
        _ => &SLOW_BURN,
    }
}

/// Tension curve for a named emotional arc; unknown arcs use `slow-burn`.
///
/// Stages are contiguous and cover `[0, 1]`.
pub fn derive_tension_curve(arc: Option<&str>) -> Vec<TensionStage> {
    rows_for_arc(arc)
        .iter()
        .map(
            |&(stage, start, end, motion, particles, light, camera, aggression)| TensionStage {
                stage: stage.to_owned(),
                start_ratio: start,
                end_ratio: end,
                motion_intensity: motion,
                particle_density: particles,
                light_brightness: light,
                camera_movement: camera.to_owned(),
                typography_aggression: aggression,
            },
        )
        .collect()
}

/// Stage containing `progress` (clamped); falls back to the last stage.
pub fn get_tension_stage_for_progress(
    curve: &[TensionStage],
    progress: f64,
) -> Option<&TensionStage> {
    let p = clamp_progress(progress);
    curve
        .iter()
        .find(|s| s.start_ratio <= p && p < s.end_ratio)
        .or_else(|| curve.last())
}

/// Song progress at which an arc peaks.
pub fn derive_climax_ratio(arc: Option<&str>) -> f64 {
    match table_key(arc).as_deref() {
        Some("eruption") => 0.6,
        Some("collapse") => 0.15,
        Some("dawn") => 0.85,
        _ => 0.65,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/direction/resolvers.rs"]
mod tests;
