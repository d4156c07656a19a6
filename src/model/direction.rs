//! Cinematic direction document.
//!
//! The document is authored externally (usually generated) and every level is optional: a missing
//! array is empty, a missing scalar is `None`, unknown fields are ignored. Resolvers downstream
//! turn absent values into defaults, so a `CinematicDirection::default()` renders the neutral
//! treatment.

use crate::foundation::color::Color;
use crate::foundation::error::{LyricDanceError, LyricDanceResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Top-level direction document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CinematicDirection {
    /// Default typography key.
    pub typography: Option<String>,
    /// Default atmosphere key.
    pub atmosphere: Option<String>,
    /// Named palette or literal colors.
    pub palette: Option<PaletteRef>,
    /// Named emotional arc (slow-burn, surge, ...).
    pub emotional_arc: Option<String>,
    /// Default motion archetype.
    pub motion: Option<String>,
    /// Free-text scene description, mapped to a background system.
    pub scene_description: Option<String>,
    /// Explicit background system name (wins over the description).
    pub background_system: Option<String>,
    /// Typographic system identity (fracture, pressure, ...).
    pub system: Option<String>,
    /// Structural sections with optional progress ratios.
    pub sections: Vec<DirectionSection>,
    /// Per-line overrides.
    pub storyboard: Vec<LineDirection>,
    /// Per-word overrides.
    pub word_directives: Vec<WordDirective>,
    /// Authored chapters.
    pub chapters: Vec<Chapter>,
    /// Authored climax.
    pub climax: Option<Climax>,
    /// Authored tension curve.
    pub tension_curve: Vec<TensionStageDef>,
}

/// Palette reference: either a table name or literal colors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaletteRef {
    /// Named palette from the built-in table.
    Named(String),
    /// Literal color sequence.
    Colors(Vec<Color>),
}

/// A structural section of the direction document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectionSection {
    /// Authored index.
    pub section_index: Option<u32>,
    /// Free-text description.
    pub description: Option<String>,
    /// Motion archetype override.
    pub motion: Option<String>,
    /// Texture hint.
    pub texture: Option<String>,
    /// Atmosphere override.
    pub atmosphere: Option<String>,
    /// Start of the section as a fraction of the song.
    pub start_ratio: Option<f64>,
    /// End of the section as a fraction of the song.
    pub end_ratio: Option<f64>,
}

/// Per-line storyboard entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineDirection {
    /// Transcript line index this entry applies to.
    pub line_index: Option<usize>,
    /// Emphasized word in the line.
    pub hero_word: Option<String>,
    /// Entry animation name.
    pub entry_style: Option<String>,
    /// Exit animation name.
    pub exit_style: Option<String>,
    /// Typography override.
    pub typography: Option<String>,
}

/// Per-word directive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordDirective {
    /// Word this directive targets (matched after normalization).
    pub word: String,
    /// Emphasis level, nominally `1..=5`.
    pub emphasis_level: Option<f64>,
    /// Behavior keyword (pulse, float, shake, ...).
    pub behavior: Option<String>,
    /// Draw trailing ghost copies.
    pub ghost_trail: Option<bool>,
    /// Direction of the ghost trail (left, right, up, down).
    pub ghost_direction: Option<String>,
    /// Reveal letters one at a time.
    pub letter_sequence: Option<bool>,
    /// Free-text evolution rule for repeated appearances.
    pub evolution_rule: Option<String>,
    /// Elemental class override (fire, water, ...).
    pub elemental_class: Option<String>,
}

/// Authored chapter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Chapter {
    /// Chapter title (also the background dirty-check key).
    pub title: String,
    /// Start as a fraction of the song.
    pub start_ratio: f64,
    /// End as a fraction of the song.
    pub end_ratio: f64,
    /// Emotional intensity in `[0, 1]`.
    pub emotional_intensity: Option<f64>,
    /// Particle directive (ambient, embers, rain, ...).
    pub particle_directive: Option<String>,
    /// Light directive (steady, pulse, flicker, ...).
    pub light_directive: Option<String>,
    /// Background directive (free text).
    pub background_directive: Option<String>,
    /// Dominant chapter color.
    pub dominant_color: Option<Color>,
    /// Typography shift for the chapter.
    pub typography_shift: Option<String>,
}

impl Chapter {
    /// Return `true` when `progress` falls in `[start_ratio, end_ratio)`.
    pub fn contains(&self, progress: f64) -> bool {
        self.start_ratio <= progress && progress < self.end_ratio
    }
}

/// Authored climax.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Climax {
    /// Song progress where the climax peaks.
    pub time_ratio: f64,
    /// Transcript text that triggers the climax.
    pub trigger_line: Option<String>,
    /// Particle density multiplier at the climax.
    pub max_particle_density: Option<f64>,
}

/// Authored tension stage; any numeric hint may be missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TensionStageDef {
    /// Stage name (Setup, Build, Peak, Release).
    pub stage: Option<String>,
    /// Start as a fraction of the song.
    pub start_ratio: Option<f64>,
    /// End as a fraction of the song.
    pub end_ratio: Option<f64>,
    /// Motion intensity hint.
    pub motion_intensity: Option<f64>,
    /// Particle density hint.
    pub particle_density: Option<f64>,
    /// Light brightness hint.
    pub light_brightness: Option<f64>,
    /// Camera movement name.
    pub camera_movement: Option<String>,
    /// Typography aggression hint.
    pub typography_aggression: Option<f64>,
}

impl CinematicDirection {
    /// Parse a direction document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LyricDanceResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| LyricDanceError::serde(format!("parse cinematic direction JSON: {e}")))
    }

    /// Parse a direction document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LyricDanceResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LyricDanceError::validation(format!(
                "open cinematic direction JSON '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Stable fingerprint of the document, used to key render-side memos.
    pub fn fingerprint(&self) -> u64 {
        match serde_json::to_vec(self) {
            Ok(bytes) => xxhash_rust::xxh3::xxh3_64(&bytes),
            Err(_) => 0,
        }
    }

    /// Return `true` when the document carries no authored content at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/direction.rs"]
mod tests;
