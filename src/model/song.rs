use crate::analysis::signature::SongSignature;
use crate::foundation::color::Color;
use crate::foundation::error::{LyricDanceError, LyricDanceResult};
use crate::model::beat::BeatGrid;
use crate::model::direction::CinematicDirection;
use crate::model::lyrics::{LyricLine, sort_lines};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Everything the renderer needs about one song, prepared ahead of playback.
///
/// This is the JSON-facing boundary object. Analysis collaborators fill `beat_grid` and
/// `signature`; the direction collaborator fills `direction` (which may be empty).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInput {
    /// Song length in seconds.
    pub duration_sec: f64,
    /// Timed transcript, ordered by start.
    #[serde(default)]
    pub lines: Vec<LyricLine>,
    /// Beat grid.
    #[serde(default)]
    pub beat_grid: BeatGrid,
    /// Energy/spectral signature (empty when audio was not analysed).
    #[serde(default)]
    pub signature: SongSignature,
    /// Cinematic direction document.
    #[serde(default)]
    pub direction: CinematicDirection,
    /// Caller palette used when the direction names none.
    #[serde(default)]
    pub palette: Vec<Color>,
    /// Typographic system name (fracture, pressure, ...).
    #[serde(default)]
    pub system: Option<String>,
}

impl SongInput {
    /// Minimal input: duration, lines and beats with an empty direction.
    pub fn new(duration_sec: f64, lines: Vec<LyricLine>, beat_grid: BeatGrid) -> Self {
        let mut out = Self {
            duration_sec,
            lines,
            beat_grid,
            signature: SongSignature::default(),
            direction: CinematicDirection::default(),
            palette: Vec::new(),
            system: None,
        };
        sort_lines(&mut out.lines);
        out
    }

    /// Parse a song bundle from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LyricDanceResult<Self> {
        let mut song: Self = serde_json::from_reader(r)
            .map_err(|e| LyricDanceError::serde(format!("parse song JSON: {e}")))?;
        sort_lines(&mut song.lines);
        song.validate()?;
        Ok(song)
    }

    /// Parse a song bundle from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LyricDanceResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LyricDanceError::validation(format!("open song JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check boundary invariants.
    pub fn validate(&self) -> LyricDanceResult<()> {
        if !self.duration_sec.is_finite() || self.duration_sec < 0.0 {
            return Err(LyricDanceError::validation(
                "song durationSec must be finite and >= 0",
            ));
        }
        for (i, l) in self.lines.iter().enumerate() {
            if !(l.start.is_finite() && l.end.is_finite()) {
                return Err(LyricDanceError::validation(format!(
                    "lyric line {i} has non-finite timing"
                )));
            }
            if l.end < l.start {
                return Err(LyricDanceError::validation(format!(
                    "lyric line {i} ends before it starts"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/song.rs"]
mod tests;
