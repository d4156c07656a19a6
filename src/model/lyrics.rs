use serde::{Deserialize, Serialize};

/// Vocal role of a transcript line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTag {
    /// Lead vocal.
    Main,
    /// Background / ad-lib vocal.
    Adlib,
}

/// One timed transcript line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LyricLine {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Line text as transcribed.
    pub text: String,
    /// Optional vocal role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<LineTag>,
}

impl LyricLine {
    /// Construct a main-vocal line.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            tag: None,
        }
    }

    /// Whitespace-separated words of the line (punctuation kept).
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }

    /// Line duration in seconds (never negative).
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Return `true` when the line is active at `t` (`start <= t < end`).
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// Return `true` when the line overlaps the half-open window `[a, b)`.
    pub fn overlaps(&self, a: f64, b: f64) -> bool {
        self.start < b && self.end > a
    }

    /// Return `true` for ad-lib lines.
    pub fn is_adlib(&self) -> bool {
        matches!(self.tag, Some(LineTag::Adlib))
    }
}

/// Find the line active at `t` in a start-ordered slice.
///
/// Binary search on `start` bounds the candidates; every earlier main line is still checked, so
/// a long line stays active across any number of ad-libs inside it. Overlapping main lines
/// resolve to the latest-starting one.
pub fn active_line_index(lines: &[LyricLine], t: f64) -> Option<usize> {
    if lines.is_empty() || !t.is_finite() {
        return None;
    }
    let after = lines.partition_point(|l| l.start <= t);
    lines[..after]
        .iter()
        .rposition(|l| l.contains(t) && !l.is_adlib())
}

/// Progress in `[0, 1]` through the line at `t`.
pub fn line_progress(line: &LyricLine, t: f64) -> f64 {
    let d = line.duration();
    if d <= 0.0 {
        return 1.0;
    }
    ((t - line.start) / d).clamp(0.0, 1.0)
}

/// Sort lines by start time in place (stable for equal starts).
pub fn sort_lines(lines: &mut [LyricLine]) {
    lines.sort_by(|a, b| a.start.total_cmp(&b.start));
}

#[cfg(test)]
#[path = "../../tests/unit/model/lyrics.rs"]
mod tests;
