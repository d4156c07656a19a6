//! Structural section detection.
//!
//! Three independent boundary signals (energy jumps, beat-density changes, lyric gaps) are merged,
//! snapped and filtered into a contiguous partition of the song. Each interval is then measured
//! and given a structural role by ordered heuristics, and adjacent similar sections are merged
//! until the count fits [`MAX_SECTIONS`].

use crate::analysis::signature::{ENERGY_WINDOW_SEC, SongSignature};
use crate::foundation::math::median;
use crate::model::beat::BeatGrid;
use crate::model::lyrics::LyricLine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const ENERGY_JUMP: f64 = 0.2;
const DENSITY_WINDOW_SEC: f64 = 4.0;
const DENSITY_STEP_SEC: f64 = 1.0;
const DENSITY_CHANGE: f64 = 0.3;
const LYRIC_GAP_SEC: f64 = 3.0;
const SNAP_SEC: f64 = 2.0;
/// Minimum section length in seconds (the final section is exempt).
pub const MIN_SECTION_SEC: f64 = 3.0;
/// Upper bound on the number of detected sections.
pub const MAX_SECTIONS: usize = 8;
const HIGH_DENSITY: f64 = 2.2;
const ROLE_MISMATCH_PENALTY: f64 = 0.35;
const THIN_ENERGY: f64 = 0.08;
const WARM_CENTROID_HZ: f64 = 1800.0;
const BRIGHT_CENTROID_HZ: f64 = 3000.0;
const MAX_SECTION_LYRICS: usize = 3;

/// Coarse timbre of a section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpectralCharacter {
    /// Low centroid.
    Warm,
    /// High centroid.
    Bright,
    /// Mid centroid.
    Full,
    /// Very low energy.
    Thin,
}

/// Structural role of a section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionRole {
    /// Opening, few lyrics.
    Intro,
    /// Default narrative section.
    Verse,
    /// Rising build into a high-energy section.
    Prechorus,
    /// High energy, dense, repeated lyrics.
    Chorus,
    /// Timbre change mid-song.
    Bridge,
    /// High energy, dense, no lyrics.
    Drop,
    /// Sparse, quiet mid-song.
    Breakdown,
    /// Closing, energy falling.
    Outro,
}

/// One detected section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSection {
    /// Position in the section list.
    pub index: usize,
    /// Inclusive start in seconds.
    pub start_sec: f64,
    /// Exclusive end in seconds.
    pub end_sec: f64,
    /// `end_sec - start_sec`.
    pub duration_sec: f64,
    /// Mean normalized energy.
    pub avg_energy: f64,
    /// Peak normalized energy.
    pub peak_energy: f64,
    /// `avg_energy` minus the previous section's (0 for the first).
    pub energy_delta: f64,
    /// Coarse timbre.
    pub spectral_character: SpectralCharacter,
    /// Beats per second.
    pub beat_density: f64,
    /// Structural role.
    pub role: SectionRole,
    /// First few overlapping lyric lines.
    pub lyrics: Vec<LyricLine>,
    /// Number of overlapping lyric lines (all of them, not only the kept ones).
    pub lyric_line_count: usize,
    /// Whether any overlapping line text repeats (within or across sections).
    pub has_lyric_repetition: bool,
}

impl AudioSection {
    /// Return `true` when `t` falls in `[start_sec, end_sec)`.
    pub fn contains(&self, t: f64) -> bool {
        self.start_sec <= t && t < self.end_sec
    }
}

/// Segment a song into structural sections.
///
/// Sections partition `[0, duration_sec]` in order, each at least [`MIN_SECTION_SEC`] long except
/// the last, and there are never more than [`MAX_SECTIONS`]. Returns an empty vector for a
/// non-positive or non-finite duration. The result depends only on the inputs.
#[tracing::instrument(skip(signature, beat_grid, lines), fields(lines = lines.len()))]
pub fn detect_sections(
    signature: &SongSignature,
    beat_grid: &BeatGrid,
    lines: &[LyricLine],
    duration_sec: f64,
) -> Vec<AudioSection> {
    if !duration_sec.is_finite() || duration_sec <= 0.0 {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    candidates.extend(energy_boundaries(signature, duration_sec));
    candidates.extend(density_boundaries(beat_grid, duration_sec));
    candidates.extend(lyric_gap_boundaries(lines, duration_sec));

    let snapped = snap_boundaries(candidates, duration_sec);
    let mut bounds = drop_short_segments(&snapped);

    let inputs = Inputs {
        signature,
        beat_grid,
        lines,
        duration_sec,
    };
    let mut sections = build_sections(&inputs, &bounds);

    while sections.len() > MAX_SECTIONS {
        let Some(i) = most_similar_pair(&sections) else {
            break;
        };
        tracing::debug!(
            left = i,
            start = sections[i].start_sec,
            end = sections[i + 1].end_sec,
            "merging similar adjacent sections"
        );
        bounds.remove(i + 1);
        sections = build_sections(&inputs, &bounds);
    }

    sections
}

struct Inputs<'a> {
    signature: &'a SongSignature,
    beat_grid: &'a BeatGrid,
    lines: &'a [LyricLine],
    duration_sec: f64,
}

fn interior(t: f64, duration_sec: f64) -> bool {
    t.is_finite() && t > 0.0 && t < duration_sec
}

fn energy_boundaries(signature: &SongSignature, duration_sec: f64) -> Vec<f64> {
    signature
        .energy_curve
        .windows(2)
        .enumerate()
        .filter(|(_, w)| (w[1] - w[0]).abs() > ENERGY_JUMP)
        .map(|(i, _)| (i + 1) as f64 * ENERGY_WINDOW_SEC)
        .filter(|&t| interior(t, duration_sec))
        .collect()
}

fn density_boundaries(beat_grid: &BeatGrid, duration_sec: f64) -> Vec<f64> {
    let mut out = Vec::new();
    if beat_grid.is_empty() {
        return out;
    }
    let mut prev: Option<f64> = None;
    let mut start = 0.0;
    while start + DENSITY_WINDOW_SEC <= duration_sec {
        let d = beat_grid.density(start, start + DENSITY_WINDOW_SEC);
        if let Some(p) = prev {
            let changed = if p > 0.0 {
                (d - p).abs() / p >= DENSITY_CHANGE
            } else {
                d > 0.0
            };
            if changed && interior(start, duration_sec) {
                out.push(start);
            }
        }
        prev = Some(d);
        start += DENSITY_STEP_SEC;
    }
    out
}

fn lyric_gap_boundaries(lines: &[LyricLine], duration_sec: f64) -> Vec<f64> {
    lines
        .windows(2)
        .filter(|w| w[1].start - w[0].end > LYRIC_GAP_SEC)
        .map(|w| (w[0].end + w[1].start) * 0.5)
        .filter(|&t| interior(t, duration_sec))
        .collect()
}

/// Sort candidates and collapse clusters closer than [`SNAP_SEC`] into their midpoint.
///
/// `0` and `duration_sec` are pinned: interior points that land within the snap distance of an
/// endpoint are absorbed into it.
fn snap_boundaries(mut candidates: Vec<f64>, duration_sec: f64) -> Vec<f64> {
    candidates.retain(|&t| interior(t, duration_sec));
    candidates.sort_by(f64::total_cmp);

    let mut out = vec![0.0];
    let mut i = 0;
    while i < candidates.len() {
        let lo = candidates[i];
        let mut hi = lo;
        let mut j = i + 1;
        while j < candidates.len() && candidates[j] - hi <= SNAP_SEC {
            hi = candidates[j];
            j += 1;
        }
        let mid = (lo + hi) * 0.5;
        let last = out[out.len() - 1];
        if mid - last > SNAP_SEC && duration_sec - mid > SNAP_SEC {
            out.push(mid);
        }
        i = j;
    }
    out.push(duration_sec);
    out
}

fn drop_short_segments(bounds: &[f64]) -> Vec<f64> {
    let Some((&last, inner)) = bounds.split_last() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(bounds.len());
    for &b in inner {
        match out.last() {
            None => out.push(b),
            Some(&prev) if b - prev >= MIN_SECTION_SEC => out.push(b),
            Some(_) => {}
        }
    }
    out.push(last);
    out
}

fn build_sections(inputs: &Inputs<'_>, bounds: &[f64]) -> Vec<AudioSection> {
    let mut sections: Vec<AudioSection> = bounds
        .windows(2)
        .enumerate()
        .map(|(index, w)| measure(inputs, index, w[0], w[1]))
        .collect();

    for i in 1..sections.len() {
        sections[i].energy_delta = sections[i].avg_energy - sections[i - 1].avg_energy;
    }
    mark_repetition(inputs.lines, &mut sections);
    classify_roles(&mut sections, inputs.duration_sec);
    sections
}

fn measure(inputs: &Inputs<'_>, index: usize, start: f64, end: f64) -> AudioSection {
    let samples = inputs.signature.samples_in(start, end);
    let (avg_energy, peak_energy) = if samples.is_empty() {
        let e = inputs.signature.energy_at((start + end) * 0.5);
        (e, e)
    } else {
        let sum: f64 = samples.iter().sum();
        let peak = samples.iter().copied().fold(0.0_f64, f64::max);
        (sum / samples.len() as f64, peak)
    };

    let centroid = inputs.signature.centroid_in(start, end);
    let spectral_character = if avg_energy < THIN_ENERGY {
        SpectralCharacter::Thin
    } else if centroid < WARM_CENTROID_HZ {
        SpectralCharacter::Warm
    } else if centroid > BRIGHT_CENTROID_HZ {
        SpectralCharacter::Bright
    } else {
        SpectralCharacter::Full
    };

    let overlapping: Vec<&LyricLine> = inputs
        .lines
        .iter()
        .filter(|l| l.overlaps(start, end))
        .collect();

    AudioSection {
        index,
        start_sec: start,
        end_sec: end,
        duration_sec: end - start,
        avg_energy,
        peak_energy,
        energy_delta: 0.0,
        spectral_character,
        beat_density: inputs.beat_grid.density(start, end),
        role: SectionRole::Verse,
        lyrics: overlapping
            .iter()
            .take(MAX_SECTION_LYRICS)
            .map(|l| (*l).clone())
            .collect(),
        lyric_line_count: overlapping.len(),
        has_lyric_repetition: false,
    }
}

fn normalized_line(text: &str) -> String {
    text.trim().to_lowercase()
}

fn mark_repetition(lines: &[LyricLine], sections: &mut [AudioSection]) {
    let mut total: HashMap<String, usize> = HashMap::new();
    for l in lines {
        let key = normalized_line(&l.text);
        if !key.is_empty() {
            *total.entry(key).or_default() += 1;
        }
    }
    for s in sections.iter_mut() {
        s.has_lyric_repetition = lines
            .iter()
            .filter(|l| l.overlaps(s.start_sec, s.end_sec))
            .any(|l| total.get(&normalized_line(&l.text)).copied().unwrap_or(0) > 1);
    }
}

fn classify_roles(sections: &mut [AudioSection], duration_sec: f64) {
    let energies: Vec<f64> = sections.iter().map(|s| s.avg_energy).collect();
    let med = median(&energies);
    let high = |e: f64| e > 0.0 && e >= med * 1.15;
    let n = sections.len();

    let roles: Vec<SectionRole> = (0..n)
        .map(|i| {
            let s = &sections[i];
            let start_ratio = s.start_sec / duration_sec;
            let is_last = i + 1 == n;
            let dense = s.beat_density >= HIGH_DENSITY;

            if start_ratio < 0.12 && s.lyric_line_count <= 1 {
                return SectionRole::Intro;
            }
            if (is_last || start_ratio > 0.85) && s.energy_delta < 0.0 {
                return SectionRole::Outro;
            }
            if high(s.avg_energy) && dense && s.has_lyric_repetition {
                return SectionRole::Chorus;
            }
            if high(s.avg_energy) && dense && s.lyric_line_count == 0 {
                return SectionRole::Drop;
            }
            if s.energy_delta > 0.0 && i + 1 < n && high(sections[i + 1].avg_energy) {
                return SectionRole::Prechorus;
            }
            if s.lyric_line_count <= 1
                && med > 0.0
                && s.avg_energy < med * 0.85
                && (0.2..=0.85).contains(&start_ratio)
            {
                return SectionRole::Breakdown;
            }
            if i > 0
                && i + 1 < n
                && (0.4..=0.85).contains(&start_ratio)
                && s.spectral_character != sections[i - 1].spectral_character
                && s.spectral_character != sections[i + 1].spectral_character
            {
                return SectionRole::Bridge;
            }
            SectionRole::Verse
        })
        .collect();

    for (s, role) in sections.iter_mut().zip(roles) {
        s.role = role;
    }
}

fn merge_penalty(a: &AudioSection, b: &AudioSection) -> f64 {
    let role = if a.role == b.role {
        0.0
    } else {
        ROLE_MISMATCH_PENALTY
    };
    role + (a.avg_energy - b.avg_energy).abs() + (a.beat_density - b.beat_density).abs() / 4.0
}

fn most_similar_pair(sections: &[AudioSection]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for i in 0..sections.len().saturating_sub(1) {
        let p = merge_penalty(&sections[i], &sections[i + 1]);
        match best {
            Some((_, bp)) if bp <= p => {}
            _ => best = Some((i, p)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/sections.rs"]
mod tests;
