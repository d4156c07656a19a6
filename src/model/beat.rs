use serde::{Deserialize, Serialize};

/// Beat grid produced by an external beat tracker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BeatGrid {
    /// Tempo estimate in beats per minute.
    pub bpm: f64,
    /// Beat onsets in seconds, ascending.
    #[serde(default)]
    pub beats: Vec<f64>,
    /// Tracker confidence in `[0, 1]`.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

impl Default for BeatGrid {
    fn default() -> Self {
        Self {
            bpm: 0.0,
            beats: Vec::new(),
            confidence: 0.0,
        }
    }
}

impl BeatGrid {
    /// Construct a grid, sorting beats and dropping non-finite entries.
    pub fn new(bpm: f64, beats: impl IntoIterator<Item = f64>, confidence: f64) -> Self {
        let mut beats: Vec<f64> = beats.into_iter().filter(|b| b.is_finite()).collect();
        beats.sort_by(f64::total_cmp);
        Self {
            bpm,
            beats,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// A regular grid from `0` to `duration_sec` at `bpm`.
    pub fn regular(bpm: f64, duration_sec: f64) -> Self {
        if !bpm.is_finite() || !duration_sec.is_finite() || bpm <= 0.0 || duration_sec <= 0.0 {
            return Self::default();
        }
        let period = 60.0 / bpm;
        let n = (duration_sec / period).floor() as usize;
        Self::new(bpm, (0..=n).map(|i| i as f64 * period), 1.0)
    }

    /// Return `true` when the grid has no beats.
    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    /// Beat period in seconds, from `bpm` or the median inter-beat interval.
    pub fn period(&self) -> f64 {
        if self.bpm > 0.0 {
            return 60.0 / self.bpm;
        }
        if self.beats.len() >= 2 {
            let span = self.beats[self.beats.len() - 1] - self.beats[0];
            return span / (self.beats.len() - 1) as f64;
        }
        0.5
    }

    /// Distance in seconds from `t` to the nearest beat (`None` for an empty grid).
    pub fn distance_to_nearest(&self, t: f64) -> Option<f64> {
        if self.beats.is_empty() {
            return None;
        }
        let i = self.beats.partition_point(|&b| b < t);
        let mut best = f64::INFINITY;
        if i < self.beats.len() {
            best = best.min((self.beats[i] - t).abs());
        }
        if i > 0 {
            best = best.min((t - self.beats[i - 1]).abs());
        }
        Some(best)
    }

    /// Beat intensity in `[0, 1]`: how close `t` sits to the nearest beat.
    ///
    /// Decays exponentially with distance; the decay constant follows the tempo so fast songs
    /// get sharper pulses. Low-confidence grids are damped toward half strength.
    pub fn intensity_at(&self, t: f64) -> f64 {
        let t = if t.is_finite() { t.max(0.0) } else { 0.0 };
        let Some(dist) = self.distance_to_nearest(t) else {
            return 0.0;
        };
        let decay = (0.12 * self.period() / 0.5).clamp(0.05, 0.25);
        let raw = (-dist / decay).exp();
        let damp = 0.5 + 0.5 * self.confidence.clamp(0.0, 1.0);
        (raw * damp).clamp(0.0, 1.0)
    }

    /// Beats per second inside `[a, b)`; `0` for an empty or inverted window.
    pub fn density(&self, a: f64, b: f64) -> f64 {
        if a.is_nan() || b.is_nan() || b <= a {
            return 0.0;
        }
        let lo = self.beats.partition_point(|&x| x < a);
        let hi = self.beats.partition_point(|&x| x < b);
        (hi - lo) as f64 / (b - a)
    }

    /// Index of the last beat at or before `t`.
    pub fn beat_index_at(&self, t: f64) -> Option<usize> {
        let i = self.beats.partition_point(|&b| b <= t);
        i.checked_sub(1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/beat.rs"]
mod tests;
