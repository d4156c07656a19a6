use crate::foundation::core::Point;
use crate::words::classify::normalize_token;
use serde::Serialize;
use std::collections::HashMap;

const MAX_POSITIONS: usize = 16;
/// Backward clock jumps larger than this count as a seek.
const SEEK_TOLERANCE_SEC: f64 = 0.5;

/// Appearance record for one normalized word.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WordHistory {
    /// Number of appearances so far.
    pub count: u32,
    /// Song time of the first appearance.
    pub first_seen: f64,
    /// Song time of the latest appearance.
    pub last_seen: f64,
    /// Most recent draw positions (oldest first, bounded).
    #[serde(skip)]
    pub positions: Vec<Point>,
}

impl WordHistory {
    fn first(t: f64, pos: Point) -> Self {
        Self {
            count: 1,
            first_seen: t,
            last_seen: t,
            positions: vec![pos],
        }
    }

    fn bump(&mut self, t: f64, pos: Point) {
        self.count = self.count.saturating_add(1);
        self.last_seen = t;
        if self.positions.len() == MAX_POSITIONS {
            self.positions.remove(0);
        }
        self.positions.push(pos);
    }
}

/// Word appearances for one playback session.
///
/// Cleared on [`WordHistoryTracker::reset`] and whenever the clock seeks backward.
#[derive(Debug, Default)]
pub struct WordHistoryTracker {
    words: HashMap<String, WordHistory>,
    last_time: Option<f64>,
}

impl WordHistoryTracker {
    /// Empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the playback clock. Returns `true` when a backward seek cleared the history.
    pub fn observe_time(&mut self, t: f64) -> bool {
        let seeked = self
            .last_time
            .is_some_and(|last| t + SEEK_TOLERANCE_SEC < last);
        if seeked {
            tracing::debug!(from = ?self.last_time, to = t, "backward seek, clearing word history");
            self.words.clear();
        }
        self.last_time = Some(t);
        seeked
    }

    /// Record one appearance. Words that normalize to nothing are ignored.
    pub fn record(&mut self, word: &str, t: f64, pos: Point) -> Option<&WordHistory> {
        let key = normalize_token(word);
        if key.is_empty() {
            return None;
        }
        let entry = self
            .words
            .entry(key)
            .and_modify(|h| h.bump(t, pos))
            .or_insert_with(|| WordHistory::first(t, pos));
        Some(entry)
    }

    /// History for a word, if it has appeared.
    pub fn get(&self, word: &str) -> Option<&WordHistory> {
        self.words.get(&normalize_token(word))
    }

    /// Appearance count (0 for unseen words).
    pub fn count(&self, word: &str) -> u32 {
        self.get(word).map_or(0, |h| h.count)
    }

    /// Number of distinct words seen.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Forget everything, including the clock.
    pub fn reset(&mut self) {
        self.words.clear();
        self.last_time = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/words/history.rs"]
mod tests;
