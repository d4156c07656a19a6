//! Progress-bucketed memoization.
//!
//! A [`BucketMemo`] caches values computed for coarse slices of song progress. Entries are scoped
//! to one direction fingerprint and one song generation; the whole memo is dropped when either
//! changes, or when playback seeks further than one bucket width from the last lookup.
//!
//! Callers pass the span around the lookup over which their computation is constant (for
//! example the stretch between two chapter boundaries). A bucket crossed by a span edge holds
//! one entry per side, so a value never leaks across a boundary.

use crate::foundation::core::clamp_progress;
use smallvec::SmallVec;

/// Span for computations that do not depend on where in the song they run.
pub const WHOLE_SONG: (f64, f64) = (0.0, 1.0);

/// Why a memo dropped its entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoInvalidation {
    /// The direction fingerprint changed.
    Direction,
    /// A different song was loaded.
    Song,
    /// Progress jumped more than one bucket.
    Seek,
    /// Explicit call to [`BucketMemo::invalidate`].
    Manual,
}

/// Small memo keyed by progress bucket.
#[derive(Clone, Debug)]
pub struct BucketMemo<T> {
    bucket_width: f64,
    capacity: usize,
    scope: Option<(u64, u64)>,
    last_progress: Option<f64>,
    entries: SmallVec<[(u32, u64, T); 4]>,
    hits: u64,
    misses: u64,
}

impl<T> BucketMemo<T> {
    /// Memo with buckets of `bucket_width` progress holding at most `capacity` entries.
    ///
    /// Widths outside `(0, 1]` fall back to `0.05`; capacity is at least one.
    pub fn new(bucket_width: f64, capacity: usize) -> Self {
        let valid = bucket_width.is_finite() && bucket_width > 0.0 && bucket_width <= 1.0;
        let bucket_width = if valid { bucket_width } else { 0.05 };
        Self {
            bucket_width,
            capacity: capacity.max(1),
            scope: None,
            last_progress: None,
            entries: SmallVec::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Bucket width in progress units.
    pub fn bucket_width(&self) -> f64 {
        self.bucket_width
    }

    /// Bucket holding `progress`. Progress 1.0 shares the last bucket.
    pub fn bucket_of(&self, progress: f64) -> u32 {
        let last = ((1.0 / self.bucket_width).ceil() as u32).saturating_sub(1);
        ((clamp_progress(progress) / self.bucket_width).floor() as u32).min(last)
    }

    /// Representative progress of a bucket (its midpoint, at most 1).
    pub fn bucket_progress(&self, bucket: u32) -> f64 {
        ((f64::from(bucket) + 0.5) * self.bucket_width).min(1.0)
    }

    /// Value for `progress`, computing it on a miss from the midpoint of the bucket clipped to
    /// `span`.
    ///
    /// `span` is the `(start, end)` progress interval containing `progress` over which `compute`
    /// gives the same result; [`WHOLE_SONG`] when it never changes. `direction` and `generation`
    /// scope the entries; a change in either empties the memo.
    pub fn get_or_insert_with(
        &mut self,
        progress: f64,
        span: (f64, f64),
        direction: u64,
        generation: u64,
        compute: impl FnOnce(f64) -> T,
    ) -> &T {
        let progress = clamp_progress(progress);
        match self.scope {
            Some((d, _)) if d != direction => self.drop_entries(MemoInvalidation::Direction),
            Some((_, g)) if g != generation => self.drop_entries(MemoInvalidation::Song),
            _ => {}
        }
        self.scope = Some((direction, generation));
        if let Some(last) = self.last_progress
            && (progress - last).abs() > self.bucket_width
        {
            self.drop_entries(MemoInvalidation::Seek);
        }
        self.last_progress = Some(progress);

        let bucket = self.bucket_of(progress);
        let span_key = span.0.to_bits();
        let idx = match self
            .entries
            .iter()
            .position(|(b, k, _)| *b == bucket && *k == span_key)
        {
            Some(i) => {
                self.hits += 1;
                i
            }
            None => {
                self.misses += 1;
                if self.entries.len() >= self.capacity {
                    self.entries.remove(0);
                }
                let value = compute(self.representative(bucket, span, progress));
                self.entries.push((bucket, span_key, value));
                self.entries.len() - 1
            }
        };
        &self.entries[idx].2
    }

    fn representative(&self, bucket: u32, span: (f64, f64), progress: f64) -> f64 {
        let lo = (f64::from(bucket) * self.bucket_width).max(span.0);
        let hi = ((f64::from(bucket) + 1.0) * self.bucket_width)
            .min(span.1)
            .min(1.0);
        if lo <= progress && progress <= hi {
            (lo + hi) * 0.5
        } else {
            progress
        }
    }

    /// Drop every entry.
    pub fn invalidate(&mut self) {
        self.drop_entries(MemoInvalidation::Manual);
        self.scope = None;
        self.last_progress = None;
    }

    fn drop_entries(&mut self, reason: MemoInvalidation) {
        if !self.entries.is_empty() {
            tracing::debug!(?reason, entries = self.entries.len(), "bucket memo invalidated");
        }
        self.entries.clear();
    }

    /// Cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that computed a value.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/memo.rs"]
mod tests;
