//! Particle budget governor.
//!
//! Slow frames accumulate a counter; fast frames drain it. Reaching the threshold throttles the
//! budget, and a fully drained counter restores it.

/// Hysteresis governor over frame deltas.
#[derive(Clone, Debug)]
pub struct ParticleGovernor {
    slow_frame_ms: f64,
    threshold: u32,
    high: usize,
    low: usize,
    slow_frames: u32,
    throttled: bool,
}

impl ParticleGovernor {
    /// Governor with a slow-frame cutoff, a throttle threshold and the two budgets.
    pub fn new(slow_frame_ms: f64, threshold: u32, high: usize, low: usize) -> Self {
        Self {
            slow_frame_ms,
            threshold: threshold.max(1),
            high,
            low: low.min(high),
            slow_frames: 0,
            throttled: false,
        }
    }

    /// Feed one frame delta and return the budget for the next frame.
    ///
    /// Non-finite or non-positive deltas are ignored. The counter saturates at the threshold so
    /// recovery never takes longer than the throttle did.
    pub fn observe(&mut self, frame_delta_ms: f64) -> usize {
        if !frame_delta_ms.is_finite() || frame_delta_ms <= 0.0 {
            return self.budget();
        }
        if frame_delta_ms > self.slow_frame_ms {
            self.slow_frames = (self.slow_frames + 1).min(self.threshold);
        } else {
            self.slow_frames = self.slow_frames.saturating_sub(1);
        }

        if !self.throttled && self.slow_frames >= self.threshold {
            self.throttled = true;
            tracing::debug!(budget = self.low, "particle budget throttled");
        } else if self.throttled && self.slow_frames == 0 {
            self.throttled = false;
            tracing::debug!(budget = self.high, "particle budget restored");
        }
        self.budget()
    }

    /// Current particle budget.
    pub fn budget(&self) -> usize {
        if self.throttled { self.low } else { self.high }
    }

    /// Slow frames currently counted.
    pub fn slow_frames(&self) -> u32 {
        self.slow_frames
    }

    /// True while the low budget is in force.
    pub fn is_throttled(&self) -> bool {
        self.throttled
    }

    /// Back to the high budget with no slow frames.
    pub fn reset(&mut self) {
        self.slow_frames = 0;
        self.throttled = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/governor.rs"]
mod tests;
