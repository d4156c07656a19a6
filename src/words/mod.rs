//! Per-word classification and visual properties.

/// Semantic and phonetic word classes.
pub mod classify;
/// Appearance history of words during playback.
pub mod history;
/// Visual props derived from a word's class, beat and repetition.
pub mod props;
