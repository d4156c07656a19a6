//! Audio-side analysis ahead of playback.

/// Structural section detection.
pub mod sections;
/// Energy curve and spectral centroid of a PCM buffer.
pub mod signature;
