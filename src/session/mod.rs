//! Session-oriented rendering API.

/// Owned per-playback renderer.
pub mod render_session;
