//! Drawing: the canvas abstraction, its backends and the per-layer renderers.
//!
//! Everything here draws through [`canvas::Canvas2d`]; only [`cpu`] touches pixels.

/// Procedural backgrounds and the redraw gate.
pub mod background;
/// Canvas trait and paint types.
pub mod canvas;
/// Premultiplied layer compositing.
pub mod composite;
/// Raster canvas backed by `vello_cpu`.
pub mod cpu;
/// Elemental word treatments.
pub mod elemental;
/// Particle budget governor.
pub mod governor;
/// Playhead overlay.
pub mod hud;
/// Light pass.
pub mod lighting;
/// Progress-bucketed memo.
pub mod memo;
/// Ambient particle field.
pub mod particles;
/// Display-list canvas.
pub mod recording;
/// Typographic systems and line fitting.
pub mod system_style;
