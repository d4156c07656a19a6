//! lyric-dance renders beat-synchronized lyric cinematics.
//!
//! A song arrives as a [`SongInput`]: timed lyric lines, a beat grid, an optional energy
//! signature and a [`CinematicDirection`] document (which may be empty). The pipeline is:
//!
//! - [`detect_sections`] segments the song into structural sections
//! - [`DirectionInterpreter`] resolves the document into per-progress decisions
//! - [`RenderSession`] draws each frame into three [`Canvas2d`] layers in a fixed order
//!   (background, lighting, particles, text, elemental overlays, HUD)
//!
//! [`word_visual_props`] and [`draw_elemental_word`] are usable on their own for lightweight
//! inline rendering.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
pub(crate) mod model;

/// Section detection and audio signatures.
pub mod analysis;
/// Direction document resolution.
pub mod direction;
/// Canvas abstraction, backends and layer renderers.
pub mod render;
/// Session-oriented rendering API.
pub mod session;
/// Word classification and visual props.
pub mod words;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{
    Affine, BezPath, CanvasSize, Point, Rect, Rgba8Premul, Vec2, clamp_progress, progress_of,
};
pub use crate::foundation::error::{LyricDanceError, LyricDanceResult};

pub use crate::model::beat::BeatGrid;
pub use crate::model::direction::{
    Chapter, CinematicDirection, Climax, DirectionSection, LineDirection, PaletteRef,
    TensionStageDef, WordDirective,
};
pub use crate::model::lyrics::{LineTag, LyricLine, active_line_index, line_progress};
pub use crate::model::song::SongInput;

pub use crate::analysis::sections::{AudioSection, SectionRole, SpectralCharacter, detect_sections};
pub use crate::analysis::signature::SongSignature;
pub use crate::direction::evolution::{
    EvolutionProps, EvolutionRule, draw_evolution_overlay, resolve_evolution,
};
pub use crate::direction::interpreter::DirectionInterpreter;
pub use crate::render::canvas::{Canvas2d, FontSpec, Paint, TextAlign};
pub use crate::render::composite::composite_layers;
pub use crate::render::cpu::CpuCanvas;
pub use crate::render::elemental::{
    EffectQuality, ElementalClass, ElementalOptions, ElementalWord, draw_elemental_word,
};
pub use crate::render::recording::{DrawCmd, RecordingCanvas};
pub use crate::render::system_style::{SystemStyle, compute_fit_font_size, system_style};
pub use crate::session::render_session::{DrawStats, FrameLayers, RenderSession, RenderSessionOpts};
pub use crate::words::classify::{WordClass, classify_word, is_exact_hero_token_match};
pub use crate::words::props::{LineAnim, WordVisualProps, word_visual_props};
