//! Cinematic direction: resolving an authored document into per-frame decisions.

/// Repeated-word evolution rules.
pub mod evolution;
/// Read façade over a direction document.
pub mod interpreter;
/// Named palettes and palette roles.
pub mod palette;
/// Fixed lookup tables (typography, motion, atmosphere, tension arcs, sections).
pub mod resolvers;
