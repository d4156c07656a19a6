/// Convenience result type used across lyric-dance.
pub type LyricDanceResult<T> = Result<T, LyricDanceError>;

/// Top-level error taxonomy used at the crate boundary.
///
/// The per-frame rendering core never produces these: lookups are total and numeric input is
/// clamped. Errors only surface while loading documents, analysing audio or preparing canvases.
#[derive(thiserror::Error, Debug)]
pub enum LyricDanceError {
    /// Invalid user-provided song, direction or canvas data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while analysing audio (signature extraction, section detection).
    #[error("analysis error: {0}")]
    Analysis(String),

    /// Errors while preparing render targets or reading back pixels.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LyricDanceError {
    /// Build a [`LyricDanceError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LyricDanceError::Analysis`] value.
    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis(msg.into())
    }

    /// Build a [`LyricDanceError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LyricDanceError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
