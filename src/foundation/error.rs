/// Convenience result type used across morphogen.
pub type MorphResult<T> = Result<T, MorphError>;

/// Failures surfaced by the generator, its configuration files and its display ports.
///
/// Structural edits on the engine never produce errors; these variants cover the boundaries
/// where user data or the filesystem is involved.
#[derive(thiserror::Error, Debug)]
pub enum MorphError {
    /// Rejected options: canvas too small, bad chain index, zero presentation interval.
    #[error("validation error: {0}")]
    Validation(String),

    /// An image buffer had the wrong shape, or a frame or PNG could not be written.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Malformed XML chain documents or options JSON.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem and image-codec failures.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MorphError {
    /// Build a [`MorphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MorphError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`MorphError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
