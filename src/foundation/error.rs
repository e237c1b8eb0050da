/// Convenience result type used across playframe.
pub type PlayframeResult<T> = Result<T, PlayframeError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Capacity and proximity outcomes of keyframe insertion are not errors; see
/// [`crate::InsertResult`].
#[derive(thiserror::Error, Debug)]
pub enum PlayframeError {
    /// Invalid user-provided data: malformed import payloads, unknown token ids, non-finite times.
    #[error("validation error: {0}")]
    Validation(String),

    /// Illegal edit-mode transition, e.g. restoring while a drag is in progress.
    #[error("edit mode error: {0}")]
    Mode(String),

    /// Errors when serializing or deserializing JSON.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlayframeError {
    /// Build a [`PlayframeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlayframeError::Mode`] value.
    pub fn mode(msg: impl Into<String>) -> Self {
        Self::Mode(msg.into())
    }

    /// Build a [`PlayframeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
