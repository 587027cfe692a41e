/// Convenience result type used across sprayfill.
pub type SprayResult<T> = Result<T, SprayError>;

/// Error taxonomy for setup-time operations.
///
/// Control operations and frame callbacks never surface these; they are reserved for
/// configuration loading and surface construction.
#[derive(thiserror::Error, Debug)]
pub enum SprayError {
    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A drawing surface could not be created or does not match expectations.
    #[error("surface error: {0}")]
    Surface(String),

    /// Text shaping or font loading failed.
    #[error("text error: {0}")]
    Text(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),
}

impl SprayError {
    /// Build a [`SprayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SprayError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`SprayError::Text`] value.
    pub fn text(msg: impl Into<String>) -> Self {
        Self::Text(msg.into())
    }

    /// Build a [`SprayError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
