/// Convenience result type used across Reelbeat.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid user-provided or project data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Split offsets out of bounds or non-increasing; state is unchanged.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// An operation's precondition was not met; state is unchanged.
    #[error("precondition not met: {0}")]
    Precondition(String),

    /// A required external resource (encoder, decoder, surface) is unavailable.
    #[error("resource unavailable: {0}")]
    Resource(String),

    /// Audio clips with differing sample rate or channel layout were combined.
    #[error("format mismatch: {0}")]
    FormatMismatch(String),

    /// A generative service call failed with a non-retryable error.
    #[error("service error: {0}")]
    Service(String),

    /// A generative service rejected the call due to rate limiting or quota.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::InvalidRange`] value.
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    /// Build a [`ReelError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`ReelError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`ReelError::FormatMismatch`] value.
    pub fn format_mismatch(msg: impl Into<String>) -> Self {
        Self::FormatMismatch(msg.into())
    }

    /// Build a [`ReelError::Service`] value.
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Build a [`ReelError::RateLimited`] value.
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error may succeed on retry (rate-limit class only).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
