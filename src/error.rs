use thiserror::Error;

/// Errors surfaced by the content stores and the language context.
///
/// Text resolution and multilingual field parsing never produce one of these;
/// they degrade to fallback text instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentError {
    /// Malformed or missing input to a write. Caller-correctable, never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// Backend read/write failure or timeout. Safe to retry.
    #[error("store error: {0}")]
    Store(String),

    /// Update target does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl ContentError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Stable machine-readable name, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Store(_) => "store",
            Self::NotFound(_) => "not_found",
        }
    }

    /// Only backend failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

impl From<sqlx::Error> for ContentError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(err.to_string())
    }
}
