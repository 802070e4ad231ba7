use thiserror::Error;

/// Errors raised while building or executing a directory query.
///
/// A page past the end of the matching set is not an error; it yields an
/// empty page.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("malformed advocate row {id}: {reason}")]
    MalformedRow { id: i64, reason: String },
}

impl DirectoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the caller supplied bad input (as opposed to a failure the
    /// caller cannot fix).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
