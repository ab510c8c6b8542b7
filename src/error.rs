use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// No ratio settings row exists. Distinct from a configured ratio of zero.
    #[error("ratio settings are not configured")]
    NotConfigured,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("{0} not found")]
    NotFound(String),

    #[error("monetary overflow while {0}")]
    Overflow(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }
}
