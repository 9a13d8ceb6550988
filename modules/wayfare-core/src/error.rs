use thiserror::Error;

/// Result type alias for wayfare operations.
pub type Result<T> = std::result::Result<T, WayfareError>;

#[derive(Debug, Error)]
pub enum WayfareError {
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("This reviewer has already reviewed this listing")]
    DuplicateReview,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WayfareError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
