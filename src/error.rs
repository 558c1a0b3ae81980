//! Error type shared by the library and the binaries.

use thiserror::Error;

/// Everything that can go wrong outside the pure render pipeline.
///
/// The pipeline itself is total: once a [`crate::calendar::Grid`] exists,
/// rendering cannot fail. Errors come from validating input shape and from
/// the file/JSON plumbing around it.
#[derive(Debug, Error)]
pub enum DioramaError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DioramaError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        DioramaError::InvalidInput { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, DioramaError>;
