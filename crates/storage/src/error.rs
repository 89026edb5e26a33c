use thiserror::Error;

/// Errors that may occur while interacting with block storage.
///
/// This enum is used across all implementations of [`crate::BlockStorage`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage backend could not be reached.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The backend rejected a write because it conflicts with existing data.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Any other backend failure.
    #[error("storage error: {0}")]
    Unknown(String),
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::Unknown(err.to_string())
        }
    }
}
