use crate::utils::http::is_retryable_status;
use std::path::PathBuf;

/// Errors raised while fetching remote content or writing it to disk.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure, timeout or client construction failure
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a status other than the one expected
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Body did not have the expected JSON shape
    #[error("failed to parse response body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

impl FetchError {
    /// Whether a later attempt of the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Request(_) => true,
            FetchError::Status(status) => is_retryable_status(*status),
            _ => false,
        }
    }
}
