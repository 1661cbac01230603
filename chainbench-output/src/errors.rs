//! Error types for report delivery

use thiserror::Error;

/// Failures while appending a report block
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Filesystem operation failed at {path} ({operation}): {error}")]
    Filesystem {
        path: String,
        operation: String,
        error: String,
    },

    #[error("Failed to write to {stream}: {error}")]
    Stdio { stream: String, error: String },
}

impl DeliveryError {
    pub(crate) fn filesystem(
        path: impl Into<String>,
        operation: &str,
        error: impl ToString,
    ) -> Self {
        Self::Filesystem {
            path: path.into(),
            operation: operation.to_string(),
            error: error.to_string(),
        }
    }

    pub(crate) fn stdio(stream: &str, error: impl ToString) -> Self {
        Self::Stdio {
            stream: stream.to_string(),
            error: error.to_string(),
        }
    }
}
