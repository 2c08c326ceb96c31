//! Shared error type for the RAG pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the RAG pipeline.
///
/// Build-phase errors (`Io`, `Parse`, `InvalidConfig`, `DuplicateId`) are
/// fatal to startup; `Service` errors can also occur per request and are
/// meant to be caught at the request boundary.
#[derive(Debug, Error)]
pub enum RagError {
    /// The source document could not be read.
    #[error("failed to read document at {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The source document could not be decoded.
    #[error("failed to extract document text: {0}")]
    Parse(String),

    /// An external service (embedding or generation) failed or returned
    /// a malformed response.
    #[error("{service} request failed: {message}")]
    Service {
        /// Which service failed ("embedding" or "generation").
        service: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// An index id was inserted twice.
    #[error("duplicate index id '{0}'")]
    DuplicateId(String),

    /// A configuration value was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RagError {
    /// Shorthand for an embedding-service failure.
    pub fn embedding(message: impl Into<String>) -> Self {
        RagError::Service {
            service: "embedding",
            message: message.into(),
        }
    }

    /// Shorthand for a generation-service failure.
    pub fn generation(message: impl Into<String>) -> Self {
        RagError::Service {
            service: "generation",
            message: message.into(),
        }
    }
}
