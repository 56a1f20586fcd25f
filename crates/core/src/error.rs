//! Error types for Podium.
//!
//! A single error enum covers the retrieval pipeline (corpus loading,
//! chunking, embedding, completion, agent lifecycle) as well as the ambient
//! configuration, I/O and serialization failures.

use thiserror::Error;

/// Unified error type for Podium.
///
/// Library functions return `Result<T, AppError>`; nothing panics on
/// recoverable failures.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Corpus directory missing, unreadable or without eligible documents
    #[error("Corpus load error: {0}")]
    CorpusLoad(String),

    /// Chunk overlap must be strictly smaller than a non-zero chunk size
    #[error("Invalid chunk configuration: overlap {chunk_overlap} must be smaller than chunk size {chunk_size}")]
    InvalidChunkConfig {
        chunk_size: usize,
        chunk_overlap: usize,
    },

    /// Embedding provider failures (network, auth, malformed response)
    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    /// Chat completion provider failures
    #[error("Completion service error: {0}")]
    CompletionService(String),

    /// `ask` called before the agent finished initializing
    #[error("Retrieval agent is not initialized; call initialize() first")]
    NotInitialized,

    /// A bounded network call did not finish in time
    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: String, secs: u64 },

    /// Prompt rendering and persona loading errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_chunk_config_message() {
        let err = AppError::InvalidChunkConfig {
            chunk_size: 10,
            chunk_overlap: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("overlap 10"));
        assert!(msg.contains("chunk size 10"));
    }

    #[test]
    fn test_timeout_message() {
        let err = AppError::Timeout {
            operation: "chat completion".to_string(),
            secs: 30,
        };
        assert_eq!(err.to_string(), "chat completion timed out after 30s");
    }

    #[test]
    fn test_from_serde_json() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
