//! Error types for the ragchat pipeline.

use thiserror::Error;

use crate::utils::retry::Retryable;

/// Errors related to embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to connect to embedding server: {0}")]
    ConnectionError(String),

    #[error("embedding server error: {0}")]
    ServerError(String),

    #[error("embedding request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding timeout")]
    Timeout,
}

impl Retryable for EmbeddingError {
    fn is_retryable(&self) -> bool {
        match self {
            EmbeddingError::ConnectionError(_) | EmbeddingError::Timeout => true,
            // Server errors might be transient (e.g., 503 Service Unavailable)
            EmbeddingError::ServerError(msg) => is_transient_message(msg),
            EmbeddingError::RequestError(e) => e.is_timeout() || e.is_connect(),
            EmbeddingError::InvalidResponse(_) | EmbeddingError::DimensionMismatch { .. } => false,
        }
    }
}

/// Errors related to vector index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to connect to vector index: {0}")]
    ConnectionError(String),

    #[error("collection error: {0}")]
    CollectionError(String),

    #[error("upsert error: {0}")]
    UpsertError(String),

    #[error("query error: {0}")]
    QueryError(String),
}

impl Retryable for IndexError {
    fn is_retryable(&self) -> bool {
        match self {
            IndexError::ConnectionError(_) => true,
            IndexError::CollectionError(msg)
            | IndexError::UpsertError(msg)
            | IndexError::QueryError(msg) => is_transient_message(msg),
        }
    }
}

/// Errors related to chat completion operations.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion API key is not set (export OPENAI_API_KEY)")]
    MissingApiKey,

    #[error("failed to connect to completion endpoint: {0}")]
    ConnectionError(String),

    #[error("completion endpoint error: {0}")]
    ServerError(String),

    #[error("completion request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid completion response: {0}")]
    InvalidResponse(String),
}

impl Retryable for CompletionError {
    fn is_retryable(&self) -> bool {
        match self {
            CompletionError::ConnectionError(_) => true,
            CompletionError::ServerError(msg) => is_transient_message(msg),
            CompletionError::RequestError(e) => e.is_timeout() || e.is_connect(),
            CompletionError::MissingApiKey | CompletionError::InvalidResponse(_) => false,
        }
    }
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

/// Errors from the ingestion path.
///
/// Embedding failures abort the whole run. Upsert failures are isolated
/// per batch by the uploader and never surface as an `IngestError`.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("index error: {0}")]
    IndexError(#[from] IndexError),

    #[error("no documents found")]
    NoDocuments,
}

/// Errors from the query path, caught at the interactive loop.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("index error: {0}")]
    IndexError(#[from] IndexError),

    #[error("completion error: {0}")]
    CompletionError(#[from] CompletionError),
}

/// Heuristic check for transient failure messages from remote services.
fn is_transient_message(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    msg.contains("503")
        || msg.contains("502")
        || msg.contains("504")
        || msg.contains("429")
        || msg.contains("timeout")
        || msg.contains("connection")
        || msg.contains("unavailable")
        || msg.contains("too many requests")
}
