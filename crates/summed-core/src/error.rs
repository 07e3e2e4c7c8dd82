//! Error types for SumMed.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The language detector failed or returned nothing usable.
    #[error("Language detection error: {0}")]
    LanguageDetection(String),

    /// A linguistic pipeline could not be loaded. The key stays uncached.
    #[error("Failed to load language model '{key}': {reason}")]
    Load { key: String, reason: String },

    /// The batched entity-extraction call failed.
    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
