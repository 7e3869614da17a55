//! Error types for the studio pipelines

use thiserror::Error;

/// Result type alias for studio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Studio errors
///
/// Variants are grouped by how callers should react: input validation and
/// credential errors are reported before any external call is made,
/// `IndexNotBuilt` is a state precondition, and provider errors surface a
/// failed external call without retrying it.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or empty API credential for the hosted backend
    #[error("API key is required for the hosted backend")]
    MissingCredential,

    /// Invalid user input (no valid URLs, no loadable files, empty question)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// File parsing error
    #[error("Failed to parse '{source_name}': {message}")]
    FileParse { source_name: String, message: String },

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector index error
    #[error("Vector index error: {0}")]
    VectorIndex(String),

    /// No index has been built yet at the pipeline's storage path
    #[error("No index found for {0}; run a process action first")]
    IndexNotBuilt(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// OCR extraction error
    #[error("OCR error: {0}")]
    Ocr(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// True for errors that are detected before any external call is made
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential | Self::InvalidInput(_) | Self::IndexNotBuilt(_)
        )
    }
}
