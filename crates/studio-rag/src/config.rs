//! Configuration for the studio pipelines

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main studio configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StudioConfig {
    /// Backend provider (hosted API or local fallback)
    #[serde(default)]
    pub backend: BackendProvider,
    /// Hosted API configuration (required when backend = hosted)
    #[serde(default)]
    pub hosted: HostedConfig,
    /// Local model server configuration
    #[serde(default)]
    pub local: LocalLlmConfig,
    /// Chunking configuration per pipeline variant
    #[serde(default)]
    pub chunking: ChunkingProfiles,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Index storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Generation options per operation
    #[serde(default)]
    pub generation: GenerationConfig,
    /// OCR configuration
    #[serde(default)]
    pub ocr: OcrConfig,
}

impl StudioConfig {
    /// Load configuration from a TOML file, falling back to defaults when no
    /// path is given. The hosted API key may also be supplied through the
    /// `OPENAI_API_KEY` environment variable.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("failed to read {}: {}", path.display(), e))
                })?;
                toml::from_str(&raw)
                    .map_err(|e| Error::Config(format!("invalid config file: {}", e)))?
            }
            None => Self::default(),
        };

        if config.hosted.api_key.is_none() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                if !key.trim().is_empty() {
                    config.hosted.api_key = Some(key);
                }
            }
        }

        Ok(config)
    }
}

/// Backend provider selection
///
/// Chosen once at configuration time; call sites never branch on it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendProvider {
    /// Hosted OpenAI-compatible API (requires an API key)
    #[default]
    Hosted,
    /// Local fallback model server (Ollama)
    Local,
}

/// Hosted API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedConfig {
    /// API key; absence is a precondition failure for the hosted backend
    #[serde(default)]
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Chat/completion model
    pub chat_model: String,
    /// Embedding model
    pub embed_model: String,
    /// Code generation model
    pub code_model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            embed_model: "text-embedding-3-small".to_string(),
            code_model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Local model server (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalLlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LocalLlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "phi3".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
    /// Split separators in priority order; the chunker hard-cuts by
    /// character once the list is exhausted
    pub separators: Vec<String>,
}

impl ChunkingConfig {
    /// Defaults for the uploaded-document pipeline
    pub fn documents() -> Self {
        Self {
            chunk_size: 1500,
            chunk_overlap: 200,
            separators: vec![
                "\n\n".to_string(),
                "\n".to_string(),
                ". ".to_string(),
                " ".to_string(),
            ],
        }
    }

    /// Defaults for the URL-article pipeline
    pub fn articles() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separators: vec![
                "\n\n".to_string(),
                "\n".to_string(),
                ".".to_string(),
                ",".to_string(),
            ],
        }
    }
}

/// Chunking profiles per pipeline variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingProfiles {
    pub documents: ChunkingConfig,
    pub articles: ChunkingConfig,
}

impl Default for ChunkingProfiles {
    fn default() -> Self {
        Self {
            documents: ChunkingConfig::documents(),
            articles: ChunkingConfig::articles(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per question
    pub top_k: usize,
    /// Minimum similarity for a chunk to be considered (0.0 disables)
    pub similarity_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            similarity_threshold: 0.0,
        }
    }
}

/// Index storage configuration
///
/// Each pipeline variant owns one directory under `root`. The directory is
/// replaced wholesale on every process action; concurrent writers are
/// last-writer-wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for persisted indexes
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let root = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studio-rag");
        Self { root }
    }
}

/// Generation options per operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature for QnA answers
    pub answer_temperature: f32,
    /// Token budget for QnA answers
    pub answer_max_tokens: usize,
    /// Token budget for summaries
    pub summary_max_tokens: usize,
    /// Token budget for generated code
    pub code_max_tokens: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            answer_temperature: 0.7,
            answer_max_tokens: 1000,
            summary_max_tokens: 300,
            code_max_tokens: 200,
        }
    }
}

/// OCR (tesseract) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract executable name or path
    pub command: String,
    /// OCR language
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_backend_is_hosted() {
        let config = StudioConfig::default();
        assert_eq!(config.backend, BackendProvider::Hosted);
        assert!(config.hosted.api_key.is_none());
    }

    #[test]
    fn chunking_profiles_match_pipeline_variants() {
        let profiles = ChunkingProfiles::default();
        assert_eq!(profiles.documents.chunk_size, 1500);
        assert_eq!(profiles.articles.chunk_size, 1000);
        assert_eq!(profiles.documents.chunk_overlap, 200);
    }

    #[test]
    fn parses_toml_config() {
        let raw = r#"
            backend = "local"

            [local]
            base_url = "http://127.0.0.1:11434"
            embed_model = "nomic-embed-text"
            generate_model = "llama3.2:1b"
            timeout_secs = 30
        "#;
        let config: StudioConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.backend, BackendProvider::Local);
        assert_eq!(config.local.generate_model, "llama3.2:1b");
        // Unspecified sections fall back to defaults
        assert_eq!(config.retrieval.top_k, 4);
    }
}
