//! Provider abstractions for embeddings, completions, and OCR
//!
//! Backend selection happens exactly once in [`ProviderSet::from_config`];
//! call sites hold trait objects and never branch on the backend.

pub mod completion;
pub mod embedding;
pub mod ocr;
pub mod ollama;
pub mod openai;

use std::sync::Arc;

use crate::config::{BackendProvider, StudioConfig};
use crate::error::Result;

pub use completion::{CompletionOptions, CompletionProvider};
pub use embedding::EmbeddingProvider;
pub use ocr::OcrEngine;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};
pub use openai::{OpenAiClient, OpenAiEmbedder, OpenAiLlm};

/// The provider instances used by every pipeline, constructed once at
/// process start and passed by reference
#[derive(Clone)]
pub struct ProviderSet {
    /// Embedding provider
    pub embedder: Arc<dyn EmbeddingProvider>,
    /// Completion provider for answers and summaries
    pub llm: Arc<dyn CompletionProvider>,
    /// Completion provider for code generation (a dedicated model on the
    /// hosted backend, the general model on the local one)
    pub code_llm: Arc<dyn CompletionProvider>,
}

impl std::fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSet").finish_non_exhaustive()
    }
}

impl ProviderSet {
    /// Build the provider set for the configured backend
    ///
    /// For the hosted backend a missing or empty API key fails here, before
    /// any external call is attempted.
    pub fn from_config(config: &StudioConfig) -> Result<Self> {
        match config.backend {
            BackendProvider::Hosted => {
                tracing::info!("using hosted backend ({})", config.hosted.base_url);
                let client = Arc::new(OpenAiClient::new(&config.hosted)?);
                let embedder = Arc::new(OpenAiEmbedder::new(Arc::clone(&client)));
                let llm = Arc::new(OpenAiLlm::new(
                    Arc::clone(&client),
                    config.hosted.chat_model.clone(),
                ));
                let code_llm = Arc::new(OpenAiLlm::new(
                    client,
                    config.hosted.code_model.clone(),
                ));
                Ok(Self {
                    embedder,
                    llm,
                    code_llm,
                })
            }
            BackendProvider::Local => {
                tracing::info!("using local backend ({})", config.local.base_url);
                let client = Arc::new(OllamaClient::new(&config.local));
                let embedder = Arc::new(OllamaEmbedder::new(Arc::clone(&client)));
                let llm: Arc<dyn CompletionProvider> = Arc::new(OllamaLlm::new(client));
                Ok(Self {
                    embedder,
                    code_llm: Arc::clone(&llm),
                    llm,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn hosted_backend_without_key_is_a_precondition_failure() {
        let config = StudioConfig::default();
        assert!(config.hosted.api_key.is_none());
        let err = ProviderSet::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::MissingCredential));
        assert!(err.is_precondition());
    }

    #[test]
    fn hosted_backend_rejects_blank_key() {
        let mut config = StudioConfig::default();
        config.hosted.api_key = Some("   ".to_string());
        let err = ProviderSet::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::MissingCredential));
    }

    #[test]
    fn local_backend_needs_no_credential() {
        let mut config = StudioConfig::default();
        config.backend = BackendProvider::Local;
        let providers = ProviderSet::from_config(&config).unwrap();
        assert_eq!(providers.embedder.name(), "ollama");
        assert_eq!(providers.llm.name(), "ollama");
    }

    #[test]
    fn hosted_backend_selects_distinct_code_model() {
        let mut config = StudioConfig::default();
        config.hosted.api_key = Some("sk-test".to_string());
        config.hosted.code_model = "code-model-x".to_string();
        let providers = ProviderSet::from_config(&config).unwrap();
        assert_eq!(providers.llm.name(), "openai");
        assert_eq!(providers.code_llm.model(), "code-model-x");
    }
}
