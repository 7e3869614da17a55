//! Completion provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Sampling options for a single completion call
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    /// Token budget for the response
    pub max_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

/// Trait for prompt-in, text-out generation
///
/// Implementations:
/// - [`super::OpenAiLlm`]: hosted OpenAI-compatible chat API
/// - [`super::OllamaLlm`]: local Ollama server
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a completion for the given prompt
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// The model being used
    fn model(&self) -> &str;
}
