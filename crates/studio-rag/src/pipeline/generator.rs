//! Text-to-code generation through the completion provider

use crate::config::StudioConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{CompletionOptions, ProviderSet};

/// Provider-backed code generator
pub struct CodeGenerator {
    providers: ProviderSet,
    options: CompletionOptions,
}

impl CodeGenerator {
    /// Create a generator from configuration and the shared provider set
    pub fn new(config: &StudioConfig, providers: ProviderSet) -> Self {
        Self {
            providers,
            options: CompletionOptions {
                max_tokens: config.generation.code_max_tokens,
                temperature: config.generation.answer_temperature,
            },
        }
    }

    /// Generate code from a natural-language request
    pub async fn generate(&self, description: &str) -> Result<String> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::invalid_input("code request must not be empty"));
        }

        let prompt = PromptBuilder::build_code_prompt(description);
        self.providers.code_llm.complete(&prompt, &self.options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{CompletionProvider, EmbeddingProvider};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0; 8])
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct CodeLlm;

    #[async_trait]
    impl CompletionProvider for CodeLlm {
        async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String> {
            assert!(prompt.contains("fizzbuzz"));
            assert_eq!(options.max_tokens, 200);
            Ok("fn fizzbuzz() {}".to_string())
        }

        fn name(&self) -> &str {
            "code"
        }

        fn model(&self) -> &str {
            "code"
        }
    }

    #[tokio::test]
    async fn routes_requests_through_the_code_provider() {
        let providers = ProviderSet {
            embedder: Arc::new(StubEmbedder),
            llm: Arc::new(CodeLlm),
            code_llm: Arc::new(CodeLlm),
        };
        let generator = CodeGenerator::new(&StudioConfig::default(), providers);
        let code = generator.generate("write fizzbuzz in rust").await.unwrap();
        assert!(code.contains("fizzbuzz"));
    }

    #[tokio::test]
    async fn empty_request_is_invalid_input() {
        let providers = ProviderSet {
            embedder: Arc::new(StubEmbedder),
            llm: Arc::new(CodeLlm),
            code_llm: Arc::new(CodeLlm),
        };
        let generator = CodeGenerator::new(&StudioConfig::default(), providers);
        let err = generator.generate("  ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
