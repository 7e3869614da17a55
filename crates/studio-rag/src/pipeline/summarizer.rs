//! Summarization suite: raw text, article URLs, uploaded files, and OCR
//! extraction from images

use crate::config::StudioConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::ingestion::{FileLoader, UrlLoader};
use crate::providers::{CompletionOptions, OcrEngine, ProviderSet};

const FETCH_TIMEOUT_SECS: u64 = 30;

/// Provider-backed summarizer
pub struct Summarizer {
    providers: ProviderSet,
    ocr: OcrEngine,
    file_loader: FileLoader,
    url_loader: UrlLoader,
    options: CompletionOptions,
}

impl Summarizer {
    /// Create a summarizer from configuration and the shared provider set
    pub fn new(config: &StudioConfig, providers: ProviderSet) -> Result<Self> {
        Ok(Self {
            providers,
            ocr: OcrEngine::new(&config.ocr),
            file_loader: FileLoader::new(),
            url_loader: UrlLoader::new(FETCH_TIMEOUT_SECS)?,
            options: CompletionOptions {
                max_tokens: config.generation.summary_max_tokens,
                temperature: config.generation.answer_temperature,
            },
        })
    }

    /// Summarize raw text
    pub async fn summarize_text(&self, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::invalid_input("text to summarize must not be empty"));
        }

        let prompt = PromptBuilder::build_summary_prompt(text);
        self.providers.llm.complete(&prompt, &self.options).await
    }

    /// Fetch a web article and summarize it
    pub async fn summarize_url(&self, url: &str) -> Result<String> {
        let outcome = self.url_loader.load(&[url.to_string()]).await?;
        let article = &outcome.documents[0];
        tracing::info!(
            "summarizing {} ({} chars)",
            article.identifier,
            article.content.len()
        );
        self.summarize_text(&article.content).await
    }

    /// Parse an uploaded file and summarize its text
    pub async fn summarize_file(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let outcome = self
            .file_loader
            .load(&[(filename.to_string(), bytes.to_vec())])?;
        self.summarize_text(&outcome.documents[0].content).await
    }

    /// Extract text from an image via OCR
    ///
    /// Returns `None` when the image yields no text; OCR failures surface
    /// as [`Error::Ocr`].
    pub fn extract_image_text(&self, image: &[u8]) -> Result<Option<String>> {
        let text = self.ocr.extract_text(image)?;
        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
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

    struct CannedLlm;

    #[async_trait]
    impl CompletionProvider for CannedLlm {
        async fn complete(&self, prompt: &str, _options: &CompletionOptions) -> Result<String> {
            assert!(prompt.contains("Summarize the following text"));
            Ok("a short summary".to_string())
        }

        fn name(&self) -> &str {
            "canned"
        }

        fn model(&self) -> &str {
            "canned"
        }
    }

    fn summarizer() -> Summarizer {
        let llm: Arc<dyn CompletionProvider> = Arc::new(CannedLlm);
        let providers = ProviderSet {
            embedder: Arc::new(StubEmbedder),
            code_llm: Arc::clone(&llm),
            llm,
        };
        Summarizer::new(&StudioConfig::default(), providers).unwrap()
    }

    #[tokio::test]
    async fn summarizes_raw_text() {
        let summary = summarizer()
            .summarize_text("A long passage about many things.")
            .await
            .unwrap();
        assert_eq!(summary, "a short summary");
    }

    #[tokio::test]
    async fn empty_text_is_invalid_input() {
        let err = summarizer().summarize_text("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn summarizes_an_uploaded_text_file() {
        let summary = summarizer()
            .summarize_file("notes.txt", b"facts worth compressing")
            .await
            .unwrap();
        assert_eq!(summary, "a short summary");
    }

    #[tokio::test]
    async fn invalid_url_fails_before_fetching() {
        let err = summarizer().summarize_url("not-a-url").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
