//! Question-answering pipelines over uploaded documents and article URLs
//!
//! Each variant owns one persisted index and moves between two states:
//! unindexed (nothing persisted yet) and indexed. A process action always
//! rebuilds the index from scratch; asking a question is only valid once an
//! index exists.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use uuid::Uuid;

use crate::config::{ChunkingConfig, GenerationConfig, RetrievalConfig, StudioConfig};
use crate::error::{Error, Result};
use crate::generation::{strip_path_artifacts, PromptBuilder};
use crate::ingestion::{FileLoader, LoadOutcome, RecursiveChunker, UrlLoader};
use crate::providers::{CompletionOptions, ProviderSet};
use crate::retrieval::VectorIndex;
use crate::types::{Answer, Citation, DocumentSummary, ProcessReport};

/// Timeout for fetching article URLs
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Which QnA pipeline an index belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineVariant {
    /// Uploaded-document pipeline
    Documents,
    /// URL-article pipeline
    Articles,
}

impl PipelineVariant {
    /// Directory name under the storage root
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Documents => "documents",
            Self::Articles => "articles",
        }
    }
}

impl std::fmt::Display for PipelineVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A question-answering pipeline bound to one index directory
pub struct QnaPipeline {
    variant: PipelineVariant,
    chunking: ChunkingConfig,
    retrieval: RetrievalConfig,
    generation: GenerationConfig,
    index_dir: PathBuf,
    providers: ProviderSet,
    file_loader: FileLoader,
    url_loader: UrlLoader,
}

impl QnaPipeline {
    /// Create a pipeline for the given variant
    pub fn new(
        config: &StudioConfig,
        providers: ProviderSet,
        variant: PipelineVariant,
    ) -> Result<Self> {
        let chunking = match variant {
            PipelineVariant::Documents => config.chunking.documents.clone(),
            PipelineVariant::Articles => config.chunking.articles.clone(),
        };

        Ok(Self {
            variant,
            chunking,
            retrieval: config.retrieval.clone(),
            generation: config.generation.clone(),
            index_dir: config.storage.root.join(variant.dir_name()),
            providers,
            file_loader: FileLoader::new(),
            url_loader: UrlLoader::new(FETCH_TIMEOUT_SECS)?,
        })
    }

    /// The variant this pipeline serves
    pub fn variant(&self) -> PipelineVariant {
        self.variant
    }

    /// Whether an index has been persisted for this pipeline
    pub fn is_indexed(&self) -> bool {
        VectorIndex::exists(&self.index_dir)
    }

    /// Process uploaded files into a fresh index, replacing any prior one
    pub async fn process_files(&self, files: &[(String, Vec<u8>)]) -> Result<ProcessReport> {
        let started = Instant::now();
        let outcome = self.file_loader.load(files)?;
        self.build_index(outcome, started).await
    }

    /// Process article URLs into a fresh index, replacing any prior one
    ///
    /// URL validation runs before any fetch; zero valid URLs aborts with an
    /// input-validation error and leaves any existing index untouched.
    pub async fn process_urls(&self, urls: &[String]) -> Result<ProcessReport> {
        let started = Instant::now();
        let outcome = self.url_loader.load(urls).await?;
        self.build_index(outcome, started).await
    }

    /// Chunk, embed, and persist the loaded documents
    ///
    /// Embeddings for every chunk are computed before anything is written,
    /// so a provider failure leaves the previously persisted index as the
    /// last-good state.
    async fn build_index(&self, outcome: LoadOutcome, started: Instant) -> Result<ProcessReport> {
        let LoadOutcome { documents, skipped } = outcome;

        let chunker = RecursiveChunker::new(&self.chunking);
        let mut chunks = Vec::new();
        for doc in &documents {
            chunks.extend(chunker.chunk_document(doc));
        }

        if chunks.is_empty() {
            return Err(Error::invalid_input(
                "the loaded sources contained no chunkable text",
            ));
        }

        tracing::info!(
            "embedding {} chunks from {} sources for the {} index",
            chunks.len(),
            documents.len(),
            self.variant
        );

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.providers.embedder.embed_batch(&texts).await?;
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        let mut chunks_per_doc: HashMap<Uuid, u32> = HashMap::new();
        for chunk in &chunks {
            *chunks_per_doc.entry(chunk.document_id).or_default() += 1;
        }
        let total_chunks = chunks.len() as u32;

        let index = VectorIndex::from_chunks(chunks)?;
        index.save(&self.index_dir)?;

        let documents = documents
            .iter()
            .map(|doc| {
                let mut summary = DocumentSummary::from(doc);
                summary.chunks = chunks_per_doc.get(&doc.id).copied().unwrap_or(0);
                summary
            })
            .collect();

        Ok(ProcessReport {
            documents,
            total_chunks,
            skipped,
            processing_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Answer a question from the persisted index
    ///
    /// Fails with the not-yet-initialized precondition, before any provider
    /// call, when no index exists for this pipeline.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let started = Instant::now();

        let question = question.trim();
        if question.is_empty() {
            return Err(Error::invalid_input("question must not be empty"));
        }

        let index = VectorIndex::load(&self.index_dir).map_err(|e| match e {
            Error::IndexNotBuilt(_) => Error::IndexNotBuilt(self.variant.to_string()),
            other => other,
        })?;

        let query_embedding = self.providers.embedder.embed(question).await?;
        let results = index.search(
            &query_embedding,
            self.retrieval.top_k,
            self.retrieval.similarity_threshold,
        );

        let citations: Vec<Citation> = results
            .iter()
            .map(|r| Citation::from_chunk(&r.chunk, r.similarity))
            .collect();

        let context = PromptBuilder::build_context(&results);
        let prompt = PromptBuilder::build_qna_prompt(question, &context, &citations);

        let options = CompletionOptions {
            max_tokens: self.generation.answer_max_tokens,
            temperature: self.generation.answer_temperature,
        };
        let raw = self.providers.llm.complete(&prompt, &options).await?;
        let text = strip_path_artifacts(&raw);

        Ok(Answer::new(
            text,
            citations,
            started.elapsed().as_millis() as u64,
        ))
    }
}
