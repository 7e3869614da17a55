//! studio-rag: document and article question answering with source
//! citations, plus a provider-backed summarization and generation suite
//!
//! The QnA core loads content from uploaded files or article URLs, chunks
//! it, embeds the chunks through a configurable provider, and persists a
//! per-pipeline vector index. Questions are answered strictly from
//! retrieved chunks with the originating sources enumerated. All model
//! work is delegated to a hosted OpenAI-compatible API or a local Ollama
//! fallback, selected once at configuration time.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod types;

pub use config::{BackendProvider, StudioConfig};
pub use error::{Error, Result};
pub use pipeline::{CodeGenerator, PipelineVariant, QnaPipeline, Summarizer};
pub use providers::ProviderSet;
pub use types::{Answer, Chunk, Citation, Document, ProcessReport};
