//! Core data types shared across the pipelines

pub mod document;
pub mod response;

pub use document::{Chunk, ChunkSource, Document, FileType, SourceKind};
pub use response::{Answer, Citation, DocumentSummary, ProcessReport};
