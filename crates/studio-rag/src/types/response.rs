//! Answer and report types returned by the pipelines

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::{Chunk, Document, SourceKind};

/// Citation from a retrieved chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// Chunk ID
    pub chunk_id: Uuid,
    /// Document ID
    pub document_id: Uuid,
    /// Source identifier: file name or URL
    pub source: String,
    /// Source kind
    pub kind: SourceKind,
    /// Chunk index within its document
    pub chunk_index: u32,
    /// Exact snippet from the source
    pub snippet: String,
    /// Similarity score (0.0-1.0)
    pub similarity: f32,
}

impl Citation {
    /// Create a citation from a chunk and similarity score
    pub fn from_chunk(chunk: &Chunk, similarity: f32) -> Self {
        Self {
            chunk_id: chunk.id,
            document_id: chunk.document_id,
            source: chunk.source.identifier.clone(),
            kind: chunk.source.kind.clone(),
            chunk_index: chunk.chunk_index,
            snippet: chunk.content.clone(),
            similarity,
        }
    }

    /// Format citation for display in text
    pub fn format_inline(&self) -> String {
        format!("[Source: {}]", self.source)
    }
}

/// Answer to a question, composed from retrieved context
///
/// Produced per query and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Composed answer text
    pub text: String,
    /// Deduplicated source identifiers backing the answer
    pub sources: Vec<String>,
    /// Citations with snippets and similarity scores
    pub citations: Vec<Citation>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl Answer {
    /// Create an answer, deriving the source list from the citations
    pub fn new(text: String, citations: Vec<Citation>, processing_time_ms: u64) -> Self {
        let mut sources: Vec<String> = Vec::new();
        for citation in &citations {
            if !sources.contains(&citation.source) {
                sources.push(citation.source.clone());
            }
        }
        Self {
            text,
            sources,
            citations,
            processing_time_ms,
        }
    }
}

/// Summary of one processed source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document ID
    pub id: Uuid,
    /// Source identifier
    pub identifier: String,
    /// Source kind
    pub kind: SourceKind,
    /// Number of chunks created
    pub chunks: u32,
    /// Extracted text length in characters
    pub content_len: usize,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            identifier: doc.identifier.clone(),
            kind: doc.kind.clone(),
            chunks: 0,
            content_len: doc.content.len(),
        }
    }
}

/// Report from a process action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessReport {
    /// Processed sources
    pub documents: Vec<DocumentSummary>,
    /// Total chunks written to the index
    pub total_chunks: u32,
    /// Inputs skipped with a warning (unsupported extensions)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<String>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::{ChunkSource, FileType};

    fn chunk_for(source: &str) -> Chunk {
        Chunk::new(
            Uuid::new_v4(),
            "snippet text".to_string(),
            ChunkSource {
                identifier: source.to_string(),
                kind: SourceKind::File(FileType::Txt),
            },
            0,
            12,
            0,
        )
    }

    #[test]
    fn answer_deduplicates_sources_in_order() {
        let citations = vec![
            Citation::from_chunk(&chunk_for("a.txt"), 0.9),
            Citation::from_chunk(&chunk_for("b.txt"), 0.8),
            Citation::from_chunk(&chunk_for("a.txt"), 0.7),
        ];
        let answer = Answer::new("text".to_string(), citations, 5);
        assert_eq!(answer.sources, vec!["a.txt", "b.txt"]);
    }
}
