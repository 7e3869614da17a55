//! Vector index for chunk storage and similarity search

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Chunk;

const INDEX_FILE: &str = "index.json";

/// Search result with chunk and similarity
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity (higher is better)
    pub similarity: f32,
}

/// On-disk index layout
#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    version: u32,
    dimensions: usize,
    created_at: chrono::DateTime<chrono::Utc>,
    records: Vec<Chunk>,
}

/// A durable collection of embedded chunks supporting cosine top-k lookup
///
/// One index lives per pipeline variant at a fixed directory. A process
/// action rebuilds it wholesale; [`VectorIndex::save`] replaces the prior
/// file atomically so a failed build never leaves a partial index behind.
#[derive(Debug)]
pub struct VectorIndex {
    dimensions: usize,
    records: Vec<Chunk>,
}

impl VectorIndex {
    /// Build an index from embedded chunks
    ///
    /// Every chunk must carry an embedding and all embeddings must share
    /// one dimensionality.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Result<Self> {
        let dimensions = chunks
            .first()
            .map(|c| c.embedding.len())
            .ok_or_else(|| Error::VectorIndex("cannot build an empty index".to_string()))?;

        if dimensions == 0 {
            return Err(Error::VectorIndex("chunk has no embedding".to_string()));
        }

        for chunk in &chunks {
            if chunk.embedding.len() != dimensions {
                return Err(Error::VectorIndex(format!(
                    "inconsistent embedding dimensions: expected {}, got {}",
                    dimensions,
                    chunk.embedding.len()
                )));
            }
        }

        Ok(Self {
            dimensions,
            records: chunks,
        })
    }

    /// Persist to `dir`, fully replacing any prior index there
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let persisted = PersistedIndex {
            version: 1,
            dimensions: self.dimensions,
            created_at: chrono::Utc::now(),
            records: self.records.clone(),
        };

        // Write to a sibling temp file and rename so readers never observe
        // a half-written index
        let final_path = dir.join(INDEX_FILE);
        let tmp_path = dir.join(format!("{}.tmp", INDEX_FILE));
        std::fs::write(&tmp_path, serde_json::to_vec(&persisted)?)?;
        std::fs::rename(&tmp_path, &final_path)?;

        tracing::info!(
            "persisted index with {} records to {}",
            self.records.len(),
            final_path.display()
        );
        Ok(())
    }

    /// Load a previously persisted index from `dir`
    ///
    /// Fails with [`Error::IndexNotBuilt`] when nothing has been persisted
    /// there yet.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(INDEX_FILE);
        if !path.exists() {
            return Err(Error::IndexNotBuilt(dir.display().to_string()));
        }

        let raw = std::fs::read(&path)?;
        let persisted: PersistedIndex = serde_json::from_slice(&raw)
            .map_err(|e| Error::VectorIndex(format!("corrupt index file: {}", e)))?;

        Ok(Self {
            dimensions: persisted.dimensions,
            records: persisted.records,
        })
    }

    /// Check whether an index has been persisted at `dir`
    pub fn exists(dir: &Path) -> bool {
        dir.join(INDEX_FILE).exists()
    }

    /// Retrieve the `top_k` most similar chunks to the query embedding,
    /// dropping results below `threshold`
    pub fn search(&self, query: &[f32], top_k: usize, threshold: f32) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .records
            .iter()
            .map(|chunk| SearchResult {
                similarity: cosine_similarity(query, &chunk.embedding),
                chunk: chunk.clone(),
            })
            .filter(|r| r.similarity >= threshold)
            .collect();

        results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        results.truncate(top_k);
        results
    }

    /// Number of records in the index
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the index holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Embedding dimensionality
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Cosine similarity between two vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkSource, FileType, SourceKind};
    use uuid::Uuid;

    fn embedded_chunk(content: &str, embedding: Vec<f32>, index: u32) -> Chunk {
        let mut chunk = Chunk::new(
            Uuid::new_v4(),
            content.to_string(),
            ChunkSource {
                identifier: "corpus.txt".to_string(),
                kind: SourceKind::File(FileType::Txt),
            },
            0,
            content.len(),
            index,
        );
        chunk.embedding = embedding;
        chunk
    }

    #[test]
    fn cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn search_ranks_by_similarity() {
        let index = VectorIndex::from_chunks(vec![
            embedded_chunk("east", vec![1.0, 0.0], 0),
            embedded_chunk("north", vec![0.0, 1.0], 1),
            embedded_chunk("northeast", vec![0.7, 0.7], 2),
        ])
        .unwrap();

        let results = index.search(&[1.0, 0.0], 2, 0.0);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "east");
        assert_eq!(results[1].chunk.content, "northeast");
        assert!(results[0].similarity > results[1].similarity);
    }

    #[test]
    fn threshold_filters_weak_matches() {
        let index = VectorIndex::from_chunks(vec![
            embedded_chunk("east", vec![1.0, 0.0], 0),
            embedded_chunk("north", vec![0.0, 1.0], 1),
        ])
        .unwrap();

        let results = index.search(&[1.0, 0.0], 10, 0.5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.content, "east");
    }

    #[test]
    fn rejects_empty_or_inconsistent_chunks() {
        assert!(matches!(
            VectorIndex::from_chunks(vec![]).unwrap_err(),
            Error::VectorIndex(_)
        ));

        let no_embedding = embedded_chunk("a", vec![], 0);
        assert!(VectorIndex::from_chunks(vec![no_embedding]).is_err());

        let mixed = vec![
            embedded_chunk("a", vec![1.0, 0.0], 0),
            embedded_chunk("b", vec![1.0], 1),
        ];
        assert!(VectorIndex::from_chunks(mixed).is_err());
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::from_chunks(vec![embedded_chunk("alpha", vec![0.1, 0.2], 0)])
            .unwrap();
        index.save(dir.path()).unwrap();

        assert!(VectorIndex::exists(dir.path()));
        let loaded = VectorIndex::load(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.dimensions(), 2);
        assert_eq!(loaded.records[0].content, "alpha");
    }

    #[test]
    fn load_without_prior_index_is_not_built() {
        let dir = tempfile::tempdir().unwrap();
        let err = VectorIndex::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::IndexNotBuilt(_)));
    }

    #[test]
    fn save_replaces_prior_index_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let first = VectorIndex::from_chunks(vec![
            embedded_chunk("one", vec![1.0, 0.0], 0),
            embedded_chunk("two", vec![0.0, 1.0], 1),
        ])
        .unwrap();
        first.save(dir.path()).unwrap();

        let second =
            VectorIndex::from_chunks(vec![embedded_chunk("replacement", vec![0.5, 0.5], 0)])
                .unwrap();
        second.save(dir.path()).unwrap();

        let loaded = VectorIndex::load(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.records[0].content, "replacement");
    }
}
