//! Text chunking with separator-priority splitting and overlap

use crate::config::ChunkingConfig;
use crate::types::{Chunk, ChunkSource, Document};

/// Recursive character chunker
///
/// Splits text on the first separator in priority order that yields pieces
/// within the size bound (paragraph break, then line break, then sentence
/// boundary, then space), hard-cutting by character when the list is
/// exhausted. The trailing `chunk_overlap` characters of each emitted chunk
/// are prepended to the next so context survives window boundaries.
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveChunker {
    /// Create a chunker from a chunking profile
    pub fn new(config: &ChunkingConfig) -> Self {
        let chunk_size = config.chunk_size.max(2);
        // Overlap must leave room for new content in every window
        let chunk_overlap = config.chunk_overlap.min(chunk_size / 2);
        Self {
            chunk_size,
            chunk_overlap,
            separators: config.separators.clone(),
        }
    }

    /// Chunk a document, tagging every chunk with its source
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        let source = ChunkSource {
            identifier: doc.identifier.clone(),
            kind: doc.kind.clone(),
        };

        let mut chunks = Vec::new();
        for (content, start) in self.split_text(&doc.content) {
            if content.trim().is_empty() {
                continue;
            }
            let end = start + content.len();
            chunks.push(Chunk::new(
                doc.id,
                content,
                source.clone(),
                start,
                end,
                chunks.len() as u32,
            ));
        }
        chunks
    }

    /// Split text into overlapping windows, returning each window with its
    /// byte offset in the original text
    pub fn split_text(&self, text: &str) -> Vec<(String, usize)> {
        // Pieces are bounded by the stride so that prepending the overlap
        // never pushes a window past chunk_size
        let stride = (self.chunk_size - self.chunk_overlap).max(1);
        let pieces = self.split_recursive(text, &self.separators, stride);
        self.pack(pieces)
    }

    /// Split `text` into pieces no longer than `limit`, preferring the
    /// earliest separator that gets a piece under the bound
    fn split_recursive(&self, text: &str, separators: &[String], limit: usize) -> Vec<String> {
        if text.len() <= limit {
            return vec![text.to_string()];
        }

        let Some((separator, rest)) = separators.split_first() else {
            return hard_cut(text, limit);
        };

        if separator.is_empty() {
            return hard_cut(text, limit);
        }

        let mut pieces = Vec::new();
        for piece in text.split_inclusive(separator.as_str()) {
            if piece.len() <= limit {
                pieces.push(piece.to_string());
            } else {
                pieces.extend(self.split_recursive(piece, rest, limit));
            }
        }
        pieces
    }

    /// Pack pieces into windows of at most `chunk_size`, carrying the
    /// overlap tail of each emitted window into the next
    fn pack(&self, pieces: Vec<String>) -> Vec<(String, usize)> {
        let mut windows = Vec::new();
        let mut current = String::new();
        let mut current_start = 0usize;
        let mut consumed = 0usize;

        for piece in pieces {
            if !current.is_empty() && current.len() + piece.len() > self.chunk_size {
                let tail = overlap_tail(&current, self.chunk_overlap);
                windows.push((std::mem::take(&mut current), current_start));
                current_start = consumed - tail.len();
                current = tail;
            }
            consumed += piece.len();
            current.push_str(&piece);
        }

        if !current.is_empty() {
            windows.push((current, current_start));
        }

        windows
    }
}

/// Cut text into character-boundary-safe windows of at most `limit` bytes
fn hard_cut(text: &str, limit: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let mut end = (start + limit).min(text.len());
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            // A single character wider than the limit; emit it whole
            end = (start + limit).min(text.len());
            while end < text.len() && !text.is_char_boundary(end) {
                end += 1;
            }
        }
        pieces.push(text[start..end].to_string());
        start = end;
    }
    pieces
}

/// Take the trailing `overlap` bytes of `text` at a character boundary
fn overlap_tail(text: &str, overlap: usize) -> String {
    if overlap == 0 {
        return String::new();
    }
    if text.len() <= overlap {
        return text.to_string();
    }
    let mut start = text.len() - overlap;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileType, SourceKind};

    fn chunker(size: usize, overlap: usize, separators: &[&str]) -> RecursiveChunker {
        RecursiveChunker::new(&ChunkingConfig {
            chunk_size: size,
            chunk_overlap: overlap,
            separators: separators.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn doc(content: &str) -> Document {
        Document::new(
            "corpus.txt".to_string(),
            SourceKind::File(FileType::Txt),
            content.to_string(),
            "hash".to_string(),
        )
    }

    fn long_text() -> String {
        let mut text = String::new();
        for i in 0..40 {
            text.push_str(&format!(
                "Sentence number {} talks about a different topic entirely. ",
                i
            ));
            if i % 5 == 4 {
                text.push_str("\n\n");
            }
        }
        text
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunker = chunker(1000, 100, &["\n\n", "\n", ". ", " "]);
        let chunks = chunker.chunk_document(&doc("just one short line"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "just one short line");
        assert_eq!(chunks[0].char_start, 0);
    }

    #[test]
    fn every_chunk_respects_the_size_bound() {
        for (size, overlap) in [(120, 20), (200, 50), (80, 10)] {
            let chunker = chunker(size, overlap, &["\n\n", "\n", ". ", " "]);
            for chunk in chunker.chunk_document(&doc(&long_text())) {
                assert!(
                    chunk.content.len() <= size,
                    "chunk of {} bytes exceeds bound {}",
                    chunk.content.len(),
                    size
                );
            }
        }
    }

    #[test]
    fn adjacent_chunks_share_an_overlap_affix() {
        for (size, overlap) in [(120, 20), (300, 60), (90, 30)] {
            let chunker = chunker(size, overlap, &["\n\n", "\n", ". ", " "]);
            let chunks = chunker.chunk_document(&doc(&long_text()));
            assert!(chunks.len() > 1, "corpus should produce several chunks");
            for pair in chunks.windows(2) {
                let tail = overlap_tail(&pair[0].content, chunker.chunk_overlap);
                assert!(!tail.is_empty());
                assert!(
                    pair[1].content.starts_with(&tail),
                    "chunk {} does not start with the tail of chunk {}",
                    pair[1].chunk_index,
                    pair[0].chunk_index
                );
            }
        }
    }

    #[test]
    fn char_spans_map_back_into_the_source_text() {
        let text = long_text();
        let chunker = chunker(150, 30, &["\n\n", "\n", ". ", " "]);
        for (window, start) in chunker.split_text(&text) {
            assert_eq!(&text[start..start + window.len()], window);
        }
    }

    #[test]
    fn prefers_paragraph_breaks_over_hard_cuts() {
        let text = "first paragraph here.\n\nsecond paragraph here.";
        let chunker = chunker(30, 0, &["\n\n", "\n", ". ", " "]);
        let windows = chunker.split_text(text);
        assert_eq!(windows.len(), 2);
        assert!(windows[0].0.starts_with("first paragraph"));
        assert!(windows[1].0.starts_with("second paragraph"));
    }

    #[test]
    fn hard_cuts_when_no_separator_matches() {
        let text = "x".repeat(250);
        let chunker = chunker(100, 0, &["\n\n", "\n", ". ", " "]);
        let windows = chunker.split_text(&text);
        assert!(windows.len() >= 3);
        assert!(windows.iter().all(|(w, _)| w.len() <= 100));
        let total: usize = windows.iter().map(|(w, _)| w.len()).sum();
        assert_eq!(total, 250);
    }

    #[test]
    fn hard_cut_respects_multibyte_boundaries() {
        let text = "héllo wörld ünïcode tèxt".repeat(10);
        for (piece, _) in chunker(16, 4, &[]).split_text(&text) {
            assert!(piece.len() <= 16);
        }
    }

    #[test]
    fn whitespace_only_text_yields_no_chunks() {
        let chunker = chunker(100, 10, &["\n\n", "\n", ". ", " "]);
        assert!(chunker.chunk_document(&doc("  \n\n  ")).is_empty());
    }
}
