//! Durable vector index with nearest-neighbour search

mod search;

pub use search::{VectorIndex, SearchResult};
