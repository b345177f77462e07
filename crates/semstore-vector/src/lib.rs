//! semstore vector crate - embedding service, in-memory chunk store, and
//! cosine-similarity ranking.
//!
//! Provides the sentence-embedding backend (ONNX Runtime, with a mock for
//! testing), the document chunker, the append-only chunk store shared by all
//! requests, and the search engine that ties them together for bulk-embed and
//! query.

pub mod chunking;
pub mod embedding;
pub mod ranking;
pub mod search;
pub mod store;

pub use chunking::TextChunker;
pub use embedding::{
    DynEmbeddingService, EmbeddingService, MockEmbedding, OnnxEmbeddingService, OnnxOptions,
};
pub use ranking::{cosine_similarity, rank_chunks, RankedChunk};
pub use search::SearchEngine;
pub use store::{ChunkRecord, ChunkStore};
