//! Application state shared across all route handlers.
//!
//! AppState owns the loaded embedding model and the chunk store for the life
//! of the process. It is passed to handlers via axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use semstore_core::config::SemstoreConfig;
use semstore_vector::{
    ChunkStore, DynEmbeddingService, EmbeddingService, SearchEngine, TextChunker,
};

/// Shared application state.
///
/// Every field is cheap to clone; the chunk store guards its own records.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<SemstoreConfig>,
    /// Embedding service plus the process-wide chunk store.
    pub engine: SearchEngine,
    /// Splitter for `/embed` requests that send a whole document.
    pub chunker: TextChunker,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create state around an embedding service and an empty store.
    pub fn new(config: SemstoreConfig, embedder: impl EmbeddingService + 'static) -> Self {
        Self::with_engine(config, SearchEngine::new(ChunkStore::new(), embedder))
    }

    /// Create state from an already-shared embedding service.
    pub fn new_dyn(config: SemstoreConfig, embedder: Arc<dyn DynEmbeddingService>) -> Self {
        Self::with_engine(config, SearchEngine::new_dyn(ChunkStore::new(), embedder))
    }

    /// Create state around an existing search engine.
    pub fn with_engine(config: SemstoreConfig, engine: SearchEngine) -> Self {
        Self {
            config: Arc::new(config),
            engine,
            chunker: TextChunker::new(),
            start_time: Instant::now(),
        }
    }
}
