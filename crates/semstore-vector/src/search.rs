//! Search engine combining the embedding service with the chunk store.
//!
//! SearchEngine embeds incoming chunks before appending them to the store,
//! and embeds questions before ranking them against it.

use std::sync::Arc;

use tracing::{debug, info};

use semstore_core::error::SemstoreError;

use crate::embedding::{DynEmbeddingService, EmbeddingService};
use crate::ranking::RankedChunk;
use crate::store::{ChunkRecord, ChunkStore};

/// Embedding plus ranking over a shared [`ChunkStore`].
///
/// Uses dynamic dispatch so that production code can supply
/// `OnnxEmbeddingService` while tests use `MockEmbedding`.
#[derive(Clone)]
pub struct SearchEngine {
    store: ChunkStore,
    embedder: Arc<dyn DynEmbeddingService>,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("model", &self.embedder.model_name())
            .field("stored_chunks", &self.store.len())
            .finish()
    }
}

impl SearchEngine {
    /// Create a new search engine over `store` with an embedding service.
    pub fn new(store: ChunkStore, embedder: impl EmbeddingService + 'static) -> Self {
        Self {
            store,
            embedder: Arc::new(embedder),
        }
    }

    /// Create a new search engine from an already-shared embedding service.
    pub fn new_dyn(store: ChunkStore, embedder: Arc<dyn DynEmbeddingService>) -> Self {
        Self { store, embedder }
    }

    /// Embed each chunk and append the whole batch to the store.
    ///
    /// The first embedding failure aborts the call and leaves the store
    /// untouched. Returns only the records computed in this call.
    pub async fn embed_chunks(&self, chunks: &[String]) -> Result<Vec<ChunkRecord>, SemstoreError> {
        let mut batch = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let embedding = self.embedder.embed_boxed(chunk).await.map_err(|e| {
                debug!(index = i, error = %e, "Chunk embedding failed");
                e
            })?;
            batch.push(ChunkRecord {
                text: chunk.clone(),
                embedding,
            });
        }

        self.store.append_batch(batch.clone())?;
        info!(
            count = batch.len(),
            stored = self.store.len(),
            "Embedded chunks"
        );
        Ok(batch)
    }

    /// Embed `question` once and rank every stored chunk against it.
    pub async fn query(
        &self,
        question: &str,
        top_k: usize,
        min_score: Option<f64>,
    ) -> Result<Vec<RankedChunk>, SemstoreError> {
        let query_vec = self.embedder.embed_boxed(question).await?;
        let matches = self.store.rank(&query_vec, top_k, min_score)?;
        debug!(top_k, returned = matches.len(), "Query ranked");
        Ok(matches)
    }

    /// The underlying chunk store.
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// The embedding service.
    pub fn embedder(&self) -> &dyn DynEmbeddingService {
        self.embedder.as_ref()
    }
}
