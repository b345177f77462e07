//! Append-only in-memory chunk store.
//!
//! Records live for the lifetime of the process, in insertion order, and
//! are shared by every request. The store is thread-safe via an interior
//! RwLock: appends take the write lock, rankings run under the read lock.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use semstore_core::error::SemstoreError;

use crate::ranking::{rank_chunks, RankedChunk};

/// A text chunk and its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Chunk text as submitted.
    #[serde(rename = "chunk")]
    pub text: String,
    /// Model embedding of `text`.
    pub embedding: Vec<f32>,
}

/// Process-wide sequence of embedded chunks.
///
/// Cloning is cheap and yields a handle to the same underlying records.
#[derive(Debug, Clone, Default)]
pub struct ChunkStore {
    records: Arc<RwLock<Vec<ChunkRecord>>>,
}

impl ChunkStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of records atomically.
    ///
    /// Every record must match the dimensionality already in the store (or
    /// of the batch's first record when the store is empty). On mismatch
    /// nothing from the batch is stored.
    pub fn append_batch(&self, batch: Vec<ChunkRecord>) -> Result<(), SemstoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| SemstoreError::Store(format!("Lock poisoned: {}", e)))?;

        let expected = records
            .first()
            .or_else(|| batch.first())
            .map(|r| r.embedding.len());

        if let Some(expected) = expected {
            if let Some(bad) = batch.iter().find(|r| r.embedding.len() != expected) {
                return Err(SemstoreError::Dimension {
                    expected,
                    actual: bad.embedding.len(),
                });
            }
        }

        records.extend(batch);
        Ok(())
    }

    /// Rank every stored record against `query` and return the best `top_k`.
    pub fn rank(
        &self,
        query: &[f32],
        top_k: usize,
        min_score: Option<f64>,
    ) -> Result<Vec<RankedChunk>, SemstoreError> {
        let records = self
            .records
            .read()
            .map_err(|e| SemstoreError::Store(format!("Lock poisoned: {}", e)))?;

        if let Some(first) = records.first() {
            if first.embedding.len() != query.len() {
                return Err(SemstoreError::Dimension {
                    expected: first.embedding.len(),
                    actual: query.len(),
                });
            }
        }

        Ok(rank_chunks(query, &records, top_k, min_score))
    }

    /// Copy of all records in insertion order.
    pub fn snapshot(&self) -> Vec<ChunkRecord> {
        self.records.read().map(|r| r.clone()).unwrap_or_default()
    }

    /// Return the number of records currently stored.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Return true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str, embedding: Vec<f32>) -> ChunkRecord {
        ChunkRecord {
            text: text.to_string(),
            embedding,
        }
    }

    #[test]
    fn test_append_and_len() {
        let store = ChunkStore::new();
        assert!(store.is_empty());

        store.append_batch(vec![record("one", vec![1.0, 0.0])]).unwrap();
        store
            .append_batch(vec![record("two", vec![0.0, 1.0]), record("three", vec![1.0, 1.0])])
            .unwrap();

        assert_eq!(store.len(), 3);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let store = ChunkStore::new();
        for text in ["a", "b", "c"] {
            store.append_batch(vec![record(text, vec![1.0])]).unwrap();
        }
        let texts: Vec<String> = store.snapshot().into_iter().map(|r| r.text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_append_rejects_dimension_mismatch() {
        let store = ChunkStore::new();
        store.append_batch(vec![record("one", vec![1.0, 0.0])]).unwrap();

        let err = store
            .append_batch(vec![record("two", vec![1.0, 0.0, 0.0])])
            .unwrap_err();
        assert!(matches!(
            err,
            SemstoreError::Dimension {
                expected: 2,
                actual: 3
            }
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_batch_mismatch_stores_nothing() {
        let store = ChunkStore::new();
        let result = store.append_batch(vec![
            record("ok", vec![1.0, 0.0]),
            record("bad", vec![1.0]),
        ]);
        assert!(result.is_err());
        assert!(store.is_empty());

        // The rejected batch must not fix the dimensionality either.
        store.append_batch(vec![record("later", vec![1.0])]).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let store = ChunkStore::new();
        store.append_batch(Vec::new()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_rank_empty_store() {
        let store = ChunkStore::new();
        let hits = store.rank(&[1.0; 4], 10, None).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_rank_rejects_query_dimension_mismatch() {
        let store = ChunkStore::new();
        store.append_batch(vec![record("one", vec![1.0, 0.0])]).unwrap();
        assert!(store.rank(&[1.0, 0.0, 0.0], 1, None).is_err());
    }

    #[test]
    fn test_rank_returns_closest_first() {
        let store = ChunkStore::new();
        store
            .append_batch(vec![record("far", vec![-1.0; 8]), record("close", vec![1.0; 8])])
            .unwrap();

        let hits = store.rank(&[1.0; 8], 10, None).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk, "close");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_clones_share_records() {
        let store = ChunkStore::new();
        let handle = store.clone();
        handle.append_batch(vec![record("shared", vec![1.0])]).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_batches_stay_contiguous() {
        let store = ChunkStore::new();
        let threads: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let batch = (0..50)
                        .map(|i| record(&format!("{}-{}", t, i), vec![t as f32, i as f32]))
                        .collect();
                    store.append_batch(batch).unwrap();
                })
            })
            .collect();
        for handle in threads {
            handle.join().unwrap();
        }

        let records = store.snapshot();
        assert_eq!(records.len(), 400);
        for batch in records.chunks(50) {
            let owner = batch[0].embedding[0];
            assert!(batch.iter().all(|r| r.embedding[0] == owner));
        }
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(record("cat", vec![0.5])).unwrap();
        assert_eq!(json, serde_json::json!({"chunk": "cat", "embedding": [0.5]}));
    }
}
