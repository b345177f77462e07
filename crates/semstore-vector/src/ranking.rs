//! Brute-force cosine-similarity ranking over stored chunks.
//!
//! Every query scores all records (O(n)); there is no index structure.

use serde::{Deserialize, Serialize};

use crate::store::ChunkRecord;

/// A stored chunk paired with its similarity to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedChunk {
    /// Text of the matching chunk.
    pub chunk: String,
    /// Cosine similarity in [-1, 1].
    pub score: f64,
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();

    let mag_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    // Rounding can push normalized vectors a hair past the bounds.
    (dot / (mag_a * mag_b)).clamp(-1.0, 1.0)
}

/// Rank `records` by similarity to `query` and keep the best `top_k`.
///
/// Results are sorted by descending score. The sort is stable, so equal
/// scores keep insertion order. When `min_score` is set, only records
/// scoring strictly above it survive. Asking for more than is stored
/// returns everything.
pub fn rank_chunks(
    query: &[f32],
    records: &[ChunkRecord],
    top_k: usize,
    min_score: Option<f64>,
) -> Vec<RankedChunk> {
    let mut scored: Vec<(usize, f64)> = records
        .iter()
        .enumerate()
        .map(|(i, record)| (i, cosine_similarity(query, &record.embedding)))
        .filter(|(_, score)| min_score.map_or(true, |min| *score > min))
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top_k);

    scored
        .into_iter()
        .map(|(i, score)| RankedChunk {
            chunk: records[i].text.clone(),
            score,
        })
        .collect()
}
