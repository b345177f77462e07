//! Route handler functions for all API endpoints.
//!
//! Each handler validates its JSON body, delegates to the search engine in
//! AppState, and returns a JSON response.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use semstore_vector::{ChunkRecord, RankedChunk};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

/// Body of `POST /embed`: either ready-made `chunks` or a `text` document
/// to split first.
#[derive(Debug, Deserialize)]
pub struct EmbedRequest {
    #[serde(default)]
    pub chunks: Option<Vec<String>>,
    #[serde(default)]
    pub text: Option<String>,
    /// Word budget per chunk when splitting `text`.
    #[serde(default)]
    pub max_tokens: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub question: Option<String>,
    /// Signed so negative values reach `resolve_top_k`.
    #[serde(default)]
    pub top_k: Option<i64>,
    #[serde(default)]
    pub min_score: Option<f64>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub model: String,
    pub dimensions: usize,
    pub stored_chunks: u64,
}

// =============================================================================
// Handler functions
// =============================================================================

/// POST /embed - embed a batch of chunks and append them to the store.
///
/// Returns only the records computed by this call.
pub async fn embed(
    State(state): State<AppState>,
    body: Result<Json<EmbedRequest>, JsonRejection>,
) -> Result<Json<Vec<ChunkRecord>>, ApiError> {
    let Json(body) = body?;

    let chunks = match (body.chunks, body.text) {
        (Some(_), Some(_)) => {
            return Err(ApiError::BadRequest(
                "Provide either 'chunks' or 'text', not both".to_string(),
            ))
        }
        (Some(chunks), None) => {
            if body.max_tokens.is_some() {
                return Err(ApiError::BadRequest(
                    "Field 'max_tokens' only applies to 'text'".to_string(),
                ));
            }
            validate_chunks(chunks)?
        }
        (None, Some(text)) => split_text(&text, body.max_tokens, &state)?,
        (None, None) => {
            return Err(ApiError::BadRequest(
                "Field 'chunks' or 'text' is required".to_string(),
            ))
        }
    };

    let records = state
        .engine
        .embed_chunks(&chunks)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(records))
}

fn validate_chunks(chunks: Vec<String>) -> Result<Vec<String>, ApiError> {
    if chunks.is_empty() {
        return Err(ApiError::BadRequest(
            "Field 'chunks' must not be empty".to_string(),
        ));
    }

    if let Some(pos) = chunks.iter().position(|c| c.trim().is_empty()) {
        return Err(ApiError::BadRequest(format!(
            "Chunk at index {} must not be empty",
            pos
        )));
    }

    Ok(chunks)
}

/// Split a raw document with the request's or the configured word budget.
fn split_text(
    text: &str,
    max_tokens: Option<i64>,
    state: &AppState,
) -> Result<Vec<String>, ApiError> {
    let max_words = match max_tokens {
        None => state.config.chunking.max_words,
        Some(n) if n < 1 => {
            return Err(ApiError::BadRequest(format!(
                "Field 'max_tokens' must be at least 1, got {}",
                n
            )))
        }
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
    };

    let chunks = state.chunker.chunk(text, max_words);
    if chunks.is_empty() {
        return Err(ApiError::BadRequest(
            "Field 'text' must not be empty".to_string(),
        ));
    }

    tracing::debug!(chunks = chunks.len(), max_words, "Split text into chunks");
    Ok(chunks)
}

/// POST /query - rank stored chunks by similarity to a question.
pub async fn query(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<Vec<RankedChunk>>, ApiError> {
    let Json(body) = body?;

    let question = body
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| {
            ApiError::BadRequest("Field 'question' is required and must not be empty".to_string())
        })?;

    let top_k = resolve_top_k(body.top_k, &state)?;

    if let Some(min) = body.min_score {
        if !(-1.0..=1.0).contains(&min) {
            return Err(ApiError::BadRequest(format!(
                "Field 'min_score' must be between -1 and 1, got {}",
                min
            )));
        }
    }

    let matches = state
        .engine
        .query(&question, top_k, body.min_score)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(matches))
}

/// Apply the configured default and clamp to the configured maximum.
fn resolve_top_k(requested: Option<i64>, state: &AppState) -> Result<usize, ApiError> {
    let search = &state.config.search;
    match requested {
        None => Ok(search.default_top_k),
        Some(k) if k < 1 => Err(ApiError::BadRequest(format!(
            "Field 'top_k' must be at least 1, got {}",
            k
        ))),
        Some(k) => Ok(usize::try_from(k)
            .unwrap_or(usize::MAX)
            .min(search.max_top_k)),
    }
}

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let embedder = state.engine.embedder();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        model: embedder.model_name().to_string(),
        dimensions: embedder.dimensions(),
        stored_chunks: state.engine.store().len() as u64,
    })
}
