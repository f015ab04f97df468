//! Search handler
//!
//! Free-text person lookup served entirely from the in-memory index; the
//! store is never consulted. Results reflect whatever the index has applied
//! so far (eventual consistency with person mutations).

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Search response: flat unordered hit set, no ranking
#[derive(Debug, Serialize)]
pub struct SearchResults {
    #[serde(rename = "TookMs")]
    pub took_ms: f64,
    #[serde(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Hits")]
    pub hits: Vec<i64>,
}

/// GET /api/search?q=
pub async fn search_persons(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResults> {
    let t0 = Instant::now();

    let hits: Vec<i64> = state.index.query(&params.q).into_iter().collect();

    Json(SearchResults {
        took_ms: t0.elapsed().as_secs_f64() * 1000.0,
        count: hits.len(),
        hits,
    })
}
