/// Read-only catalog API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use mezgebe_core::{MonthSummary, Track, DEFAULT_SEARCH_LIMIT};
use serde::{Deserialize, Serialize};

/// Upper bound for `limit` on search
const MAX_SEARCH_LIMIT: usize = 500;

#[derive(Debug, Serialize)]
pub struct PartSummary {
    pub id: u32,
    pub name: String,
    pub song_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

/// GET /api/months
pub async fn list_months(State(state): State<AppState>) -> Json<Vec<MonthSummary>> {
    Json(state.catalog.months().iter().map(MonthSummary::from).collect())
}

/// GET /api/months/:month/parts
pub async fn list_parts(
    State(state): State<AppState>,
    Path(month): Path<u32>,
) -> Result<Json<Vec<PartSummary>>> {
    require_month(&state, month)?;

    let parts = state
        .catalog
        .parts_for_month(month)
        .iter()
        .map(|p| PartSummary {
            id: p.id,
            name: p.name.clone(),
            song_count: p.songs.len(),
        })
        .collect();

    Ok(Json(parts))
}

/// GET /api/months/:month/parts/:part/tracks
/// `part` is 1-based; out-of-range parts yield an empty list
pub async fn list_tracks(
    State(state): State<AppState>,
    Path((month, part)): Path<(u32, u32)>,
) -> Result<Json<Vec<Track>>> {
    require_month(&state, month)?;
    Ok(Json(state.catalog.list_tracks_for(month, part)))
}

/// GET /api/search?q=&limit=
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Track>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(MAX_SEARCH_LIMIT);
    Json(state.catalog.search(&query.q, limit))
}

fn require_month(state: &AppState, month: u32) -> Result<()> {
    state
        .catalog
        .month_name(month)
        .map(|_| ())
        .ok_or_else(|| ServerError::NotFound(format!("Month {} not found", month)))
}
