use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{EntryDraft, WatchlistEntry};

use super::extract::MaybeSession;
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct MovieIdQuery {
    pub tmdb_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub tmdb_id: Option<i64>,
    pub watched: bool,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    #[serde(rename = "inWatchlist")]
    pub in_watchlist: bool,
}

fn require_movie_id(tmdb_id: Option<i64>) -> AppResult<i64> {
    tmdb_id.ok_or_else(|| AppError::InvalidInput("tmdb_id is required".to_string()))
}

/// GET /watchlist: the current user's entries, newest first
pub async fn list(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> AppResult<Json<Vec<WatchlistEntry>>> {
    let entries = state.watchlist.list_all(session.as_ref()).await?;
    Ok(Json(entries))
}

/// POST /watchlist: save a movie, 409 when already saved
pub async fn add(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Json(draft): Json<EntryDraft>,
) -> AppResult<(StatusCode, Json<WatchlistEntry>)> {
    let created = state.watchlist.add(session.as_ref(), draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /watchlist?tmdb_id=: remove a movie; absent entries still succeed
pub async fn remove(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(query): Query<MovieIdQuery>,
) -> AppResult<Json<RemoveResponse>> {
    let tmdb_id = require_movie_id(query.tmdb_id)?;
    state.watchlist.remove(session.as_ref(), tmdb_id).await?;
    Ok(Json(RemoveResponse { success: true }))
}

/// PATCH /watchlist/toggle: set the watched flag on an existing entry
pub async fn toggle(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Json(request): Json<ToggleRequest>,
) -> AppResult<Json<WatchlistEntry>> {
    let tmdb_id = require_movie_id(request.tmdb_id)?;
    let updated = state
        .watchlist
        .toggle_watched(session.as_ref(), tmdb_id, request.watched)
        .await?;
    Ok(Json(updated))
}

/// GET /watchlist/check?tmdb_id=: membership check
///
/// Anonymous callers get `false` before any validation so movie pages can
/// render without forcing a login.
pub async fn check(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(query): Query<MovieIdQuery>,
) -> AppResult<Json<CheckResponse>> {
    if session.is_none() {
        return Ok(Json(CheckResponse {
            in_watchlist: false,
        }));
    }

    let tmdb_id = require_movie_id(query.tmdb_id)?;
    let in_watchlist = state
        .watchlist
        .check_membership(session.as_ref(), tmdb_id)
        .await?;
    Ok(Json(CheckResponse { in_watchlist }))
}
