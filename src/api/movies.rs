use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{MovieDetails, MovieSummary, Page};
use crate::services::providers::{MovieFeed, TimeWindow};

use super::AppState;

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    #[serde(default)]
    pub time_window: TimeWindow,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    pub genre_id: Option<i64>,
    #[serde(default = "default_page")]
    pub page: u32,
}

/// GET /movies/search?query=&page=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Page<MovieSummary>>> {
    let query = params
        .query
        .ok_or_else(|| AppError::InvalidInput("query parameter is required".to_string()))?;
    let results = state.metadata.search(&query, params.page).await?;
    Ok(Json(results))
}

/// GET /movies/trending?time_window=&page=
pub async fn trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingQuery>,
) -> AppResult<Json<Page<MovieSummary>>> {
    let results = state
        .metadata
        .trending(params.time_window, params.page)
        .await?;
    Ok(Json(results))
}

/// GET /movies/popular?page=
pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Page<MovieSummary>>> {
    let results = state.metadata.feed(MovieFeed::Popular, params.page).await?;
    Ok(Json(results))
}

/// GET /movies/now-playing?page=
pub async fn now_playing(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Page<MovieSummary>>> {
    let results = state
        .metadata
        .feed(MovieFeed::NowPlaying, params.page)
        .await?;
    Ok(Json(results))
}

/// GET /movies/upcoming?page=
pub async fn upcoming(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Page<MovieSummary>>> {
    let results = state.metadata.feed(MovieFeed::Upcoming, params.page).await?;
    Ok(Json(results))
}

/// GET /movies/top-rated?page=
pub async fn top_rated(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Page<MovieSummary>>> {
    let results = state.metadata.feed(MovieFeed::TopRated, params.page).await?;
    Ok(Json(results))
}

/// GET /movies/genre?genre_id=&page=
pub async fn by_genre(
    State(state): State<AppState>,
    Query(params): Query<GenreQuery>,
) -> AppResult<Json<Page<MovieSummary>>> {
    let genre_id = params
        .genre_id
        .ok_or_else(|| AppError::InvalidInput("genre_id parameter is required".to_string()))?;
    let results = state.metadata.by_genre(genre_id, params.page).await?;
    Ok(Json(results))
}

/// GET /movies/:id, details with credits appended
pub async fn details(
    State(state): State<AppState>,
    Path(tmdb_id): Path<i64>,
) -> AppResult<Json<MovieDetails>> {
    let details = state.metadata.details(tmdb_id).await?;
    Ok(Json(details))
}
