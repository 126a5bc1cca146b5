use axum::{
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{movies, watchlist, AppState};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Watchlist
        .route(
            "/watchlist",
            get(watchlist::list)
                .post(watchlist::add)
                .delete(watchlist::remove),
        )
        .route("/watchlist/toggle", patch(watchlist::toggle))
        .route("/watchlist/check", get(watchlist::check))
        // Movie discovery pass-throughs
        .route("/movies/search", get(movies::search))
        .route("/movies/trending", get(movies::trending))
        .route("/movies/popular", get(movies::popular))
        .route("/movies/now-playing", get(movies::now_playing))
        .route("/movies/upcoming", get(movies::upcoming))
        .route("/movies/top-rated", get(movies::top_rated))
        .route("/movies/genre", get(movies::by_genre))
        .route("/movies/:id", get(movies::details))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
