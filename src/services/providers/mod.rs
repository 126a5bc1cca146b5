/// Movie metadata provider abstraction
///
/// The discovery endpoints are thin pass-throughs over an external metadata
/// API. The trait keeps that API behind a seam so handlers and tests never
/// depend on a concrete upstream.
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{MovieDetails, MovieSummary, Page},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Curated movie feeds that take no parameters beyond pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieFeed {
    Popular,
    NowPlaying,
    Upcoming,
    TopRated,
}

impl MovieFeed {
    /// Upstream path segment for the feed
    pub fn as_path(&self) -> &'static str {
        match self {
            MovieFeed::Popular => "popular",
            MovieFeed::NowPlaying => "now_playing",
            MovieFeed::Upcoming => "upcoming",
            MovieFeed::TopRated => "top_rated",
        }
    }
}

/// Trending window; the upstream default is a week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn as_path(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Full-text title search; an empty query is invalid
    async fn search(&self, query: &str, page: u32) -> AppResult<Page<MovieSummary>>;

    /// Movies trending over the given window
    async fn trending(&self, window: TimeWindow, page: u32) -> AppResult<Page<MovieSummary>>;

    /// One of the curated feeds (popular, now playing, upcoming, top rated)
    async fn feed(&self, feed: MovieFeed, page: u32) -> AppResult<Page<MovieSummary>>;

    /// Movies in a genre, by upstream genre id
    async fn by_genre(&self, genre_id: i64, page: u32) -> AppResult<Page<MovieSummary>>;

    /// One detailed movie record, credits included
    async fn details(&self, tmdb_id: i64) -> AppResult<MovieDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
