use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// One saved movie per (user, movie) pair
///
/// The title/poster/rating fields are a snapshot of provider metadata taken at
/// add-time; they are never re-synced afterward. The (user_id, tmdb_id) pair
/// is unique, enforced by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct WatchlistEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tmdb_id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    /// May be empty when the provider has no date, but never null
    pub release_date: String,
    pub vote_average: f64,
    pub added_at: DateTime<Utc>,
    pub watched: bool,
}

/// Client-supplied metadata snapshot for an add request
///
/// Everything except `tmdb_id` is optional display data; `tmdb_id` is the
/// identity of the entry and its absence is rejected before touching the
/// store.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EntryDraft {
    pub tmdb_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl EntryDraft {
    /// Materializes the draft into a row for the given user, stamping the
    /// server-side fields: fresh id, current time, watched = false.
    pub fn into_entry(self, user_id: Uuid) -> AppResult<WatchlistEntry> {
        let tmdb_id = self
            .tmdb_id
            .ok_or_else(|| AppError::InvalidInput("tmdb_id is required".to_string()))?;

        Ok(WatchlistEntry {
            id: Uuid::new_v4(),
            user_id,
            tmdb_id,
            title: self.title,
            poster_path: self.poster_path,
            release_date: self.release_date.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0),
            added_at: Utc::now(),
            watched: false,
        })
    }
}
