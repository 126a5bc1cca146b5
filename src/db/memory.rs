use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::watchlist::WatchlistStore;
use crate::error::{AppError, AppResult};
use crate::models::WatchlistEntry;

/// In-memory watchlist store
///
/// Keyed by (user_id, tmdb_id), same uniqueness contract as the Postgres
/// store. Insert checks and writes under one lock, so concurrent duplicate
/// adds resolve to exactly one winner. Used by tests and local development
/// without a database.
#[derive(Clone, Default)]
pub struct MemoryWatchlistStore {
    entries: Arc<Mutex<HashMap<(Uuid, i64), WatchlistEntry>>>,
}

impl MemoryWatchlistStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl WatchlistStore for MemoryWatchlistStore {
    async fn list(&self, user_id: Uuid) -> AppResult<Vec<WatchlistEntry>> {
        let entries = self.entries.lock().await;
        let mut rows: Vec<WatchlistEntry> = entries
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(rows)
    }

    async fn find(&self, user_id: Uuid, tmdb_id: i64) -> AppResult<Option<WatchlistEntry>> {
        let entries = self.entries.lock().await;
        Ok(entries.get(&(user_id, tmdb_id)).cloned())
    }

    async fn insert(&self, entry: WatchlistEntry) -> AppResult<WatchlistEntry> {
        let mut entries = self.entries.lock().await;
        let key = (entry.user_id, entry.tmdb_id);
        if entries.contains_key(&key) {
            return Err(AppError::Conflict("Movie already in watchlist".to_string()));
        }
        entries.insert(key, entry.clone());
        Ok(entry)
    }

    async fn delete(&self, user_id: Uuid, tmdb_id: i64) -> AppResult<u64> {
        let mut entries = self.entries.lock().await;
        Ok(entries.remove(&(user_id, tmdb_id)).map_or(0, |_| 1))
    }

    async fn set_watched(
        &self,
        user_id: Uuid,
        tmdb_id: i64,
        watched: bool,
    ) -> AppResult<Option<WatchlistEntry>> {
        let mut entries = self.entries.lock().await;
        match entries.get_mut(&(user_id, tmdb_id)) {
            Some(entry) => {
                entry.watched = watched;
                Ok(Some(entry.clone()))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn entry(user_id: Uuid, tmdb_id: i64, title: &str) -> WatchlistEntry {
        WatchlistEntry {
            id: Uuid::new_v4(),
            user_id,
            tmdb_id,
            title: title.to_string(),
            poster_path: None,
            release_date: String::new(),
            vote_average: 0.0,
            added_at: Utc::now(),
            watched: false,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryWatchlistStore::new();
        let user = Uuid::new_v4();

        store.insert(entry(user, 603, "The Matrix")).await.unwrap();

        let found = store.find(user, 603).await.unwrap();
        assert_eq!(found.unwrap().title, "The Matrix");
        assert_eq!(store.find(user, 604).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let store = MemoryWatchlistStore::new();
        let user = Uuid::new_v4();

        store.insert(entry(user, 603, "The Matrix")).await.unwrap();
        let err = store.insert(entry(user, 603, "The Matrix")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_same_movie_different_users() {
        let store = MemoryWatchlistStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.insert(entry(alice, 603, "The Matrix")).await.unwrap();
        store.insert(entry(bob, 603, "The Matrix")).await.unwrap();

        assert_eq!(store.list(alice).await.unwrap().len(), 1);
        assert_eq!(store.list(bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let store = MemoryWatchlistStore::new();
        let user = Uuid::new_v4();

        let mut older = entry(user, 603, "The Matrix");
        older.added_at = Utc::now() - Duration::hours(1);
        let newer = entry(user, 27205, "Inception");

        store.insert(older).await.unwrap();
        store.insert(newer).await.unwrap();

        let rows = store.list(user).await.unwrap();
        assert_eq!(rows[0].title, "Inception");
        assert_eq!(rows[1].title, "The Matrix");
    }

    #[tokio::test]
    async fn test_delete_reports_rows_removed() {
        let store = MemoryWatchlistStore::new();
        let user = Uuid::new_v4();

        store.insert(entry(user, 603, "The Matrix")).await.unwrap();

        assert_eq!(store.delete(user, 603).await.unwrap(), 1);
        assert_eq!(store.delete(user, 603).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_watched_on_missing_row_is_none() {
        let store = MemoryWatchlistStore::new();
        let user = Uuid::new_v4();

        assert_eq!(store.set_watched(user, 603, true).await.unwrap(), None);

        store.insert(entry(user, 603, "The Matrix")).await.unwrap();
        let updated = store.set_watched(user, 603, true).await.unwrap().unwrap();
        assert!(updated.watched);
    }
}
