use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::WatchlistEntry;

/// Postgres error code for unique constraint violation
const UNIQUE_VIOLATION: &str = "23505";

/// Trait for watchlist persistence
///
/// Every operation is scoped to a user id so one user can never observe or
/// mutate another user's rows. "Row not found" is a normal `None` return on
/// reads and updates, never an error; the only store-originated failure
/// besides transport is the duplicate-key `Conflict` on insert.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchlistStore: Send + Sync {
    /// All entries for the user, newest `added_at` first
    async fn list(&self, user_id: Uuid) -> AppResult<Vec<WatchlistEntry>>;

    /// Single entry lookup by (user, movie); absent rows are `None`
    async fn find(&self, user_id: Uuid, tmdb_id: i64) -> AppResult<Option<WatchlistEntry>>;

    /// Inserts a new entry, relying on the store's uniqueness constraint to
    /// reject duplicates with `Conflict` (no check-then-act)
    async fn insert(&self, entry: WatchlistEntry) -> AppResult<WatchlistEntry>;

    /// Deletes by (user, movie), returning the number of rows removed
    async fn delete(&self, user_id: Uuid, tmdb_id: i64) -> AppResult<u64>;

    /// Sets the watched flag, returning the updated row or `None` when the
    /// entry does not exist for that user
    async fn set_watched(
        &self,
        user_id: Uuid,
        tmdb_id: i64,
        watched: bool,
    ) -> AppResult<Option<WatchlistEntry>>;
}

/// Watchlist store backed by Postgres
#[derive(Clone)]
pub struct PgWatchlistStore {
    pool: PgPool,
}

impl PgWatchlistStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl WatchlistStore for PgWatchlistStore {
    async fn list(&self, user_id: Uuid) -> AppResult<Vec<WatchlistEntry>> {
        let entries = sqlx::query_as::<_, WatchlistEntry>(
            r#"
            SELECT id, user_id, tmdb_id, title, poster_path, release_date,
                   vote_average, added_at, watched
            FROM watchlist
            WHERE user_id = $1
            ORDER BY added_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn find(&self, user_id: Uuid, tmdb_id: i64) -> AppResult<Option<WatchlistEntry>> {
        let entry = sqlx::query_as::<_, WatchlistEntry>(
            r#"
            SELECT id, user_id, tmdb_id, title, poster_path, release_date,
                   vote_average, added_at, watched
            FROM watchlist
            WHERE user_id = $1 AND tmdb_id = $2
            "#,
        )
        .bind(user_id)
        .bind(tmdb_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn insert(&self, entry: WatchlistEntry) -> AppResult<WatchlistEntry> {
        let created = sqlx::query_as::<_, WatchlistEntry>(
            r#"
            INSERT INTO watchlist
                (id, user_id, tmdb_id, title, poster_path, release_date,
                 vote_average, added_at, watched)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, tmdb_id, title, poster_path, release_date,
                      vote_average, added_at, watched
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.tmdb_id)
        .bind(&entry.title)
        .bind(&entry.poster_path)
        .bind(&entry.release_date)
        .bind(entry.vote_average)
        .bind(entry.added_at)
        .bind(entry.watched)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                AppError::Conflict("Movie already in watchlist".to_string())
            }
            other => AppError::Database(other),
        })?;

        Ok(created)
    }

    async fn delete(&self, user_id: Uuid, tmdb_id: i64) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM watchlist
            WHERE user_id = $1 AND tmdb_id = $2
            "#,
        )
        .bind(user_id)
        .bind(tmdb_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn set_watched(
        &self,
        user_id: Uuid,
        tmdb_id: i64,
        watched: bool,
    ) -> AppResult<Option<WatchlistEntry>> {
        let entry = sqlx::query_as::<_, WatchlistEntry>(
            r#"
            UPDATE watchlist
            SET watched = $3
            WHERE user_id = $1 AND tmdb_id = $2
            RETURNING id, user_id, tmdb_id, title, poster_path, release_date,
                      vote_average, added_at, watched
            "#,
        )
        .bind(user_id)
        .bind(tmdb_id)
        .bind(watched)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }
}
