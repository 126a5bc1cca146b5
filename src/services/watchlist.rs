use std::sync::Arc;

use crate::auth::Session;
use crate::db::watchlist::WatchlistStore;
use crate::error::{AppError, AppResult};
use crate::models::{EntryDraft, WatchlistEntry};

/// Sole mediator between HTTP intent and the watchlist store
///
/// Encodes the auth-gating and conflict policy so handlers never talk to the
/// store directly. The session is an explicit parameter on every call;
/// anonymous callers get `Unauthorized` everywhere except the membership
/// check, which degrades to `false` so movie pages render without a login.
///
/// The service is stateless between calls. Each operation is a single store
/// round trip; operations on the same (user, movie) pair are expected to be
/// serialized by the caller (see `ViewStateTracker`), while operations on
/// different pairs may run fully in parallel.
#[derive(Clone)]
pub struct WatchlistService {
    store: Arc<dyn WatchlistStore>,
}

impl WatchlistService {
    pub fn new(store: Arc<dyn WatchlistStore>) -> Self {
        Self { store }
    }

    fn require_session<'a>(&self, session: Option<&'a Session>) -> AppResult<&'a Session> {
        session.ok_or(AppError::Unauthorized)
    }

    /// All of the user's entries, newest first
    pub async fn list_all(&self, session: Option<&Session>) -> AppResult<Vec<WatchlistEntry>> {
        let session = self.require_session(session)?;
        self.store.list(session.user_id).await
    }

    /// Whether the movie is in the user's watchlist
    ///
    /// Anonymous callers get `false` rather than an error, and an absent row
    /// is a normal negative result.
    pub async fn check_membership(
        &self,
        session: Option<&Session>,
        tmdb_id: i64,
    ) -> AppResult<bool> {
        let session = match session {
            Some(session) => session,
            None => return Ok(false),
        };

        let entry = self.store.find(session.user_id, tmdb_id).await?;
        Ok(entry.is_some())
    }

    /// Saves a movie to the user's watchlist
    ///
    /// `added_at`, the row id, and `watched = false` are stamped server-side.
    /// A duplicate (user, movie) pair fails `Conflict` rather than upserting;
    /// the store's uniqueness constraint is the arbiter, so two concurrent
    /// adds resolve to exactly one winner.
    pub async fn add(
        &self,
        session: Option<&Session>,
        draft: EntryDraft,
    ) -> AppResult<WatchlistEntry> {
        let session = self.require_session(session)?;
        let entry = draft.into_entry(session.user_id)?;

        let created = self.store.insert(entry).await?;

        tracing::info!(
            user_id = %created.user_id,
            tmdb_id = created.tmdb_id,
            "Movie added to watchlist"
        );

        Ok(created)
    }

    /// Removes a movie from the user's watchlist
    ///
    /// Idempotent in effect: removing an absent entry still succeeds and the
    /// caller cannot tell the two cases apart.
    pub async fn remove(&self, session: Option<&Session>, tmdb_id: i64) -> AppResult<()> {
        let session = self.require_session(session)?;

        let removed = self.store.delete(session.user_id, tmdb_id).await?;

        tracing::info!(
            user_id = %session.user_id,
            tmdb_id,
            rows = removed,
            "Watchlist remove completed"
        );

        Ok(())
    }

    /// Sets the watched flag on an existing entry
    ///
    /// Fails `NotFound` when the user has no entry for that movie.
    pub async fn toggle_watched(
        &self,
        session: Option<&Session>,
        tmdb_id: i64,
        watched: bool,
    ) -> AppResult<WatchlistEntry> {
        let session = self.require_session(session)?;

        self.store
            .set_watched(session.user_id, tmdb_id, watched)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Movie {} not in watchlist", tmdb_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::watchlist::MockWatchlistStore;
    use crate::db::MemoryWatchlistStore;
    use uuid::Uuid;

    fn service() -> WatchlistService {
        WatchlistService::new(Arc::new(MemoryWatchlistStore::new()))
    }

    fn session() -> Session {
        Session::new(Uuid::new_v4())
    }

    fn matrix_draft() -> EntryDraft {
        EntryDraft {
            tmdb_id: Some(603),
            title: "The Matrix".to_string(),
            poster_path: Some("/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg".to_string()),
            release_date: Some("1999-03-30".to_string()),
            vote_average: Some(8.7),
        }
    }

    #[tokio::test]
    async fn test_anonymous_list_fails_unauthorized() {
        let err = service().list_all(None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_anonymous_add_fails_unauthorized() {
        let err = service().add(None, matrix_draft()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_anonymous_remove_fails_unauthorized() {
        let err = service().remove(None, 603).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_anonymous_toggle_fails_unauthorized() {
        let err = service().toggle_watched(None, 603, true).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_anonymous_membership_check_is_false_not_error() {
        let member = service().check_membership(None, 603).await.unwrap();
        assert!(!member);
    }

    #[tokio::test]
    async fn test_add_then_membership_and_list() {
        let service = service();
        let session = session();

        let created = service.add(Some(&session), matrix_draft()).await.unwrap();
        assert_eq!(created.tmdb_id, 603);
        assert!(!created.watched);

        assert!(service.check_membership(Some(&session), 603).await.unwrap());

        let entries = service.list_all(Some(&session)).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "The Matrix");
    }

    #[tokio::test]
    async fn test_double_add_conflicts() {
        let service = service();
        let session = session();

        service.add(Some(&session), matrix_draft()).await.unwrap();
        let err = service.add(Some(&session), matrix_draft()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_concurrent_adds_exactly_one_wins() {
        let service = service();
        let session = session();

        let (first, second) = tokio::join!(
            service.add(Some(&session), matrix_draft()),
            service.add(Some(&session), matrix_draft()),
        );

        let successes = [first.is_ok(), second.is_ok()]
            .iter()
            .filter(|ok| **ok)
            .count();
        assert_eq!(successes, 1);

        let loser = if first.is_ok() { second } else { first };
        assert!(matches!(loser.unwrap_err(), AppError::Conflict(_)));

        let entries = service.list_all(Some(&session)).await.unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_add_without_tmdb_id_is_invalid() {
        let service = service();
        let session = session();

        let draft = EntryDraft {
            tmdb_id: None,
            ..Default::default()
        };
        let err = service.add(Some(&session), draft).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let service = service();
        let session = session();

        service.add(Some(&session), matrix_draft()).await.unwrap();

        // Present and absent removals are indistinguishable to the caller
        service.remove(Some(&session), 603).await.unwrap();
        service.remove(Some(&session), 603).await.unwrap();

        assert!(!service.check_membership(Some(&session), 603).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_never_added_still_succeeds() {
        let service = service();
        let session = session();

        service.remove(Some(&session), 999).await.unwrap();
        assert!(!service.check_membership(Some(&session), 999).await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_on_missing_entry_fails_not_found() {
        let service = service();
        let session = session();

        let err = service
            .toggle_watched(Some(&session), 603, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_toggle_preserves_added_at() {
        let service = service();
        let session = session();

        let created = service.add(Some(&session), matrix_draft()).await.unwrap();

        let updated = service
            .toggle_watched(Some(&session), 603, true)
            .await
            .unwrap();
        assert!(updated.watched);
        assert_eq!(updated.added_at, created.added_at);

        let entries = service.list_all(Some(&session)).await.unwrap();
        assert!(entries[0].watched);
        assert_eq!(entries[0].added_at, created.added_at);

        service.remove(Some(&session), 603).await.unwrap();
        assert!(service.list_all(Some(&session)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_users_only_see_their_own_entries() {
        let service = service();
        let alice = session();
        let bob = session();

        service.add(Some(&alice), matrix_draft()).await.unwrap();

        assert!(service.list_all(Some(&bob)).await.unwrap().is_empty());
        assert!(!service.check_membership(Some(&bob), 603).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_to_caller() {
        let mut store = MockWatchlistStore::new();
        store
            .expect_list()
            .returning(|_| Err(AppError::Unavailable("store unreachable".to_string())));

        let service = WatchlistService::new(Arc::new(store));
        let session = session();

        let err = service.list_all(Some(&session)).await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable(_)));
    }
}
