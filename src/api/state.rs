use std::sync::Arc;

use crate::auth::IdentityStore;
use crate::db::watchlist::WatchlistStore;
use crate::services::providers::MetadataProvider;
use crate::services::WatchlistService;

/// Shared application state
///
/// Cheap to clone; every collaborator sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub watchlist: WatchlistService,
    pub identity: Arc<dyn IdentityStore>,
    pub metadata: Arc<dyn MetadataProvider>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn WatchlistStore>,
        identity: Arc<dyn IdentityStore>,
        metadata: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self {
            watchlist: WatchlistService::new(store),
            identity,
            metadata,
        }
    }
}
