pub mod providers;
pub mod view_state;
pub mod watchlist;

pub use view_state::{Membership, PendingMutation, ViewStateTracker};
pub use watchlist::WatchlistService;
