pub mod memory;
pub mod postgres;
pub mod watchlist;

pub use memory::MemoryWatchlistStore;
pub use postgres::create_pool;
pub use watchlist::{PgWatchlistStore, WatchlistStore};
