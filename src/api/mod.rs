pub mod extract;
pub mod movies;
pub mod routes;
pub mod state;
pub mod watchlist;

pub use routes::create_router;
pub use state::AppState;
