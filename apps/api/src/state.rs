//! Shared application state.

use forecourt_db::Database;

/// Shared state handed to every handler.
///
/// `Database` wraps a pool and is cheap to clone, so the whole state is
/// `Clone` and axum can hand each handler its own copy.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
