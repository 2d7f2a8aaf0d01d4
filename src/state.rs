//! Application state passed to all handlers.

use crate::db::DbPool;

#[derive(Clone)]
pub struct AppState {
  /// Shared database (users, courses, progress, attempts)
  pub db: DbPool,
}

impl AppState {
  pub fn new(db: DbPool) -> Self {
    Self { db }
  }
}
