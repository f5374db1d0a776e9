//! # Database State
//!
//! Wraps the `Database` handle for use in commands.
//!
//! ## Thread Safety
//! The `Database` struct from `caribe-db` contains a `SqlitePool` which
//! is inherently thread-safe. Multiple commands can execute queries
//! concurrently without explicit locking.

use caribe_db::Database;

/// Wrapper around `Database` for command state.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let recipes = state.db.inner().recipes().list(true).await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
