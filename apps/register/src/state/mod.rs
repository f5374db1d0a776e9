//! # State Module
//!
//! Manages application state for the register process.
//!
//! Separate state types, each with a single concern, bundled into one
//! cheap-to-clone [`AppState`] handed to every command.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                      AppState (Clone)                           │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │                              │                                          │
//! │          ┌───────────────────┼──────────────────┐                       │
//! │          ▼                   ▼                  ▼                       │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐           │
//! │  │   DbState    │  │   OrderState     │  │   AppConfig      │           │
//! │  │              │  │                  │  │                  │           │
//! │  │  Database    │  │  Arc<Mutex<      │  │  business name   │           │
//! │  │  (SQLite     │  │   OrderBuilder   │  │  tagline         │           │
//! │  │   pool)      │  │  >>              │  │  currency        │           │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘           │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • DbState: Database has internal connection pool (thread-safe)         │
//! │  • OrderState: tokio Mutex, held across checkout's transaction          │
//! │  • AppConfig: Read-only after initialization                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod order;

use std::sync::Arc;

pub use config::{AppConfig, ConfigError};
pub use db::DbState;
pub use order::OrderState;

use caribe_db::Database;

/// Everything a command may need.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: DbState,
    pub order: OrderState,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Creates the state with an empty order.
    pub fn new(db: Database, config: AppConfig) -> Self {
        AppState {
            db: DbState::new(db),
            order: OrderState::new(),
            config: Arc::new(config),
        }
    }

    /// Shorthand for `self.db.inner()`.
    pub fn database(&self) -> &Database {
        self.db.inner()
    }
}
