//! # Database Handle
//!
//! Opens the register's SQLite file and hands out repositories over one pool.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppConfig::db_config()  ──►  DbConfig { path, pool size, busy wait }   │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │  Database::new(config)   ──►  SqlitePool ──► migrations ──► Database    │
//! │                                                                         │
//! │  Writers queue on SQLite's single write lock. A second checkout that    │
//! │  arrives mid-transaction waits up to `busy_timeout` instead of failing. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! File databases run in WAL mode so menu reads never wait on a checkout.
//! `:memory:` databases live on exactly one connection; a second connection
//! would open a different, empty database.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::cash_session::CashSessionRepository;
use crate::repository::category::CategoryRepository;
use crate::repository::ingredient::IngredientRepository;
use crate::repository::inventory_log::InventoryLogRepository;
use crate::repository::order::OrderRepository;
use crate::repository::preparation::PreparationRepository;
use crate::repository::product::ProductRepository;
use crate::repository::recipe::RecipeRepository;

const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// How to open the register database.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/caribe/caribe.db").max_connections(4);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
    /// Default 5. Forced to 1 for `:memory:`.
    pub max_connections: u32,
    /// How long a writer waits on the SQLite lock before `SQLITE_BUSY`.
    pub busy_timeout: Duration,
    pub run_migrations: bool,
}

impl DbConfig {
    /// File database. The file is created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: path.into(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Private, throwaway database for tests.
    pub fn in_memory() -> Self {
        DbConfig::new(MEMORY_PATH)
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == Path::new(MEMORY_PATH)
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::new().in_memory(true)
        } else {
            SqliteConnectOptions::new()
                .filename(&self.path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
        };

        // SQLite ships with foreign keys off
        options
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(self.busy_timeout)
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        if self.is_in_memory() {
            // The database dies with its connection; never recycle it
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(self.max_connections)
                .acquire_timeout(self.busy_timeout * 2)
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// One `Database` is created at startup and shared by every command. Cloning
/// is cheap (the pool is reference counted) and each repository accessor
/// hands out a handle over the same pool.
///
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Database                                                               │
/// │   ├── categories()      CategoryRepository                              │
/// │   ├── products()        ProductRepository                               │
/// │   ├── ingredients()     IngredientRepository                            │
/// │   ├── recipes()         RecipeRepository                                │
/// │   ├── cash_sessions()   CashSessionRepository                           │
/// │   ├── orders()          OrderRepository        (atomic checkout)        │
/// │   ├── preparations()    PreparationRepository  (atomic preparation)     │
/// │   └── inventory_logs()  InventoryLogRepository                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ## Usage in Commands
/// ```rust,ignore
/// async fn list_recipes(db: &Database) -> Result<Vec<Recipe>, ApiError> {
///     Ok(db.recipes().list(false).await?)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and applies pending migrations.
    ///
    /// ## Errors
    /// * `ConnectionFailed` - the file cannot be opened or created
    /// * `MigrationFailed` - the schema could not be brought up to date
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.path.display(), "Opening register database");

        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(
            in_memory = config.is_in_memory(),
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies any migration not yet recorded. Safe to repeat.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool, for tests and one-off maintenance queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the category repository.
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    /// Returns the product repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let menu = db.products().list_with_names(true).await?;
    /// ```
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Returns the ingredient repository.
    pub fn ingredients(&self) -> IngredientRepository {
        IngredientRepository::new(self.pool.clone())
    }

    /// Returns the recipe repository.
    pub fn recipes(&self) -> RecipeRepository {
        RecipeRepository::new(self.pool.clone())
    }

    /// Returns the cash session repository.
    pub fn cash_sessions(&self) -> CashSessionRepository {
        CashSessionRepository::new(self.pool.clone())
    }

    /// Returns the order repository.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Returns the recipe preparation repository.
    pub fn preparations(&self) -> PreparationRepository {
        PreparationRepository::new(self.pool.clone())
    }

    /// Returns the inventory log repository.
    pub fn inventory_logs(&self) -> InventoryLogRepository {
        InventoryLogRepository::new(self.pool.clone())
    }

    /// Waits for in-flight queries, then closes every connection.
    pub async fn close(&self) {
        info!("Closing register database");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
