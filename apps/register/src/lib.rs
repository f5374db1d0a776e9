//! # Caribe Register Library
//!
//! The register process for Parada Caribe. It owns the database, the
//! in-progress order and the configuration, and serves commands to the
//! front end over a JSON-lines channel on stdin/stdout.
//!
//! ## Module Organization
//! ```text
//! caribe_register/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── server.rs       ◄─── JSON-lines request/response loop
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState bundle
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── order.rs    ◄─── In-progress order behind a Mutex
//! │   └── config.rs   ◄─── Environment configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Dispatch table
//! │   └── ...         ◄─── One module per screen
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! Logs go to stderr; stdout carries only responses.

pub mod commands;
pub mod error;
pub mod server;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use caribe_db::Database;
use state::{AppConfig, AppState};

/// Runs the register until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Register Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • CARIBE_DB_PATH is required                                        │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Serve ────────────────────────────────────────────────────────────► │
/// │     • One request per stdin line, one response per stdout line          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Parada Caribe register");

    let config = AppConfig::from_env()?;
    info!(db_path = ?config.db_path, business = %config.business_name, "Configuration loaded");

    let db = Database::new(config.db_config()).await?;
    info!("Database connected and migrations applied");

    let state = AppState::new(db, config);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    server::serve(&state, stdin, tokio::io::stdout()).await?;

    state.database().close().await;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=caribe=trace` - Show trace for caribe crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,caribe=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
