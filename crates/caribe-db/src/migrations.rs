//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied on every open. sqlx records each applied file with its checksum in
//! `_sqlx_migrations`, so a file that changes after release fails startup.
//!
//! ```text
//! migrations/sqlite/
//! ├── 0001_initial_schema.sql   menu, register, inventory tables
//! └── NNNN_<change>.sql         new files only; never edit a shipped one
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every migration not yet recorded. Each file runs in its own
/// transaction.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let (known, applied) = migration_status(pool).await?;
    debug!(known, applied, "Schema status before migrating");

    MIGRATOR.run(pool).await?;

    if applied < known {
        info!(applied = known - applied, "Schema migrated");
    }
    Ok(())
}

/// (embedded migrations, migrations recorded in the database).
///
/// A fresh database has no bookkeeping table yet and reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    let applied: i64 = if tables > 0 {
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?
    } else {
        0
    };

    Ok((MIGRATOR.migrations.len(), applied.max(0) as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_fresh_database_reports_nothing_applied() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let (known, applied) = migration_status(db.pool()).await.unwrap();
        assert!(known >= 1);
        assert_eq!(applied, 0);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        run_migrations(db.pool()).await.unwrap();

        let (known, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(known, applied);
    }
}
