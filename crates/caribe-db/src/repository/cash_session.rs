//! # Cash Session Repository
//!
//! Open and close the register's cash session.
//!
//! ## One Open Session
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  open(balance)                                                          │
//! │    BEGIN                                                                │
//! │    SELECT ... WHERE closed_at IS NULL ── row? ──► SessionAlreadyOpen    │
//! │    INSERT session                                                       │
//! │    COMMIT                                                               │
//! │                                                                         │
//! │  Two registers racing past the SELECT still collide on the partial     │
//! │  unique index idx_cash_sessions_one_open, which DbError maps to the     │
//! │  same SessionAlreadyOpen.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use caribe_core::{CashSession, CoreError, Money};

use crate::error::{DbError, DbResult};

/// Repository for cash session database operations.
#[derive(Debug, Clone)]
pub struct CashSessionRepository {
    pool: SqlitePool,
}

impl CashSessionRepository {
    /// Creates a new CashSessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CashSessionRepository { pool }
    }

    /// The open session, if any.
    pub async fn current(&self) -> DbResult<Option<CashSession>> {
        let mut conn = self.pool.acquire().await?;
        fetch_open(&mut conn).await
    }

    /// Gets a session by ID, open or closed.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CashSession>> {
        let session = sqlx::query_as::<_, CashSession>(
            r#"
            SELECT id, opened_at, closed_at, opening_balance_cents, closing_balance_cents,
                   total_orders, total_sales_cents
            FROM cash_sessions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Opens a session with the counted drawer.
    ///
    /// ## Returns
    /// * `Err(DbError::Domain(SessionAlreadyOpen))` - Another session is open
    pub async fn open(&self, opening_balance: Money) -> DbResult<CashSession> {
        let session = CashSession::open(opening_balance, Utc::now())?;

        let mut tx = self.pool.begin().await?;

        if let Some(existing) = fetch_open(&mut tx).await? {
            debug!(session_id = %existing.id, "Session already open");
            return Err(CoreError::SessionAlreadyOpen.into());
        }

        sqlx::query(
            r#"
            INSERT INTO cash_sessions (
                id, opened_at, closed_at, opening_balance_cents, closing_balance_cents,
                total_orders, total_sales_cents
            ) VALUES (?1, ?2, NULL, ?3, NULL, 0, 0)
            "#,
        )
        .bind(&session.id)
        .bind(session.opened_at)
        .bind(session.opening_balance_cents)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            session_id = %session.id,
            opening_balance = %opening_balance,
            "Cash session opened"
        );

        Ok(session)
    }

    /// Closes the open session with the counted drawer.
    ///
    /// ## Returns
    /// * `Err(DbError::Domain(NoOpenSession))` - Nothing to close
    pub async fn close(&self, closing_balance: Money) -> DbResult<CashSession> {
        let mut tx = self.pool.begin().await?;

        let mut session = fetch_open(&mut tx)
            .await?
            .ok_or(DbError::Domain(CoreError::NoOpenSession))?;
        session.close(closing_balance, Utc::now())?;

        let result = sqlx::query(
            r#"
            UPDATE cash_sessions SET
                closed_at = ?2,
                closing_balance_cents = ?3
            WHERE id = ?1 AND closed_at IS NULL
            "#,
        )
        .bind(&session.id)
        .bind(session.closed_at)
        .bind(session.closing_balance_cents)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NoOpenSession.into());
        }

        tx.commit().await?;

        info!(
            session_id = %session.id,
            total_orders = session.total_orders,
            total_sales = %session.total_sales(),
            difference = ?session.difference().map(|d| d.to_string()),
            "Cash session closed"
        );

        Ok(session)
    }
}

/// The open session as seen by `conn`.
pub(crate) async fn fetch_open(conn: &mut SqliteConnection) -> DbResult<Option<CashSession>> {
    let session = sqlx::query_as::<_, CashSession>(
        r#"
        SELECT id, opened_at, closed_at, opening_balance_cents, closing_balance_cents,
               total_orders, total_sales_cents
        FROM cash_sessions
        WHERE closed_at IS NULL
        ORDER BY opened_at DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(conn)
    .await?;

    Ok(session)
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    use super::*;

    #[tokio::test]
    async fn test_open_initializes_counters() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = db.cash_sessions().open(Money::from_cents(10_000)).await.unwrap();

        let current = db.cash_sessions().current().await.unwrap().unwrap();
        assert_eq!(current.id, session.id);
        assert_eq!(current.opening_balance_cents, 10_000);
        assert_eq!(current.total_orders, 0);
        assert_eq!(current.total_sales_cents, 0);
        assert!(current.is_open());
    }

    #[tokio::test]
    async fn test_second_open_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.cash_sessions().open(Money::zero()).await.unwrap();

        let err = db.cash_sessions().open(Money::zero()).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(CoreError::SessionAlreadyOpen)));
    }

    #[tokio::test]
    async fn test_index_blocks_second_open_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.cash_sessions().open(Money::zero()).await.unwrap();

        // Bypass the in-transaction check
        let err: DbError = sqlx::query(
            "INSERT INTO cash_sessions (id, opened_at, opening_balance_cents) VALUES ('x', ?1, 0)",
        )
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .unwrap_err()
        .into();
        assert!(matches!(err.as_domain(), Some(CoreError::SessionAlreadyOpen)));
    }

    #[tokio::test]
    async fn test_close_hides_session() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let opened = db.cash_sessions().open(Money::from_cents(5_000)).await.unwrap();

        let closed = db.cash_sessions().close(Money::from_cents(4_800)).await.unwrap();
        assert_eq!(closed.closing_balance_cents, Some(4_800));
        assert!(closed.closed_at.is_some());
        assert_eq!(closed.difference(), Some(Money::from_cents(-200)));

        assert!(db.cash_sessions().current().await.unwrap().is_none());
        let stored = db.cash_sessions().get_by_id(&opened.id).await.unwrap().unwrap();
        assert_eq!(stored.closing_balance_cents, Some(4_800));

        // A new day can start
        db.cash_sessions().open(Money::from_cents(4_800)).await.unwrap();
    }

    #[tokio::test]
    async fn test_close_without_session() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.cash_sessions().close(Money::zero()).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(CoreError::NoOpenSession)));
    }

    #[tokio::test]
    async fn test_negative_balance_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.cash_sessions().open(Money::from_cents(-1)).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(CoreError::Validation(_))));
    }
}
