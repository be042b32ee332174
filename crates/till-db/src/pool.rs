//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite, and the
//! transaction-backed unit of work.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  till-api startup                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ Store::begin() checks out one connection                       │
//! │       ▼                                                                 │
//! │  SqliteUnitOfWork (BEGIN ... COMMIT | ROLLBACK)                        │
//! │  (Requests run in parallel on different connections)                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled so readers don't block
//! the single writer. Two transactions racing to write the same database
//! are not merged: the loser fails with `DbError::TransactionFailed`.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::{Store, UnitOfWork};

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust
/// use till_db::DbConfig;
///
/// let config = DbConfig::new("/path/to/till.db")
///     .max_connections(5)
///     .min_connections(1);
/// assert_eq!(config.max_connections, 5);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// The database lives as long as its single pooled connection, so
    /// every test gets an isolated, empty schema.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle. Implements [`Store`]; every unit of work it hands
/// out wraps one SQLite transaction.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./till.db")).await?;
///
/// let mut uow = db.begin().await?;
/// let items = uow.items().find_all().await?;
/// uow.commit().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_url = if config.is_in_memory() {
            "sqlite::memory:".to_string()
        } else {
            // sqlite://path?mode=rwc creates the file if not exists
            format!("sqlite://{}?mode=rwc", config.database_path.display())
        };

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite has them disabled by default for backwards compatibility
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations.
    ///
    /// Idempotent: safe to run multiple times. Called by `new()` when
    /// `run_migrations` is set.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, `begin` fails with `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

#[async_trait]
impl Store for Database {
    type Tx = SqliteUnitOfWork;

    async fn begin(&self) -> DbResult<SqliteUnitOfWork> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::Internal(msg) => DbError::TransactionFailed(msg),
                other => other,
            })?;
        Ok(SqliteUnitOfWork { tx })
    }

    async fn health_check(&self) -> bool {
        Database::health_check(self).await
    }
}

// =============================================================================
// Unit of Work
// =============================================================================

/// One SQLite transaction. The repository impls live in
/// `repository::{item, order, receipt}`.
///
/// Dropping it without `commit` rolls the transaction back.
pub struct SqliteUnitOfWork {
    pub(crate) tx: Transaction<'static, Sqlite>,
}

impl std::fmt::Debug for SqliteUnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteUnitOfWork").finish_non_exhaustive()
    }
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    async fn commit(self) -> DbResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }

    async fn rollback(self) -> DbResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use till_core::{Item, ItemId, LineItem, Money, Order, OrderId, Receipt};

    async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn saved_item(db: &Database, name: &str, cents: i64) -> Item {
        let mut uow = db.begin().await.unwrap();
        let item = uow
            .items()
            .save(Item::new(name, Money::from_cents(cents)))
            .await
            .unwrap();
        uow.commit().await.unwrap();
        item
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = database().await;
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_item_insert_and_update() {
        let db = database().await;
        let item = saved_item(&db, "itemName", 1000).await;
        let id = item.id.unwrap();

        let mut uow = db.begin().await.unwrap();
        let updated = uow
            .items()
            .save(Item {
                price: Money::from_cents(1250),
                ..item
            })
            .await
            .unwrap();
        uow.commit().await.unwrap();
        assert_eq!(updated.id, Some(id));

        let mut uow = db.begin().await.unwrap();
        let loaded = uow.items().find_by_id(id).await.unwrap().unwrap();
        assert_eq!(loaded.price, Money::from_cents(1250));
        assert_eq!(uow.items().find_all().await.unwrap().len(), 1);
        assert!(uow.items().find_by_id(ItemId(9999)).await.unwrap().is_none());
        uow.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_update_of_missing_item_is_not_found() {
        let db = database().await;
        let mut uow = db.begin().await.unwrap();

        let err = uow
            .items()
            .save(Item::new("ghost", Money::zero()).with_id(ItemId(42)))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_dropped_unit_of_work_rolls_back() {
        let db = database().await;

        {
            let mut uow = db.begin().await.unwrap();
            uow.items()
                .save(Item::new("discarded", Money::from_cents(100)))
                .await
                .unwrap();
            // dropped without commit
        }

        let mut uow = db.begin().await.unwrap();
        assert!(uow.items().find_all().await.unwrap().is_empty());
        uow.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_order_save_cascades_line_items() {
        let db = database().await;
        let item = saved_item(&db, "itemName", 1000).await;
        let item_id = item.id.unwrap();

        let mut uow = db.begin().await.unwrap();
        let order = uow.orders().save(Order::new()).await.unwrap();
        let order_id = order.id.unwrap();

        let mut order = order;
        order.accrue(&item, item_id, 1).unwrap();
        let order = uow.orders().save(order).await.unwrap();
        uow.commit().await.unwrap();

        let line = &order.line_items[0];
        assert!(line.id.is_some());
        assert_eq!(line.order_id, order_id);

        let mut uow = db.begin().await.unwrap();
        let mut loaded = uow.orders().find_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(loaded.line_items.len(), 1);
        assert_eq!(loaded.line_items[0].quantity, 1);

        // second accrual updates the existing row in place
        loaded.accrue(&item, item_id, 22).unwrap();
        let line = loaded.line_items[0].clone();
        uow.line_items().save(line).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = db.begin().await.unwrap();
        let orders = uow.orders().find_all().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].line_items.len(), 1);
        assert_eq!(orders[0].line_items[0].quantity, 23);
        assert_eq!(orders[0].total().unwrap(), Money::from_cents(23000));
        uow.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_line_item_keeps_price_snapshot() {
        let db = database().await;
        let item = saved_item(&db, "itemName", 1000).await;
        let item_id = item.id.unwrap();

        let mut uow = db.begin().await.unwrap();
        let mut order = uow.orders().save(Order::new()).await.unwrap();
        order.accrue(&item, item_id, 2).unwrap();
        let order = uow.orders().save(order).await.unwrap();
        uow.items()
            .save(Item {
                price: Money::from_cents(5000),
                ..item
            })
            .await
            .unwrap();
        uow.commit().await.unwrap();

        let mut uow = db.begin().await.unwrap();
        let loaded = uow
            .orders()
            .find_by_id(order.id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.line_items[0].price, Money::from_cents(1000));
        uow.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_line_item_for_unknown_order_is_rejected() {
        let db = database().await;
        let item = saved_item(&db, "itemName", 1000).await;

        let mut uow = db.begin().await.unwrap();
        let line = LineItem::snapshot(&item, item.id.unwrap(), OrderId(777), 1);
        let err = uow.line_items().save(line).await.unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_receipt_round_trip_and_write_once() {
        let db = database().await;
        let item = saved_item(&db, "itemName", 1000).await;

        let mut uow = db.begin().await.unwrap();
        let mut order = uow.orders().save(Order::new()).await.unwrap();
        order.accrue(&item, item.id.unwrap(), 23).unwrap();
        order.settle(Money::from_cents(30000)).unwrap();
        let order = uow.orders().save(order).await.unwrap();
        let order_id = order.id.unwrap();

        let receipt = uow
            .receipts()
            .save(Receipt::new(order, Money::from_cents(30000)))
            .await
            .unwrap();
        assert!(receipt.id.is_some());
        uow.commit().await.unwrap();

        let mut uow = db.begin().await.unwrap();
        let loaded = uow
            .receipts()
            .find_by_order_id(order_id)
            .await
            .unwrap()
            .unwrap();
        assert!(loaded.order.paid);
        assert_eq!(loaded.payment, Money::from_cents(30000));
        assert_eq!(loaded.change().unwrap(), Money::from_cents(7000));

        let second = Receipt::new(loaded.order.clone(), Money::from_cents(50000));
        let err = uow.receipts().save(second).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::UniqueViolation { ref field, .. } if field == "receipts.order_id"
        ));

        let err = uow.receipts().save(loaded).await.unwrap_err();
        assert!(matches!(err, DbError::Immutable { .. }));

        assert!(uow
            .receipts()
            .find_by_order_id(OrderId(12345))
            .await
            .unwrap()
            .is_none());
    }
}
