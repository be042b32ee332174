//! # till-db: Persistence Layer for Till
//!
//! Repository ports, the unit of work that spans them, and two stores that
//! implement them: SQLite through sqlx, and an in-memory store for tests.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Data Flow                                 │
//! │                                                                         │
//! │  OrderService::pay (till-api)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     till-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │     Store     │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │               │    │               │    │  (embedded)  │  │   │
//! │  │   │ Database      │    │ ItemRepo      │    │ 001_init.sql │  │   │
//! │  │   │ MemoryStore   │───►│ OrderRepo     │    │              │  │   │
//! │  │   │   begin()     │    │ LineItemRepo  │    │              │  │   │
//! │  │   │               │    │ ReceiptRepo   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (./till.db)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool, configuration, SQLite unit of work
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Ports and their SQLite implementations
//! - [`memory`] - In-memory store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use till_db::{Database, DbConfig, Store, UnitOfWork};
//!
//! let db = Database::new(DbConfig::new("./till.db")).await?;
//!
//! let mut uow = db.begin().await?;
//! let items = uow.items().find_all().await?;
//! uow.commit().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use memory::{MemoryStore, MemoryUnitOfWork, Write};
pub use pool::{Database, DbConfig, SqliteUnitOfWork};
pub use repository::{
    ItemRepository, LineItemRepository, OrderRepository, ReceiptRepository, Store, UnitOfWork,
};
