//! # till-api
//!
//! REST server for the Till order backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          till-api Layers                                │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  handlers      │  │  services      │  │  till-db Store             ││
//! │  │                │  │                │  │                            ││
//! │  │ • items        │─►│ • ItemService  │─►│ • Database (SQLite)        ││
//! │  │ • orders       │  │ • OrderService │  │ • MemoryStore (tests)      ││
//! │  │ • health       │  │                │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │         ▲                                                               │
//! │         │ dto (OrderResponse, ReceiptResponse, ...)                     │
//! │         │ error (ServiceError → ApiError → JSON)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (a `.env` file is honoured):
//! - `HTTP_HOST` - bind interface (default: 0.0.0.0)
//! - `HTTP_PORT` - HTTP port (default: 8080)
//! - `DATABASE_PATH` - SQLite file (default: ./till.db)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `RUST_LOG` / `LOG_LEVEL` - tracing filter (default: info)

pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod services;
pub mod startup;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ServiceError, ServiceResult};
pub use services::{ItemService, OrderService};
pub use startup::build_router;

use till_db::Store;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState<S: Store> {
    pub store: S,
    pub items: ItemService<S>,
    pub orders: OrderService<S>,
}

impl<S: Store> AppState<S> {
    pub fn new(store: S) -> Self {
        AppState {
            items: ItemService::new(store.clone()),
            orders: OrderService::new(store.clone()),
            store,
        }
    }
}
