//! Service layer.
//!
//! Each public operation opens exactly one unit of work on the [`Store`],
//! commits it on success and drops it (rolling back) on every error path.
//!
//! [`Store`]: till_db::Store

pub mod item_service;
pub mod order_service;

pub use item_service::ItemService;
pub use order_service::OrderService;
