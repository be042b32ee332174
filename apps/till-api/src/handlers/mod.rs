//! HTTP handlers.
//!
//! Handlers are generic over the [`Store`](till_db::Store) so the same
//! router serves SQLite in production and the in-memory store in tests.

pub mod health;
pub mod items;
pub mod orders;
