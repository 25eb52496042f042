//! SQLite backend for the FableDrop subscription store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. The one-order-per-cycle rule is
//! enforced here at write time, by a uniqueness constraint, so it holds even
//! when two callers race past the read-side eligibility check.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
