//! SQLite backend for the barkeep catalog.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. A migration is one closure on that
//! thread holding one transaction from start to finish.

mod encode;
mod normalize;
mod schema;
mod staging;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
