//! Persistence bridge split across logical submodules: the key-value store
//! abstraction, its SQLite and in-memory backends, and the snapshot codec that
//! turns `Records` into the two stored entries and back.

mod connection;
mod memory;
mod snapshot;

use crate::error::Result;

pub use connection::SqliteStore;
pub use memory::MemoryStore;
pub use snapshot::{load, save, LoadOutcome, GROUPS_KEY, STUDENTS_KEY};

/// Durable string key-value storage.
///
/// Both operations report failures as `RecordsError::Storage` so callers can
/// surface them without knowing which backend is in use.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if nothing was stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}
