//! Keyed record store abstraction
//!
//! The core depends only on this trait, never on a concrete storage
//! engine: the hosting platform injects its own implementation and
//! serializes transactions so each operation sees a consistent
//! load-modify-save cycle. Records are JSON documents, one table per
//! entity kind.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

use types::errors::{Entity, LedgerError};

/// Table names used by the core.
pub mod tables {
    pub const SHARED_LEDGERS: &str = "shared_ledgers";
    pub const TRADES: &str = "trades";
    pub const USERS: &str = "users";
}

/// A table-scoped key-value store.
///
/// `get` returns `None` for an absent key; `unset` of an absent key is a
/// no-op, which makes cascading deletes idempotent.
pub trait RecordStore {
    fn get(&self, table: &str, key: &str) -> Option<Vec<u8>>;
    fn set(&mut self, table: &str, key: &str, bytes: Vec<u8>);
    fn unset(&mut self, table: &str, key: &str);
}

/// In-process store backed by a `BTreeMap` (deterministic iteration).
///
/// Used by tests and by hosting glue that keeps the partition in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<(String, String), Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held, across all tables.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, table: &str, key: &str) -> Option<Vec<u8>> {
        self.records
            .get(&(table.to_string(), key.to_string()))
            .cloned()
    }

    fn set(&mut self, table: &str, key: &str, bytes: Vec<u8>) {
        self.records
            .insert((table.to_string(), key.to_string()), bytes);
    }

    fn unset(&mut self, table: &str, key: &str) {
        self.records.remove(&(table.to_string(), key.to_string()));
    }
}

/// Load and decode one record. Absent keys are `Ok(None)`; an undecodable
/// record is reported as corrupt, never panicked on.
pub(crate) fn load_record<T, S>(
    store: &S,
    table: &str,
    key: &str,
    entity: Entity,
) -> Result<Option<T>, LedgerError>
where
    T: DeserializeOwned,
    S: RecordStore,
{
    match store.get(table, key) {
        None => Ok(None),
        Some(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|_| LedgerError::Corrupt {
                entity,
                id: key.to_string(),
            }),
    }
}

/// Encode and write one record.
pub(crate) fn save_record<T, S>(store: &mut S, table: &str, key: &str, value: &T)
where
    T: Serialize,
    S: RecordStore,
{
    let bytes = serde_json::to_vec(value).expect("record serialization must not fail");
    store.set(table, key, bytes);
}
