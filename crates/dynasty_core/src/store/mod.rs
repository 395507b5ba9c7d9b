//! Persisted record store
//!
//! A flat key → value substrate. Every value is an independently serialized
//! JSON document, so one damaged record never prevents the others from loading.

pub mod file;
pub mod keys;
pub mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DynastyResult;

pub use file::{FileStore, StoreImageInfo};
pub use keys::{RecordFamily, RecordKey, RECORD_FAMILIES};
pub use memory::MemoryStore;

/// Durable get/set/delete of named records.
///
/// Callers treat a successful `set_raw` as durable. Implementations with
/// deferred writes must make `flush` the point where that becomes true.
pub trait RecordStore {
    fn get_raw(&self, key: &str) -> Option<&str>;

    fn set_raw(&mut self, key: &str, value: String) -> DynastyResult<()>;

    fn remove(&mut self, key: &str) -> DynastyResult<()>;

    fn keys(&self) -> Vec<String>;

    /// Keys starting with `prefix`, in ascending order.
    fn keys_with_prefix(&self, prefix: &str) -> Vec<String>;

    fn flush(&mut self) -> DynastyResult<()> {
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.get_raw(key).is_some()
    }
}

/// Reads and decodes `key`. A record that fails to decode is logged and treated as absent.
pub fn load<T: DeserializeOwned>(store: &impl RecordStore, key: &str) -> Option<T> {
    let raw = store.get_raw(key)?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Discarding corrupted record '{}': {}", key, e);
            None
        }
    }
}

pub fn load_or_default<T: DeserializeOwned + Default>(store: &impl RecordStore, key: &str) -> T {
    load(store, key).unwrap_or_default()
}

pub fn save<T: Serialize + ?Sized>(
    store: &mut impl RecordStore,
    key: &str,
    value: &T,
) -> DynastyResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set_raw(key, raw)
}

/// Removes every dynasty record that no longer decodes as its registered type.
///
/// Returns the keys that were dropped.
pub fn sweep_corrupt(store: &mut impl RecordStore) -> DynastyResult<Vec<String>> {
    let corrupt: Vec<String> = keys::dynasty_keys(store)
        .into_iter()
        .filter(|key| store.get_raw(key).is_some_and(|raw| !keys::accepts(key, raw)))
        .collect();

    for key in &corrupt {
        log::warn!("Removing corrupted record '{}'", key);
        store.remove(key)?;
    }

    Ok(corrupt)
}
