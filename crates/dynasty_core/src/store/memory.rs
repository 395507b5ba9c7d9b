use std::collections::BTreeMap;

use super::RecordStore;
use crate::error::DynastyResult;

/// Ordered in-memory store. Prefix queries are range scans over the sorted keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    records: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: BTreeMap<String, String>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &BTreeMap<String, String> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(String::as_str)
    }

    fn set_raw(&mut self, key: &str, value: String) -> DynastyResult<()> {
        self.records.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DynastyResult<()> {
        self.records.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.records
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_scan_stops_at_first_mismatch() {
        let mut store = MemoryStore::new();
        for key in ["schedule_2024", "schedule_2025", "scheduleX", "schedul", "yearStats_2024"] {
            store.set_raw(key, "null".to_string()).unwrap();
        }

        assert_eq!(store.keys_with_prefix("schedule_"), vec!["schedule_2024", "schedule_2025"]);
        assert!(store.keys_with_prefix("zzz").is_empty());
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let mut store = MemoryStore::new();
        store.remove("players").unwrap();
        assert!(store.is_empty());
    }
}
