//! Snapshot export and restore
//!
//! Export flattens every dynasty record into one [`DynastySnapshot`]. Restore
//! wipes the active dynasty and writes the document's records back verbatim.
//! Records are carried as parsed JSON and re-serialized compactly, so a
//! restore of a fresh export reproduces each stored value byte for byte.

pub mod format;

use serde_json::{Map, Value};

pub use format::{DynastySnapshot, SNAPSHOT_VERSION, SUPPORTED_VERSIONS};

use crate::error::DynastyResult;
use crate::models::CoachProfile;
use crate::session::DynastySession;
use crate::store::keys::{self, is_dynasty_key};
use crate::store::RecordStore;

impl<S: RecordStore> DynastySession<S> {
    /// Snapshot of the active dynasty, including state not yet persisted.
    pub fn export_snapshot(&mut self) -> DynastyResult<DynastySnapshot> {
        self.persist()?;

        let mut data = Map::new();
        for key in keys::dynasty_keys(&self.store) {
            let Some(raw) = self.store.get_raw(&key) else {
                continue;
            };
            match serde_json::from_str::<Value>(raw) {
                Ok(value) => {
                    data.insert(key, value);
                }
                Err(e) => log::warn!("Skipping unreadable record '{}' in export: {}", key, e),
            }
        }

        log::info!("Exported dynasty snapshot with {} records", data.len());
        Ok(DynastySnapshot::new(data))
    }

    /// Checks `snapshot` without touching the store.
    pub fn validate_import(&self, snapshot: &DynastySnapshot) -> DynastyResult<CoachProfile> {
        snapshot.validate()
    }

    /// Replaces the active dynasty with the records in `snapshot`.
    ///
    /// Every current dynasty key is removed first. Keys missing from the
    /// document stay absent. Launcher records and unregistered keys in the
    /// document are skipped.
    pub fn restore_from_snapshot(&mut self, snapshot: DynastySnapshot) -> DynastyResult<()> {
        self.wipe_active()?;

        let mut written = 0usize;
        for (key, value) in snapshot.dynasty_data {
            if !is_dynasty_key(&key) {
                log::warn!("Ignoring unknown record '{}' in snapshot", key);
                continue;
            }
            self.store.set_raw(&key, serde_json::to_string(&value)?)?;
            written += 1;
        }

        self.reload();
        self.store.flush()?;

        log::info!(
            "Restored {} records from snapshot exported {}",
            written,
            snapshot.exported_at.to_rfc3339()
        );
        Ok(())
    }

    /// Removes every record of the active dynasty.
    pub(crate) fn wipe_active(&mut self) -> DynastyResult<()> {
        let existing = keys::dynasty_keys(&self.store);
        log::debug!("Wiping {} dynasty records", existing.len());
        for key in &existing {
            self.store.remove(key)?;
        }
        self.reload();
        Ok(())
    }
}
