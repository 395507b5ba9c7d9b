//! File-backed record store
//!
//! The whole key space is mirrored into one image file:
//! MessagePack (named fields) → LZ4 (size prepended) → SHA-256 trailer.
//! Writes go to a temp file that is synced and renamed over the old image.

use std::collections::BTreeMap;
use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{MemoryStore, RecordStore};
use crate::error::{DynastyError, DynastyResult};

pub const STORE_VERSION: u32 = 1;

const CHECKSUM_LEN: usize = 32;

#[derive(Serialize, Deserialize, Debug)]
struct StoreImage {
    version: u32,
    /// unix milliseconds
    saved_at: i64,
    records: BTreeMap<String, String>,
}

/// Metadata of the image currently on disk.
#[derive(Debug, Clone)]
pub struct StoreImageInfo {
    pub path: PathBuf,
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub record_count: usize,
    pub image_size: usize,
    pub checksum: String,
}

pub fn encode_image(records: &BTreeMap<String, String>) -> DynastyResult<Vec<u8>> {
    let image = StoreImage {
        version: STORE_VERSION,
        saved_at: Utc::now().timestamp_millis(),
        records: records.clone(),
    };

    let msgpack = to_vec_named(&image)?;
    let mut bytes = compress_prepend_size(&msgpack);

    let checksum = Sha256::digest(&bytes);
    bytes.extend_from_slice(&checksum);

    Ok(bytes)
}

fn decode_raw(bytes: &[u8]) -> DynastyResult<StoreImage> {
    if bytes.len() < 4 + CHECKSUM_LEN {
        return Err(DynastyError::Corrupted);
    }

    let (payload, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    if Sha256::digest(payload).as_slice() != checksum {
        return Err(DynastyError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| DynastyError::Decompression)?;
    let image: StoreImage = from_slice(&msgpack)?;

    if image.version > STORE_VERSION {
        return Err(DynastyError::StoreVersionMismatch {
            found: image.version,
            expected: STORE_VERSION,
        });
    }

    Ok(image)
}

pub fn decode_image(bytes: &[u8]) -> DynastyResult<BTreeMap<String, String>> {
    decode_raw(bytes).map(|image| image.records)
}

/// Durable store over a single image file.
///
/// In immediate mode every mutation is flushed before it returns. Deferred
/// mode batches mutations until [`RecordStore::flush`] is called.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    memory: MemoryStore,
    deferred: bool,
    dirty: bool,
}

impl FileStore {
    /// Opens `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> DynastyResult<Self> {
        let path = path.into();
        let memory = if path.exists() {
            MemoryStore::from_records(decode_image(&read_file(&path)?)?)
        } else {
            MemoryStore::new()
        };

        log::debug!("Opened store {:?} with {} records", path, memory.len());
        Ok(Self { path, memory, deferred: false, dirty: false })
    }

    pub fn open_deferred(path: impl Into<PathBuf>) -> DynastyResult<Self> {
        let mut store = Self::open(path)?;
        store.deferred = true;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn image_info(&self) -> DynastyResult<StoreImageInfo> {
        if !self.path.exists() {
            return Err(DynastyError::FileNotFound { path: self.path.display().to_string() });
        }

        let bytes = read_file(&self.path)?;
        let image = decode_raw(&bytes)?;

        Ok(StoreImageInfo {
            path: self.path.clone(),
            version: image.version,
            saved_at: Utc.timestamp_millis_opt(image.saved_at).single().unwrap_or_else(Utc::now),
            record_count: image.records.len(),
            image_size: bytes.len(),
            checksum: format!("{:x}", Sha256::digest(&bytes[..bytes.len() - CHECKSUM_LEN])),
        })
    }

    fn mark_dirty(&mut self) -> DynastyResult<()> {
        self.dirty = true;
        if self.deferred {
            return Ok(());
        }
        self.flush()
    }
}

impl RecordStore for FileStore {
    fn get_raw(&self, key: &str) -> Option<&str> {
        self.memory.get_raw(key)
    }

    fn set_raw(&mut self, key: &str, value: String) -> DynastyResult<()> {
        self.memory.set_raw(key, value)?;
        self.mark_dirty()
    }

    fn remove(&mut self, key: &str) -> DynastyResult<()> {
        if !self.memory.contains(key) {
            return Ok(());
        }
        self.memory.remove(key)?;
        self.mark_dirty()
    }

    fn keys(&self) -> Vec<String> {
        self.memory.keys()
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.memory.keys_with_prefix(prefix)
    }

    fn flush(&mut self) -> DynastyResult<()> {
        if !self.dirty {
            return Ok(());
        }

        let data = encode_image(self.memory.records())?;
        write_atomic(&self.path, &data)?;
        self.dirty = false;

        log::debug!("Flushed {} bytes to {:?}", data.len(), self.path);
        Ok(())
    }
}

fn read_file(path: &Path) -> DynastyResult<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(data)
}

/// Writes `data` next to `path` and renames it into place.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> DynastyResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.flush()?;
        file.sync_all()?;
    }

    rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dynasty.dat");

        {
            let mut store = FileStore::open(&path).unwrap();
            store.set_raw("currentYear", "2025".to_string()).unwrap();
            store.set_raw("schedule_2025", "[]".to_string()).unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get_raw("currentYear"), Some("2025"));
        assert_eq!(store.keys_with_prefix("schedule_"), vec!["schedule_2025"]);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_deferred_store_writes_on_flush() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deferred.dat");

        let mut store = FileStore::open_deferred(&path).unwrap();
        store.set_raw("players", "[]".to_string()).unwrap();
        assert!(!path.exists());
        assert!(store.is_dirty());

        store.flush().unwrap();
        assert!(path.exists());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_checksum_validation() {
        let mut records = BTreeMap::new();
        records.insert("currentYear".to_string(), "2030".to_string());
        let mut bytes = encode_image(&records).unwrap();

        if let Some(last) = bytes.last_mut() {
            *last = last.wrapping_add(1);
        }

        assert!(matches!(decode_image(&bytes), Err(DynastyError::ChecksumMismatch)));
        assert!(matches!(decode_image(&[0u8; 8]), Err(DynastyError::Corrupted)));
    }

    #[test]
    fn test_corrupt_image_is_an_error_not_an_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.dat");
        std::fs::write(&path, vec![7u8; 64]).unwrap();

        assert!(FileStore::open(&path).is_err());
    }

    #[test]
    fn test_image_info() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("info.dat");

        let mut store = FileStore::open(&path).unwrap();
        assert!(matches!(store.image_info(), Err(DynastyError::FileNotFound { .. })));

        store.set_raw("players", "[]".to_string()).unwrap();
        let info = store.image_info().unwrap();
        assert_eq!(info.record_count, 1);
        assert_eq!(info.version, STORE_VERSION);
        assert_eq!(info.checksum.len(), 64);
    }
}
