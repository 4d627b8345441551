// File: src/persistence.rs
use crate::error::StorageError;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Key holding the serialized user map.
pub const USERS_KEY: &str = "users";
/// Key holding the UI theme preference.
pub const THEME_KEY: &str = "theme";

/// Durable string key-value storage. Reads never fail: anything that cannot
/// be read is reported as absent.
pub trait DurableStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Key-value storage that only lives as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The whole key-value map kept as a single bincode snapshot on disk.
/// Every `set` rewrites the snapshot through a temp file and an atomic rename.
pub struct FileStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStorage {
    /// Opens the snapshot at `path`. A missing or corrupt file starts empty.
    pub fn open(path: &Path) -> Self {
        let values = match load_snapshot(path) {
            Ok(values) => values,
            Err(e) => {
                if path.exists() {
                    warn!(path = %path.display(), error = %e, "unreadable snapshot, starting empty");
                } else {
                    debug!(path = %path.display(), "no snapshot yet");
                }
                BTreeMap::new()
            }
        };
        Self { path: path.to_path_buf(), values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        save_snapshot(&self.values, &self.path)
    }
}

fn load_snapshot(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    // slice decoding bounds every length prefix by the bytes actually present
    let bytes = fs::read(path)?;
    Ok(bincode::deserialize(&bytes)?)
}

fn save_snapshot(values: &BTreeMap<String, String>, path: &Path) -> Result<(), StorageError> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, values)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| StorageError::Io(e.error))?;
    Ok(())
}

/// Remembers who is logged in for the lifetime of the session only.
pub trait SessionMarker {
    fn current(&self) -> Option<String>;
    fn set(&self, name: &str);
    fn clear(&self);
}

#[derive(Debug, Default)]
pub struct MemoryMarker {
    name: RefCell<Option<String>>,
}

impl MemoryMarker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionMarker for MemoryMarker {
    fn current(&self) -> Option<String> {
        self.name.borrow().clone()
    }

    fn set(&self, name: &str) {
        *self.name.borrow_mut() = Some(name.to_string());
    }

    fn clear(&self) {
        *self.name.borrow_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("profile.bin");
        let mut storage = FileStorage::open(&path);
        storage.set(THEME_KEY, "dark").unwrap();

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn corrupt_snapshot_reads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profile.bin");
        fs::write(&path, [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]).unwrap();
        let storage = FileStorage::open(&path);
        assert_eq!(storage.get(USERS_KEY), None);
    }

    #[test]
    fn marker_set_and_clear() {
        let marker = MemoryMarker::new();
        assert_eq!(marker.current(), None);
        marker.set("Tony");
        assert_eq!(marker.current().as_deref(), Some("Tony"));
        marker.clear();
        assert_eq!(marker.current(), None);
    }
}
