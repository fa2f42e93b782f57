//! File-backed key-value persistence
//!
//! All keys live in a single JSON object on disk. The whole object is
//! rewritten on every `set`, using atomic writes (write to temp file, then
//! rename) to prevent corruption.
//!
//! Storage location: `~/.local/share/quotebook/storage.json` (configurable
//! via `Config`)

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::error::{IoOp, StorageError, StorageResult};
use super::KeyValueStore;

/// Durable key-value store backed by one JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading existing entries
    ///
    /// Never fails: a missing or unreadable file yields an empty store, and a
    /// file that cannot be parsed is moved to a `.corrupt.backup` sibling
    /// first. Write problems surface later, from `set`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        debug!("Opened storage at {:?} ({} keys)", path, entries.len());

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Check if the backing file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        let previous = entries.insert(key.to_string(), value.to_string());

        let written = serde_json::to_vec(&*entries)
            .map_err(StorageError::from)
            .and_then(|bytes| atomic_write(&self.path, &bytes));

        if written.is_err() {
            // Keep memory in line with what is on disk
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
        }

        written
    }
}

/// Read the entries map, starting empty on any failure
fn load_entries(path: &Path) -> BTreeMap<String, String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            warn!("Failed to read {:?}, starting empty: {}", path, e);
            return BTreeMap::new();
        }
    };

    let details = match serde_json::from_str(&content) {
        Ok(entries) => return entries,
        Err(e) => e.to_string(),
    };

    let backup_path = path.with_extension("corrupt.backup");
    match fs::rename(path, &backup_path) {
        Ok(()) => warn!(
            "{}",
            StorageError::Corrupt {
                path: path.to_path_buf(),
                backup_path,
                details,
            }
        ),
        Err(e) => warn!(
            "Storage file {:?} is unreadable ({}) and could not be moved to {:?}: {}",
            path, details, backup_path, e
        ),
    }

    BTreeMap::new()
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDataDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Same directory, so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let write_err = |e| StorageError::from_io(IoOp::Write, e, temp_path.clone());

    let mut file = File::create(&temp_path).map_err(write_err)?;
    file.write_all(data).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::Rename {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_path(temp_dir: &TempDir) -> PathBuf {
        temp_dir.path().join("storage.json")
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(storage_path(&temp_dir));

        assert!(!store.exists());
        assert!(store.get("quotes").unwrap().is_none());
    }

    #[test]
    fn test_set_and_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = storage_path(&temp_dir);

        {
            let store = FileStore::open(&path);
            store.set("quotes", "[]").unwrap();
            store.set("selectedCategory", "Zen").unwrap();
            assert!(store.exists());
        }

        let store = FileStore::open(&path);
        assert_eq!(store.get("quotes").unwrap().as_deref(), Some("[]"));
        assert_eq!(
            store.get("selectedCategory").unwrap().as_deref(),
            Some("Zen")
        );
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(storage_path(&temp_dir));

        store.set("selectedCategory", "Zen").unwrap();
        store.set("selectedCategory", "all").unwrap();

        assert_eq!(
            store.get("selectedCategory").unwrap().as_deref(),
            Some("all")
        );
    }

    #[test]
    fn test_corrupt_file_is_backed_up() {
        let temp_dir = TempDir::new().unwrap();
        let path = storage_path(&temp_dir);
        fs::write(&path, "{ this is not json").unwrap();

        let store = FileStore::open(&path);
        assert!(store.get("quotes").unwrap().is_none());

        let backup = path.with_extension("corrupt.backup");
        assert!(backup.exists());
        assert_eq!(fs::read_to_string(backup).unwrap(), "{ this is not json");
        assert!(!path.exists());
    }

    #[test]
    fn test_unreadable_path_opens_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = storage_path(&temp_dir);
        fs::create_dir_all(&path).unwrap();

        let store = FileStore::open(&path);
        assert!(store.get("quotes").unwrap().is_none());

        // Writes still report the problem
        assert!(store.set("quotes", "[]").is_err());
        assert!(path.is_dir());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir
            .path()
            .join("a")
            .join("b")
            .join("storage.json");

        atomic_write(&nested_path, b"{}").unwrap();

        assert!(nested_path.exists());
        assert!(!nested_path.with_extension("tmp").exists());
        assert_eq!(fs::read_to_string(&nested_path).unwrap(), "{}");
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes every rename fail
        let path = storage_path(&temp_dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let store = FileStore {
            path: path.clone(),
            entries: Mutex::new(BTreeMap::new()),
        };

        assert!(store.set("quotes", "[]").is_err());
        assert!(store.get("quotes").unwrap().is_none());
    }
}
