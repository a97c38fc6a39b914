//! Durable client-side storage.
//!
//! A small file-backed key/value store standing in for the browser's
//! persistent storage: each key is a JSON file under the configured data
//! directory, so cart and wishlist survive restarts without a database.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Well-known storage keys.
pub mod keys {
    /// The cart's line items.
    pub const CART: &str = "cart";
    /// Product IDs wishlisted while signed out.
    pub const WISHLIST: &str = "wishlist";
    /// Flat shipping cost chosen at checkout.
    pub const SHIPPING_COST: &str = "shipping_cost";
}

/// Errors that can occur writing to the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed JSON key/value store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read and deserialize a value.
    ///
    /// A missing key reads as `None`. So does a corrupt file: losing a cart
    /// beats refusing to start, so corruption is logged and treated as
    /// absent.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return None,
            Err(error) => {
                warn!(key, %error, "failed to read stored value");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(key, %error, "stored value is corrupt, treating as absent");
                None
            }
        }
    }

    /// Serialize and write a value, replacing any previous one.
    ///
    /// The write goes through a temporary file and rename so a crash
    /// mid-write never leaves a half-written value behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Delete a key. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(StoreError::Io(error)),
        }
    }

    /// The directory this store writes under.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_set_get_roundtrip() {
        let (_dir, store) = test_store();
        store.set(keys::SHIPPING_COST, &25_i64).unwrap();
        assert_eq!(store.get::<i64>(keys::SHIPPING_COST), Some(25));
    }

    #[test]
    fn test_missing_key_is_none() {
        let (_dir, store) = test_store();
        assert_eq!(store.get::<Vec<String>>("nope"), None);
    }

    #[test]
    fn test_corrupt_value_is_none() {
        let (_dir, store) = test_store();
        fs::write(store.path_for(keys::CART), "{not json").unwrap();
        assert_eq!(store.get::<Vec<String>>(keys::CART), None);
    }

    #[test]
    fn test_set_overwrites() {
        let (_dir, store) = test_store();
        store.set("k", &vec![1, 2]).unwrap();
        store.set("k", &vec![3]).unwrap();
        assert_eq!(store.get::<Vec<i32>>("k"), Some(vec![3]));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, store) = test_store();
        store.set("k", &1).unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get::<i32>("k"), None);
    }

    #[test]
    fn test_survives_reopen() {
        let (_dir, store) = test_store();
        store.set(keys::WISHLIST, &vec![7_i64, 9]).unwrap();
        let reopened = LocalStore::open(store.dir()).unwrap();
        assert_eq!(reopened.get::<Vec<i64>>(keys::WISHLIST), Some(vec![7, 9]));
    }
}
