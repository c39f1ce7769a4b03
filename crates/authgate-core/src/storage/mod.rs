//! Synchronous key-value persistence.
//!
//! The session store only needs three operations on string values, so the
//! backend is a small trait with two implementations:
//! - `FileKvStore`: one file per key inside a namespace directory, durable
//!   across restarts
//! - `MemoryKvStore`: process-local map for tests and ephemeral runs

pub mod error;
pub mod file;
pub mod memory;

pub use error::StorageError;
pub use file::FileKvStore;
pub use memory::MemoryKvStore;

/// Default namespace for auth data
pub const DEFAULT_NAMESPACE: &str = "auth-storage";

/// A durable string map. Each operation is atomic on its own.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Reject keys that could escape a namespace directory or clash with
/// temporary files (which start with a dot).
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let bad = key.is_empty()
        || key.starts_with('.')
        || key.contains(['/', '\\'])
        || key.chars().any(char::is_control);
    if bad {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
