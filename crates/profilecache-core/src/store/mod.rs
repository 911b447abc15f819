//! Durable key/value storage.
//!
//! The cache and favorites components persist through the `PersistentStore`
//! contract: string values under stable keys, whole-value writes only. Two
//! backends are provided:
//! - `FileStore`: one JSON file per key, replaced atomically
//! - `MemoryStore`: process-local, used for tests and ephemeral runs

pub mod file_store;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use file_store::FileStore;
pub use memory::MemoryStore;

use crate::error::CoreError;

/// Key holding the current-profile cache entry.
pub const CURRENT_PROFILE_KEY: &str = "current_profile";

/// Key holding the favorites collection.
pub const FAVORITES_KEY: &str = "favorites";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub trait PersistentStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read and decode a JSON value. Absent keys are `Ok(None)`; unreadable or
/// unparsable values are `PersistenceReadMalformed`, which callers treat as
/// absent.
pub fn load_json<T, P>(store: &P, key: &str) -> Result<Option<T>, CoreError>
where
    T: DeserializeOwned,
    P: PersistentStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Ok(None),
        Err(e) => {
            return Err(CoreError::PersistenceReadMalformed {
                key: key.to_string(),
                reason: e.to_string(),
            })
        }
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| CoreError::PersistenceReadMalformed {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

/// Encode a value and write it under `key` in a single `set`.
pub fn save_json<T, P>(store: &P, key: &str, value: &T) -> Result<(), CoreError>
where
    T: Serialize + ?Sized,
    P: PersistentStore + ?Sized,
{
    let contents = serde_json::to_string(value)
        .map_err(|e| CoreError::write_failed(key, StoreError::Serialization(e)))?;
    store
        .set(key, &contents)
        .map_err(|e| CoreError::write_failed(key, e))
}
