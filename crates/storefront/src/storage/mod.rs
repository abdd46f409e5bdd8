//! Key-value persistence capability.
//!
//! Every store persists through a [`KeyValueStore`] handed to it at
//! construction. The contract is small: `get`, `set` and
//! `remove` over string keys holding JSON blobs.
//!
//! # Keys
//!
//! - `cart` - Cart lines
//! - `wishlist` - Wishlist entries
//! - `currentUser` - Active session (account without credential)
//! - `users` - Directory of registered accounts with credential hashes
//! - `orders_{accountId}` - Per-account order list
//!
//! An absent key always reads as an empty collection.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use pocketshop_core::AccountId;

/// Fixed storage keys.
pub mod keys {
    use super::AccountId;

    /// Cart lines.
    pub const CART: &str = "cart";
    /// Wishlist entries.
    pub const WISHLIST: &str = "wishlist";
    /// Active session snapshot.
    pub const CURRENT_USER: &str = "currentUser";
    /// Registered account directory.
    pub const USERS: &str = "users";

    /// Order list key for one account.
    #[must_use]
    pub fn orders(account: &AccountId) -> String {
        format!("orders_{account}")
    }
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("storage I/O error for key `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A persisted blob could not be decoded.
    #[error("corrupt data under key `{key}`: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded.
    #[error("failed to serialize value for key `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The key contains characters the backend cannot store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string-keyed blob store.
///
/// Implementations must be safe to share between stores; each store holds an
/// `Arc<dyn KeyValueStore>` and writes through it on every mutation.
pub trait KeyValueStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the blob under `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Load and decode a JSON value.
///
/// Returns `Ok(None)` when the key is absent.
///
/// # Errors
///
/// Returns `StorageError::Corrupt` if the blob is not valid JSON for `T`.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(blob) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&blob)
        .map(Some)
        .map_err(|source| StorageError::Corrupt {
            key: key.to_string(),
            source,
        })
}

/// Load a JSON collection, treating an absent key as empty.
///
/// # Errors
///
/// Returns `StorageError::Corrupt` if the blob is not valid JSON for `T`.
pub fn load_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>, StorageError> {
    Ok(load_json(store, key)?.unwrap_or_default())
}

/// Encode a value as JSON and store it.
///
/// # Errors
///
/// Returns `StorageError` if encoding or the write fails.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let blob = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &blob)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_collection_is_empty() {
        let store = MemoryStore::new();
        let items: Vec<u32> = load_collection(&store, keys::CART).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        save_json(&store, keys::WISHLIST, &[1, 2, 3]).unwrap();
        let items: Vec<u32> = load_collection(&store, keys::WISHLIST).unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_corrupt_blob_is_reported() {
        let store = MemoryStore::new();
        store.set(keys::CART, "{not json").unwrap();
        let result: Result<Vec<u32>, _> = load_collection(&store, keys::CART);
        assert!(matches!(result, Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn test_orders_key_embeds_account_id() {
        let id = AccountId::generate();
        assert_eq!(keys::orders(&id), format!("orders_{id}"));
    }
}
