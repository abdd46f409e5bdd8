//! User repository for the account directory and session snapshot.

use pocketshop_core::Email;

use crate::models::account::{Account, DirectoryRecord};
use crate::storage::{self, KeyValueStore, StorageError, keys};

/// Repository for account persistence.
pub struct UserRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Load every registered account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be read or decoded.
    pub fn load_directory(&self) -> Result<Vec<DirectoryRecord>, StorageError> {
        storage::load_collection(self.store, keys::USERS)
    }

    /// Replace the stored directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn save_directory(&self, records: &[DirectoryRecord]) -> Result<(), StorageError> {
        storage::save_json(self.store, keys::USERS, records)
    }

    /// Load the active session, if one was persisted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session blob cannot be read or decoded.
    pub fn load_session(&self) -> Result<Option<Account>, StorageError> {
        storage::load_json(self.store, keys::CURRENT_USER)
    }

    /// Persist the active session. The snapshot never includes a credential.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn save_session(&self, account: &Account) -> Result<(), StorageError> {
        storage::save_json(self.store, keys::CURRENT_USER, account)
    }

    /// Erase the persisted session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        self.store.remove(keys::CURRENT_USER)
    }
}

/// Find a directory record by exact email.
#[must_use]
pub fn find_by_email<'r>(records: &'r [DirectoryRecord], email: &str) -> Option<&'r DirectoryRecord> {
    records.iter().find(|r| r.account.email.as_str() == email)
}

/// Whether `email` is already registered.
#[must_use]
pub fn email_taken(records: &[DirectoryRecord], email: &Email) -> bool {
    find_by_email(records, email.as_str()).is_some()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use pocketshop_core::{AccountId, PasswordHash};

    use super::*;
    use crate::storage::MemoryStore;

    fn record(email: &str) -> DirectoryRecord {
        DirectoryRecord {
            account: Account {
                id: AccountId::generate(),
                email: Email::parse(email).unwrap(),
                name: "Test".to_string(),
                loyalty_points: 0,
                created_at: Utc::now(),
            },
            password_hash: PasswordHash::new("$argon2id$stub".to_string()),
        }
    }

    #[test]
    fn test_directory_roundtrip() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);
        assert!(repo.load_directory().unwrap().is_empty());

        repo.save_directory(&[record("a@b.com"), record("c@d.com")])
            .unwrap();
        let loaded = repo.load_directory().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(find_by_email(&loaded, "c@d.com").is_some());
        assert!(email_taken(&loaded, &Email::parse("a@b.com").unwrap()));
        assert!(!email_taken(&loaded, &Email::parse("x@y.com").unwrap()));
    }

    #[test]
    fn test_session_save_and_clear() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);
        let account = record("a@b.com").account;

        repo.save_session(&account).unwrap();
        assert_eq!(repo.load_session().unwrap(), Some(account));

        repo.clear_session().unwrap();
        assert_eq!(repo.load_session().unwrap(), None);
    }
}
