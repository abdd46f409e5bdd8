//! Account store and local authentication.
//!
//! Accounts live in a local directory (`users`) alongside an Argon2id hash
//! of each password. The active session (`currentUser`) is a credential-free
//! snapshot of one directory record.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use chrono::Utc;
use tracing::instrument;

use pocketshop_core::{AccountId, Email, PasswordHash};

use crate::db::users::{self, UserRepository};
use crate::events::{AccountEvent, Notifier};
use crate::models::account::{Account, DirectoryRecord, ProfileUpdate};
use crate::storage::{KeyValueStore, StorageError};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Account directory plus the active session.
pub struct AccountStore {
    store: Arc<dyn KeyValueStore>,
    notifier: Notifier,
    directory: Vec<DirectoryRecord>,
    session: Option<Account>,
}

impl AccountStore {
    /// Load the directory and any persisted session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if either record cannot be read or decoded.
    pub fn load(store: Arc<dyn KeyValueStore>, notifier: Notifier) -> Result<Self, StorageError> {
        let repo = UserRepository::new(store.as_ref());
        let directory = repo.load_directory()?;
        let session = repo.load_session()?;
        tracing::debug!(
            accounts = directory.len(),
            signed_in = session.is_some(),
            "Loaded accounts"
        );
        Ok(Self {
            store,
            notifier,
            directory,
            session,
        })
    }

    /// The signed-in account, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&Account> {
        self.session.as_ref()
    }

    /// Number of registered accounts.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.directory.len()
    }

    fn repo(&self) -> UserRepository<'_> {
        UserRepository::new(self.store.as_ref())
    }

    // =========================================================================
    // Registration & Login
    // =========================================================================

    /// Register a new account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if any field is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, email, password, name))]
    pub fn register(&mut self, email: &str, password: &str, name: &str) -> Result<Account, AuthError> {
        let result = self.try_register(email, password, name);
        match &result {
            Ok(account) => {
                tracing::info!(account_id = %account.id, "Registered account");
                self.notifier.emit(AccountEvent::Registered {
                    email: account.email.to_string(),
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "Registration rejected");
                self.notifier.emit(AccountEvent::RegistrationFailed {
                    reason: e.user_message(),
                });
            }
        }
        result
    }

    fn try_register(&mut self, email: &str, password: &str, name: &str) -> Result<Account, AuthError> {
        let name = name.trim();
        if email.is_empty() || password.is_empty() || name.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let email = Email::parse(email)?;
        validate_password(password)?;

        if users::email_taken(&self.directory, &email) {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(password)?;
        let account = Account {
            id: AccountId::generate(),
            email,
            name: name.to_string(),
            loyalty_points: 0,
            created_at: Utc::now(),
        };

        self.directory.push(DirectoryRecord {
            account: account.clone(),
            password_hash,
        });
        self.session = Some(account.clone());

        let repo = self.repo();
        repo.save_directory(&self.directory)?;
        repo.save_session(&account)?;

        Ok(account)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if either field is blank.
    /// Returns `AuthError::InvalidCredentials` if no account matches.
    #[instrument(skip(self, email, password))]
    pub fn login(&mut self, email: &str, password: &str) -> Result<Account, AuthError> {
        let result = self.try_login(email, password);
        match &result {
            Ok(account) => {
                tracing::info!(account_id = %account.id, "Signed in");
                self.notifier.emit(AccountEvent::LoggedIn {
                    email: account.email.to_string(),
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "Login rejected");
                self.notifier.emit(AccountEvent::LoginFailed);
            }
        }
        result
    }

    fn try_login(&mut self, email: &str, password: &str) -> Result<Account, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let record =
            users::find_by_email(&self.directory, email).ok_or(AuthError::InvalidCredentials)?;
        verify_password(password, &record.password_hash)?;

        let account = record.account.clone();
        self.repo().save_session(&account)?;
        self.session = Some(account.clone());
        Ok(account)
    }

    /// End the active session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the persisted session cannot be removed.
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.session = None;
        self.repo().clear_session()?;
        self.notifier.emit(AccountEvent::LoggedOut);
        Ok(())
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Merge `update` into the active session and its directory record.
    ///
    /// Returns `Ok(None)` without touching anything when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the update changes the email
    /// to one registered by another account.
    /// Returns `AuthError::Storage` if the write fails.
    #[instrument(skip(self, update))]
    pub fn update_profile(&mut self, update: &ProfileUpdate) -> Result<Option<Account>, AuthError> {
        let Some(current_id) = self.session.as_ref().map(|account| account.id) else {
            return Ok(None);
        };

        if let Some(email) = &update.email {
            let clash = self
                .directory
                .iter()
                .any(|r| r.account.email == *email && r.account.id != current_id);
            if clash {
                return Err(AuthError::UserAlreadyExists);
            }
        }

        let updated = {
            let Some(session) = self.session.as_mut() else {
                return Ok(None);
            };
            session.apply(update);
            session.clone()
        };

        let repo = self.repo();
        repo.save_session(&updated)?;

        if let Some(record) = self
            .directory
            .iter_mut()
            .find(|r| r.account.id == current_id)
        {
            record.account.apply(update);
            self.repo().save_directory(&self.directory)?;
        } else {
            tracing::warn!(account_id = %current_id, "Session has no directory record");
        }

        self.notifier.emit(AccountEvent::ProfileUpdated);
        Ok(Some(updated))
    }

    /// Add `points` to the active account's loyalty balance.
    ///
    /// Returns `Ok(None)` when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the write fails.
    pub fn add_loyalty_points(&mut self, points: u64) -> Result<Option<Account>, AuthError> {
        let Some(balance) = self.session.as_ref().map(|a| a.loyalty_points) else {
            return Ok(None);
        };
        self.update_profile(&ProfileUpdate::loyalty_points(balance.saturating_add(points)))
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<PasswordHash, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| PasswordHash::new(hash.to_string()))
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &PasswordHash) -> Result<(), AuthError> {
    let parsed_hash = PhcHash::new(hash.as_str()).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::events::{RecordingObserver, StoreEvent};
    use crate::storage::{MemoryStore, keys};

    fn accounts() -> (AccountStore, Arc<MemoryStore>, Arc<RecordingObserver>) {
        let store = Arc::new(MemoryStore::new());
        let notifier = Notifier::new();
        let recorder = Arc::new(RecordingObserver::new());
        notifier.subscribe(recorder.clone());
        let accounts = AccountStore::load(store.clone(), notifier).unwrap();
        (accounts, store, recorder)
    }

    #[test]
    fn test_register_once_then_conflict() {
        let (mut accounts, _, recorder) = accounts();

        let account = accounts.register("a@b.com", "abcdef", "A").unwrap();
        assert_eq!(account.loyalty_points, 0);
        assert_eq!(accounts.current(), Some(&account));

        let second = accounts.register("a@b.com", "abcdef", "A");
        assert!(matches!(second, Err(AuthError::UserAlreadyExists)));
        assert_eq!(accounts.registered_count(), 1);
        assert!(matches!(
            recorder.events().last(),
            Some(StoreEvent::Account(AccountEvent::RegistrationFailed { .. }))
        ));
    }

    #[test]
    fn test_register_validation() {
        let (mut accounts, _, _) = accounts();

        assert!(matches!(
            accounts.register("", "abcdef", "A"),
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            accounts.register("a@b.com", "abcdef", "   "),
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            accounts.register("not-an-email", "abcdef", "A"),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            accounts.register("a@b.com", "abcde", "A"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(accounts.current().is_none());
        assert_eq!(accounts.registered_count(), 0);
    }

    #[test]
    fn test_persisted_records_hold_hash_not_password() {
        let (mut accounts, store, _) = accounts();
        accounts.register("a@b.com", "abcdef", "A").unwrap();

        let directory = store.get(keys::USERS).unwrap().unwrap();
        assert!(!directory.contains("abcdef"));
        assert!(directory.contains("$argon2id$"));

        let session = store.get(keys::CURRENT_USER).unwrap().unwrap();
        assert!(!session.contains("passwordHash"));
    }

    #[test]
    fn test_login_wrong_password_fails() {
        let (mut accounts, _, _) = accounts();
        accounts.register("a@b.com", "abcdef", "A").unwrap();
        accounts.logout().unwrap();

        assert!(matches!(
            accounts.login("a@b.com", "wrong-password"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            accounts.login("nobody@b.com", "abcdef"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            accounts.login("a@b.com", ""),
            Err(AuthError::MissingFields)
        ));
        assert!(accounts.current().is_none());
    }

    #[test]
    fn test_login_preserves_loyalty_points() {
        let (mut accounts, _, _) = accounts();
        accounts.register("a@b.com", "abcdef", "A").unwrap();
        accounts.add_loyalty_points(250).unwrap();
        accounts.add_loyalty_points(50).unwrap();
        accounts.logout().unwrap();

        let account = accounts.login("a@b.com", "abcdef").unwrap();
        assert_eq!(account.loyalty_points, 300);
    }

    #[test]
    fn test_logout_clears_session_and_persistence() {
        let (mut accounts, store, _) = accounts();
        accounts.register("a@b.com", "abcdef", "A").unwrap();

        accounts.logout().unwrap();

        assert!(accounts.current().is_none());
        assert!(!store.contains(keys::CURRENT_USER));
    }

    #[test]
    fn test_profile_changes_are_noops_without_session() {
        let (mut accounts, store, _) = accounts();

        assert_eq!(accounts.update_profile(&ProfileUpdate::name("X")).unwrap(), None);
        assert_eq!(accounts.add_loyalty_points(10).unwrap(), None);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_update_profile_writes_session_and_directory() {
        let (mut accounts, store, _) = accounts();
        accounts.register("a@b.com", "abcdef", "A").unwrap();

        let updated = accounts
            .update_profile(&ProfileUpdate::name("Ada"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Ada");

        let reloaded = AccountStore::load(store, Notifier::new()).unwrap();
        assert_eq!(reloaded.current().map(|a| a.name.as_str()), Some("Ada"));
        assert_eq!(reloaded.directory[0].account.name, "Ada");
    }

    #[test]
    fn test_update_profile_rejects_taken_email() {
        let (mut accounts, _, _) = accounts();
        accounts.register("a@b.com", "abcdef", "A").unwrap();
        accounts.register("c@d.com", "abcdef", "C").unwrap();

        let update = ProfileUpdate {
            email: Some(Email::parse("a@b.com").unwrap()),
            ..ProfileUpdate::default()
        };
        assert!(matches!(
            accounts.update_profile(&update),
            Err(AuthError::UserAlreadyExists)
        ));
    }

    #[test]
    fn test_session_survives_reload() {
        let (mut accounts, store, _) = accounts();
        let account = accounts.register("a@b.com", "abcdef", "A").unwrap();

        let reloaded = AccountStore::load(store, Notifier::new()).unwrap();
        assert_eq!(reloaded.current(), Some(&account));
        assert_eq!(reloaded.registered_count(), 1);
    }
}
