//! Account domain types.
//!
//! An [`Account`] is what the session holds. A [`DirectoryRecord`] is what
//! the local account directory holds: the account plus its credential hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pocketshop_core::{AccountId, Email, PasswordHash};

/// A storefront account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Login email, unique across the directory.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Accrued loyalty points.
    pub loyalty_points: u64,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Apply the fields present in `update`.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(points) = update.loyalty_points {
            self.loyalty_points = points;
        }
    }
}

/// A directory entry: the account and its stored credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRecord {
    #[serde(flatten)]
    pub account: Account,
    pub password_hash: PasswordHash,
}

/// A partial profile change. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub loyalty_points: Option<u64>,
}

impl ProfileUpdate {
    /// Change only the display name.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Change only the loyalty balance.
    #[must_use]
    pub fn loyalty_points(points: u64) -> Self {
        Self {
            loyalty_points: Some(points),
            ..Self::default()
        }
    }

    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.loyalty_points.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            id: AccountId::generate(),
            email: Email::parse("a@b.com").unwrap(),
            name: "A".to_string(),
            loyalty_points: 5,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_merges_present_fields_only() {
        let mut acct = account();
        acct.apply(&ProfileUpdate::name("Ada"));
        assert_eq!(acct.name, "Ada");
        assert_eq!(acct.loyalty_points, 5);

        acct.apply(&ProfileUpdate::loyalty_points(40));
        assert_eq!(acct.name, "Ada");
        assert_eq!(acct.loyalty_points, 40);
    }

    #[test]
    fn test_directory_record_flattens_account() {
        let record = DirectoryRecord {
            account: account(),
            password_hash: PasswordHash::new("$argon2id$stub".to_string()),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["loyaltyPoints"], 5);
        assert_eq!(json["passwordHash"], "$argon2id$stub");

        let back: DirectoryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.account, record.account);
    }

    #[test]
    fn test_session_snapshot_has_no_credential() {
        let json = serde_json::to_value(account()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_empty_update() {
        assert!(ProfileUpdate::default().is_empty());
        assert!(!ProfileUpdate::name("x").is_empty());
    }
}
