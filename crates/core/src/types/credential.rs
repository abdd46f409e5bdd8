//! Stored credential types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A PHC-format password hash (e.g. `$argon2id$v=19$...`).
///
/// Only the hash is ever persisted; the plaintext password never leaves the
/// call that registers or verifies it. `Debug` is redacted so the hash does
/// not end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-computed PHC hash string.
    #[must_use]
    pub const fn new(phc: String) -> Self {
        Self(phc)
    }

    /// Get the PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
