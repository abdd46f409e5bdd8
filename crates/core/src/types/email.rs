//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace.
    #[error("email cannot contain whitespace")]
    ContainsWhitespace,
    /// The input does not contain an @ symbol.
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    /// The input contains more than one @ symbol.
    #[error("email must contain exactly one @ symbol")]
    MultipleAtSymbols,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain part (after @) is empty.
    #[error("email domain cannot be empty")]
    EmptyDomain,
    /// The domain has no dot separating a name from a top-level domain.
    #[error("email domain must look like name.tld")]
    MissingDomainDot,
}

/// An email address.
///
/// Validation accepts the `local@domain.tld` shape and nothing stricter.
///
/// ## Constraints
///
/// - Length: 1-254 characters (RFC 5321 limit)
/// - No whitespace anywhere
/// - Exactly one @ symbol, with a non-empty local part before it
/// - The domain contains a dot with at least one character on each side
///
/// ## Examples
///
/// ```
/// use pocketshop_core::Email;
///
/// // Valid emails
/// assert!(Email::parse("user@example.com").is_ok());
/// assert!(Email::parse("user.name+tag@domain.co.uk").is_ok());
///
/// // Invalid emails
/// assert!(Email::parse("").is_err());             // empty
/// assert!(Email::parse("no-at-symbol").is_err()); // missing @
/// assert!(Email::parse("@domain.com").is_err());  // empty local part
/// assert!(Email::parse("user@localhost").is_err()); // no tld
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty or longer than 254 characters
    /// - Contains whitespace
    /// - Does not contain exactly one @ symbol
    /// - Has an empty local part or domain
    /// - Has a domain without an interior dot
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::MissingAtSymbol)?;

        if domain.contains('@') {
            return Err(EmailError::MultipleAtSymbols);
        }

        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }

        if domain.is_empty() {
            return Err(EmailError::EmptyDomain);
        }

        let last = domain.len() - 1;
        let has_interior_dot = domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i < last);
        if !has_interior_dot {
            return Err(EmailError::MissingDomainDot);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user.name@example.com").is_ok());
        assert!(Email::parse("user+tag@example.com").is_ok());
        assert!(Email::parse("user@subdomain.example.com").is_ok());
        assert!(Email::parse("user@example.co.uk").is_ok());
        assert!(Email::parse("a@b.c").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(
            Email::parse("user @example.com"),
            Err(EmailError::ContainsWhitespace)
        );
    }

    #[test]
    fn test_parse_missing_at() {
        assert_eq!(
            Email::parse("no-at-symbol"),
            Err(EmailError::MissingAtSymbol)
        );
    }

    #[test]
    fn test_parse_multiple_at() {
        assert_eq!(
            Email::parse("a@b@c.com"),
            Err(EmailError::MultipleAtSymbols)
        );
    }

    #[test]
    fn test_parse_empty_local_part() {
        assert_eq!(
            Email::parse("@domain.com"),
            Err(EmailError::EmptyLocalPart)
        );
    }

    #[test]
    fn test_parse_empty_domain() {
        assert_eq!(Email::parse("user@"), Err(EmailError::EmptyDomain));
    }

    #[test]
    fn test_parse_domain_needs_interior_dot() {
        assert_eq!(
            Email::parse("user@localhost"),
            Err(EmailError::MissingDomainDot)
        );
        assert_eq!(
            Email::parse("user@example."),
            Err(EmailError::MissingDomainDot)
        );
        assert_eq!(
            Email::parse("user@.com"),
            Err(EmailError::MissingDomainDot)
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let email = Email::parse("user@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"user@example.com\"");

        let parsed: Email = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, email);
    }
}
