//! User Name Value Object
//!
//! Login identifier distinct from the email field. Self-registered and
//! imported users get their email as username, so the format must
//! admit email-shaped strings.
//!
//! Lookup is case-insensitive: the canonical (lowercased) form is what
//! gets indexed and queried, while the original spelling is preserved
//! for display.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for user name (matches the email limit, since
/// usernames are typically emails here)
pub const USER_NAME_MAX_LENGTH: usize = 254;

/// User name with original and canonical forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    /// Create a new user name with validation
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let original = name.into().trim().to_string();

        if original.is_empty() {
            return Err(AppError::bad_request("User name cannot be empty"));
        }

        if original.chars().count() > USER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "User name must be at most {} characters",
                USER_NAME_MAX_LENGTH
            )));
        }

        if original.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AppError::bad_request(
                "User name cannot contain whitespace or control characters",
            ));
        }

        let canonical = original.to_lowercase();

        Ok(Self {
            original,
            canonical,
        })
    }

    /// Create from database values (assumed already validated)
    pub fn from_db(original: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            canonical: canonical.into(),
        }
    }

    /// The name as the user entered it
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lowercased form used for uniqueness and lookup
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_valid() {
        assert!(UserName::new("alice").is_ok());
        assert!(UserName::new("alice@example.com").is_ok());
    }

    #[test]
    fn test_user_name_invalid() {
        assert!(UserName::new("").is_err());
        assert!(UserName::new("   ").is_err());
        assert!(UserName::new("has space").is_err());
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_canonical_is_lowercase() {
        let name = UserName::new("Alice@Example.COM").unwrap();
        assert_eq!(name.original(), "Alice@Example.COM");
        assert_eq!(name.canonical(), "alice@example.com");
    }
}
