//! Stored Password Value Object
//!
//! The current-scheme credential slot on a user record. Either a
//! usable Argon2id hash or the unusable sentinel, which means "no
//! valid current-scheme credential exists". Imported users start
//! unusable and become usable on their first successful legacy login.

use platform::password::{ClearTextPassword, HashedPassword};
use std::fmt;

/// Database encoding of the unusable state. The leading `!` can never
/// appear in a PHC string, so the two encodings cannot collide.
const UNUSABLE_SENTINEL: &str = "!";

/// Current-scheme credential state
#[derive(Clone)]
pub enum StoredPassword {
    /// A usable Argon2id hash
    Usable(HashedPassword),
    /// No valid current-scheme credential
    Unusable,
}

impl StoredPassword {
    /// Hash a plaintext password into a usable credential
    pub fn from_clear_text(
        password: &ClearTextPassword,
        pepper: Option<&[u8]>,
    ) -> Result<Self, platform::password::PasswordHashError> {
        Ok(Self::Usable(password.hash(pepper)?))
    }

    /// Decode the database representation.
    ///
    /// Anything that is not a valid PHC string is treated as unusable
    /// rather than an error: a corrupt column must fail verification,
    /// not crash resolution.
    pub fn from_db(value: &str) -> Self {
        if value.is_empty() || value.starts_with(UNUSABLE_SENTINEL) {
            return Self::Unusable;
        }
        match HashedPassword::from_phc_string(value) {
            Ok(hash) => Self::Usable(hash),
            Err(_) => Self::Unusable,
        }
    }

    /// Encode for database storage
    pub fn to_db(&self) -> String {
        match self {
            Self::Usable(hash) => hash.as_phc_string().to_string(),
            Self::Unusable => UNUSABLE_SENTINEL.to_string(),
        }
    }

    /// Whether a current-scheme verification can possibly succeed
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Usable(_))
    }

    /// Verify a plaintext password. Always false when unusable.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        match self {
            Self::Usable(hash) => hash.verify(password, pepper),
            Self::Unusable => false,
        }
    }
}

impl fmt::Debug for StoredPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usable(_) => f.write_str("StoredPassword::Usable([HASH])"),
            Self::Unusable => f.write_str("StoredPassword::Unusable"),
        }
    }
}
