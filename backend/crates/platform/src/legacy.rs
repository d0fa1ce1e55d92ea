//! Legacy Credential Verification
//!
//! Verifies bcrypt digests carried over from the previous system.
//! This module is verify-only: new hashes are always produced by the
//! current scheme in [`crate::password`], and a successful legacy
//! verification is the trigger for migrating the account.

use std::fmt;

use thiserror::Error;

use crate::password::ClearTextPassword;

/// Errors raised while verifying a legacy digest
///
/// Callers on the login path are expected to fold these into their
/// generic invalid-credential outcome rather than surface them.
#[derive(Debug, Error)]
pub enum LegacyHashError {
    /// Digest is not a structurally valid bcrypt string
    #[error("Malformed legacy digest")]
    Malformed,

    /// bcrypt rejected the input (e.g. password longer than 72 bytes)
    #[error("Legacy verification failed: {0}")]
    VerifyFailed(String),
}

/// A bcrypt digest imported from the legacy system
///
/// Stored verbatim as imported. Construction does not validate the
/// digest: corrupt imports must still round-trip through the store
/// unchanged, and only fail at verification time.
#[derive(Clone, PartialEq, Eq)]
pub struct LegacyHash(String);

impl LegacyHash {
    /// Wrap an imported digest verbatim
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// The digest exactly as imported, for storage
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify a password against this legacy digest
    ///
    /// ## Returns
    /// - `Ok(true)` - the password matches
    /// - `Ok(false)` - the password does not match
    /// - `Err(_)` - the digest is malformed or bcrypt errored
    pub fn verify(&self, password: &ClearTextPassword) -> Result<bool, LegacyHashError> {
        bcrypt::verify(password.as_bytes(), &self.0).map_err(|e| match e {
            bcrypt::BcryptError::InvalidHash(_) => LegacyHashError::Malformed,
            other => LegacyHashError::VerifyFailed(other.to_string()),
        })
    }
}

impl fmt::Debug for LegacyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LegacyHash").field(&"[HASH]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bcrypt_digest(password: &str) -> String {
        // Low cost keeps the test fast; verification ignores cost.
        bcrypt::hash(password, 4).unwrap()
    }

    #[test]
    fn test_verify_correct_password() {
        let hash = LegacyHash::new(bcrypt_digest("pass123"));
        let password = ClearTextPassword::new_unchecked("pass123".to_string());
        assert!(hash.verify(&password).unwrap());
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = LegacyHash::new(bcrypt_digest("pass123"));
        let password = ClearTextPassword::new_unchecked("wrong-password".to_string());
        assert!(!hash.verify(&password).unwrap());
    }

    #[test]
    fn test_verify_malformed_digest() {
        let hash = LegacyHash::new("not-a-bcrypt-hash");
        let password = ClearTextPassword::new_unchecked("pass123".to_string());
        assert!(matches!(
            hash.verify(&password),
            Err(LegacyHashError::Malformed)
        ));
    }

    #[test]
    fn test_digest_stored_verbatim() {
        let digest = bcrypt_digest("pass123");
        let hash = LegacyHash::new(digest.clone());
        assert_eq!(hash.as_str(), digest);
    }

    #[test]
    fn test_debug_redaction() {
        let hash = LegacyHash::new(bcrypt_digest("pass123"));
        let debug_output = format!("{:?}", hash);
        assert!(debug_output.contains("[HASH]"));
        assert!(!debug_output.contains("$2"));
    }
}
