//! Credential Entity
//!
//! The `(current, legacy)` hash pair for one user. Separated from the
//! User entity to isolate sensitive data, and because this pair is the
//! only shared mutable state two concurrent logins can race on.
//!
//! Lifecycle:
//! - self-registration: usable current hash, no legacy hash
//! - bulk import: unusable current hash, legacy hash set
//! - first successful legacy login: migrated to a usable current hash,
//!   legacy hash cleared; never repopulated except by a fresh import

use chrono::{DateTime, Utc};
use platform::legacy::LegacyHash;
use platform::password::HashedPassword;

use crate::domain::value_object::{stored_password::StoredPassword, user_id::UserId};

/// Credential entity
#[derive(Debug, Clone)]
pub struct Credential {
    /// Reference to User
    pub user_id: UserId,
    /// Current-scheme credential (may be the unusable sentinel)
    pub password: StoredPassword,
    /// Legacy bcrypt digest, `None` once migrated or never imported
    pub legacy_hash: Option<LegacyHash>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// Credential for a self-registered user
    pub fn from_password(user_id: UserId, password: StoredPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            password,
            legacy_hash: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Credential for an imported user: unusable until migrated
    pub fn imported(user_id: UserId, legacy_hash: Option<LegacyHash>) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            password: StoredPassword::Unusable,
            legacy_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the legacy fallback path applies
    pub fn has_legacy(&self) -> bool {
        self.legacy_hash.is_some()
    }

    /// Apply a migration locally (repositories perform the
    /// conditional write; this keeps in-memory state consistent)
    pub fn migrate(&mut self, new_hash: HashedPassword) {
        self.password = StoredPassword::Usable(new_hash);
        self.legacy_hash = None;
        self.updated_at = Utc::now();
    }
}
