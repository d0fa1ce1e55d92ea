//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer. Operations are intention-revealing and
//! atomic: there is no load-mutate-save cycle on the credential pair,
//! only `migrate_credential`, whose conditional write is what makes
//! concurrent migrations of the same account race-safe.

use platform::legacy::LegacyHash;
use platform::password::HashedPassword;

use crate::domain::entity::{
    credential::Credential,
    imported_user::{ImportedUser, UpsertOutcome},
    user::User,
};
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::AuthResult;

/// User directory repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email (case-insensitive: `Email` is canonical)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find user by username, matched on the canonical form
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Total number of users (the first registration is elevated)
    async fn count(&self) -> AuthResult<u64>;

    /// Update a user's role
    async fn update_role(&self, user_id: &UserId, role: UserRole) -> AuthResult<()>;
}

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Create credentials for a user
    async fn create(&self, credential: &Credential) -> AuthResult<()>;

    /// Find credentials by user ID
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>>;

    /// One-time migration from the legacy scheme.
    ///
    /// Atomically sets the current hash and clears the legacy digest,
    /// conditioned on the legacy digest still equaling
    /// `expected_legacy`. Returns `false` when the guard failed
    /// (a concurrent request already migrated this account), which
    /// callers treat as a no-op success.
    async fn migrate_credential(
        &self,
        user_id: &UserId,
        expected_legacy: &LegacyHash,
        new_hash: &HashedPassword,
    ) -> AuthResult<bool>;
}

/// Bulk import repository trait
#[trait_variant::make(ImportRepository: Send)]
pub trait LocalImportRepository {
    /// Upsert one imported account, keyed by email.
    ///
    /// Existing records get profile fields refreshed (role only when
    /// the import carries one), the current hash forced unusable, and
    /// the legacy digest overwritten verbatim. Missing records are
    /// created the same way.
    async fn upsert_imported(&self, record: &ImportedUser) -> AuthResult<UpsertOutcome>;
}
