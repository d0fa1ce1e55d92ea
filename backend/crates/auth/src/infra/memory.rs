//! In-Memory Repository Implementation
//!
//! HashMap-backed store used by use case tests and local tooling.
//! Mirrors the PostgreSQL semantics, including the conditional write
//! in `migrate_credential`, which here runs under the store lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use platform::legacy::LegacyHash;
use platform::password::HashedPassword;
use uuid::Uuid;

use crate::domain::entity::{
    credential::Credential,
    imported_user::{ImportedUser, UpsertOutcome},
    user::User,
};
use crate::domain::repository::{CredentialRepository, ImportRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, stored_password::StoredPassword, user_id::UserId, user_name::UserName,
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// In-memory auth repository
#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    credentials: Arc<Mutex<HashMap<Uuid, Credential>>>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_users(&self) -> AuthResult<std::sync::MutexGuard<'_, HashMap<Uuid, User>>> {
        self.users
            .lock()
            .map_err(|_| AuthError::Internal("user store lock poisoned".to_string()))
    }

    fn lock_credentials(&self) -> AuthResult<std::sync::MutexGuard<'_, HashMap<Uuid, Credential>>> {
        self.credentials
            .lock()
            .map_err(|_| AuthError::Internal("credential store lock poisoned".to_string()))
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.lock_users()?;
        if users.contains_key(user.user_id.as_uuid()) {
            return Err(AuthError::AlreadyRegistered);
        }
        users.insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.lock_users()?.get(user_id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .lock_users()?
            .values()
            .find(|u| u.email.as_str() == email.as_str())
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        Ok(self
            .lock_users()?
            .values()
            .find(|u| u.username.canonical() == username)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self
            .lock_users()?
            .values()
            .any(|u| u.email.as_str() == email.as_str()))
    }

    async fn count(&self) -> AuthResult<u64> {
        Ok(self.lock_users()?.len() as u64)
    }

    async fn update_role(&self, user_id: &UserId, role: UserRole) -> AuthResult<()> {
        let mut users = self.lock_users()?;
        let user = users
            .get_mut(user_id.as_uuid())
            .ok_or(AuthError::UserNotFound)?;
        user.set_role(role);
        Ok(())
    }
}

impl CredentialRepository for MemoryAuthRepository {
    async fn create(&self, credential: &Credential) -> AuthResult<()> {
        self.lock_credentials()?
            .insert(*credential.user_id.as_uuid(), credential.clone());
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>> {
        Ok(self.lock_credentials()?.get(user_id.as_uuid()).cloned())
    }

    async fn migrate_credential(
        &self,
        user_id: &UserId,
        expected_legacy: &LegacyHash,
        new_hash: &HashedPassword,
    ) -> AuthResult<bool> {
        let mut credentials = self.lock_credentials()?;
        let Some(credential) = credentials.get_mut(user_id.as_uuid()) else {
            return Ok(false);
        };

        // Compare-and-swap under the store lock.
        if credential.legacy_hash.as_ref() != Some(expected_legacy) {
            return Ok(false);
        }

        credential.migrate(new_hash.clone());
        Ok(true)
    }
}

impl ImportRepository for MemoryAuthRepository {
    async fn upsert_imported(&self, record: &ImportedUser) -> AuthResult<UpsertOutcome> {
        let mut users = self.lock_users()?;
        let mut credentials = self.lock_credentials()?;
        let now = Utc::now();

        let existing = users
            .values()
            .find(|u| u.email.as_str() == record.email.as_str())
            .map(|u| *u.user_id.as_uuid());

        if let Some(user_id) = existing {
            let user = users
                .get_mut(&user_id)
                .ok_or(AuthError::Internal("user store out of sync".to_string()))?;
            user.set_name(record.name.clone());
            if let Some(role) = record.role {
                user.set_role(role);
            }
            if let Some(created_at) = record.created_at {
                user.created_at = created_at;
            }
            user.updated_at = now;

            let credential = credentials.entry(user_id).or_insert_with(|| {
                Credential::imported(UserId::from_uuid(user_id), record.legacy_hash.clone())
            });
            credential.password = StoredPassword::Unusable;
            credential.legacy_hash = record.legacy_hash.clone();
            credential.updated_at = now;

            Ok(UpsertOutcome::Updated)
        } else {
            let username = UserName::from_db(record.email.as_str(), record.email.as_str());
            let mut user = User::new(
                username,
                record.email.clone(),
                record.name.clone(),
                record.role.unwrap_or_default(),
            );
            if let Some(created_at) = record.created_at {
                user.created_at = created_at;
            }

            let credential = Credential::imported(user.user_id, record.legacy_hash.clone());

            credentials.insert(*user.user_id.as_uuid(), credential);
            users.insert(*user.user_id.as_uuid(), user);

            Ok(UpsertOutcome::Created)
        }
    }
}
