//! Log In Use Case
//!
//! Resolves the identifier, verifies the password against the current
//! scheme with a legacy-scheme fallback, migrates the account on the
//! first successful legacy login, and issues a signed token pair.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::token::{TokenIssuer, TokenPair};
use crate::application::resolve::resolve_identifier;
use crate::domain::entity::{credential::Credential, user::User};
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Log in input
pub struct LogInInput {
    /// Email or username
    pub identifier: String,
    /// Plaintext password
    pub password: String,
}

/// Log in output
#[derive(Debug)]
pub struct LogInOutput {
    pub tokens: TokenPair,
    pub user: User,
}

/// Log in use case
pub struct LogInUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    config: Arc<AuthConfig>,
    issuer: TokenIssuer,
}

impl<U, C> LogInUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    pub fn new(user_repo: Arc<U>, credential_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        let issuer = TokenIssuer::new(&config);
        Self {
            user_repo,
            credential_repo,
            config,
            issuer,
        }
    }

    pub async fn execute(&self, input: LogInInput) -> AuthResult<LogInOutput> {
        // Resolution failure and every verification failure collapse
        // into the same response: no account-enumeration signal.
        let user = resolve_identifier(self.user_repo.as_ref(), &input.identifier)
            .await
            .map_err(|e| match e {
                AuthError::UserNotFound => AuthError::InvalidCredentials,
                other => other,
            })?;

        let credential = self
            .credential_repo
            .find_by_user_id(&user.user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = ClearTextPassword::new_unchecked(input.password);

        self.verify_chain(&user, &credential, &password).await?;

        let tokens = self.issuer.issue(&user)?;

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(LogInOutput { tokens, user })
    }

    /// Ordered verification: current scheme first, legacy fallback
    /// second. First definitive match wins; a legacy match triggers
    /// migration before returning.
    async fn verify_chain(
        &self,
        user: &User,
        credential: &Credential,
        password: &ClearTextPassword,
    ) -> AuthResult<()> {
        if credential.password.verify(password, self.config.pepper()) {
            return Ok(());
        }

        let Some(legacy) = &credential.legacy_hash else {
            return Err(AuthError::InvalidCredentials);
        };

        // A malformed digest or bcrypt error must look exactly like a
        // wrong password: surfacing it would leak stored-data state.
        let legacy_ok = legacy.verify(password).unwrap_or_else(|e| {
            tracing::warn!(user_id = %user.user_id, error = %e, "Legacy digest verification error");
            false
        });

        if !legacy_ok {
            return Err(AuthError::InvalidCredentials);
        }

        self.migrate(user, legacy, password).await
    }

    /// Replace the verified legacy digest with a current-scheme hash.
    ///
    /// The repository write is conditional on the legacy digest still
    /// holding the value just verified. Losing that race means another
    /// request already migrated the account; the login still succeeds
    /// because the password was correct either way.
    async fn migrate(
        &self,
        user: &User,
        legacy: &platform::legacy::LegacyHash,
        password: &ClearTextPassword,
    ) -> AuthResult<()> {
        let new_hash = password
            .hash(self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let migrated = self
            .credential_repo
            .migrate_credential(&user.user_id, legacy, &new_hash)
            .await?;

        if migrated {
            tracing::info!(user_id = %user.user_id, "Migrated legacy credential");
        } else {
            tracing::debug!(user_id = %user.user_id, "Legacy credential already migrated");
        }

        Ok(())
    }
}
