//! Register Use Case
//!
//! Creates a new user account. The email doubles as the username; the
//! very first account in an empty directory is granted the elevated
//! role.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::{credential::Credential, user::User};
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, person_name::PersonName, stored_password::StoredPassword, user_name::UserName,
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    /// Optional display name, split on the first whitespace run
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub user: User,
}

/// Register use case
pub struct RegisterUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<U, C> RegisterUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    pub fn new(user_repo: Arc<U>, credential_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email = Email::new(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;

        // Unlike login, registration may reveal that an email exists.
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::AlreadyRegistered);
        }

        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        let stored = StoredPassword::from_clear_text(&password, self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let username =
            UserName::new(email.as_str()).map_err(|e| AuthError::Validation(e.to_string()))?;
        let name = PersonName::from_display_name(input.name.as_deref().unwrap_or(""));

        // The first account ever created administers the rest.
        let role = if self.user_repo.count().await? == 0 {
            UserRole::Elevated
        } else {
            UserRole::Standard
        };

        let user = User::new(username, email, name, role);
        let credential = Credential::from_password(user.user_id, stored);

        self.user_repo.create(&user).await?;
        self.credential_repo.create(&credential).await?;

        tracing::info!(
            user_id = %user.user_id,
            role = %user.role,
            "User registered"
        );

        Ok(RegisterOutput { user })
    }
}
