//! Identity Resolution
//!
//! Maps a login identifier (email or username) to a canonical user
//! record. Email lookup runs first, then username; both are
//! case-insensitive. No side effects.

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Resolve an identifier to a user, or `UserNotFound`.
///
/// Login callers collapse the `UserNotFound` into a generic
/// invalid-credentials response so the identifier's existence never
/// leaks; role assignment surfaces it as a real 404.
pub async fn resolve_identifier<U>(repo: &U, identifier: &str) -> AuthResult<User>
where
    U: UserRepository,
{
    // Email first. An identifier that does not parse as an email
    // cannot match the email column, so skip straight to username.
    if let Ok(email) = Email::new(identifier) {
        if let Some(user) = repo.find_by_email(&email).await? {
            return Ok(user);
        }
    }

    let canonical = identifier.trim().to_lowercase();
    repo.find_by_username(&canonical)
        .await?
        .ok_or(AuthError::UserNotFound)
}
