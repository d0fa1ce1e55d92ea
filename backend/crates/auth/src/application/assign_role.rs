//! Assign Role Use Case
//!
//! Elevated-role actors may change another user's role. The actor is
//! re-resolved from the directory instead of trusting the role claim
//! in their token, so a stale claim cannot authorize the change.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Target selector: by ID or by email
pub enum RoleTarget {
    Id(Uuid),
    Email(String),
}

/// Assign role input
pub struct AssignRoleInput {
    /// User ID of the caller (from their verified access token)
    pub actor_id: Uuid,
    pub target: RoleTarget,
    pub role: UserRole,
}

/// Assign role use case
pub struct AssignRoleUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> AssignRoleUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, input: AssignRoleInput) -> AuthResult<User> {
        let actor_id = UserId::from_uuid(input.actor_id);
        let actor = self
            .user_repo
            .find_by_id(&actor_id)
            .await?
            .ok_or(AuthError::Forbidden)?;

        if !actor.is_elevated() {
            return Err(AuthError::Forbidden);
        }

        let mut target = match input.target {
            RoleTarget::Id(id) => self
                .user_repo
                .find_by_id(&UserId::from_uuid(id))
                .await?
                .ok_or(AuthError::UserNotFound)?,
            RoleTarget::Email(email) => {
                let email =
                    Email::new(&email).map_err(|e| AuthError::Validation(e.to_string()))?;
                self.user_repo
                    .find_by_email(&email)
                    .await?
                    .ok_or(AuthError::UserNotFound)?
            }
        };

        self.user_repo
            .update_role(&target.user_id, input.role)
            .await?;
        target.set_role(input.role);

        tracing::info!(
            actor_id = %actor.user_id,
            target_id = %target.user_id,
            role = %input.role,
            "Role assigned"
        );

        Ok(target)
    }
}
