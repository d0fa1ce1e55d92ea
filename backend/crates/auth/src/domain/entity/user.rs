//! User Entity
//!
//! Core user profile entity. Credential material lives in the
//! separate Credential entity so directory queries never touch it.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_id::UserId, user_name::UserName,
    user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Login handle; equals the email for self-registered and
    /// imported users
    pub username: UserName,
    /// Unique, case-insensitively
    pub email: Email,
    /// First/last name pair
    pub name: PersonName,
    /// Role (Standard, Elevated)
    pub role: UserRole,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(username: UserName, email: Email, name: PersonName, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            username,
            email,
            name,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update user role
    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    /// Update name fields
    pub fn set_name(&mut self, name: PersonName) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// Whether this user may perform privileged operations
    pub fn is_elevated(&self) -> bool {
        self.role.is_elevated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            UserName::new("ada@example.com").unwrap(),
            Email::new("ada@example.com").unwrap(),
            PersonName::from_display_name("Ada Lovelace"),
            UserRole::Standard,
        )
    }

    #[test]
    fn test_set_role_bumps_updated_at() {
        let mut user = sample_user();
        let before = user.updated_at;
        user.set_role(UserRole::Elevated);
        assert!(user.is_elevated());
        assert!(user.updated_at >= before);
    }
}
