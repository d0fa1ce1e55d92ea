use serde::{Deserialize, Serialize};
use std::fmt;

/// User role
///
/// Two-level model: `Standard` for everyone, `Elevated` for the
/// privileged role permitted to change other users' roles. The legacy
/// system called these `user` and `super`, which `from_import_code`
/// still understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    Standard = 0,
    Elevated = 1,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::Standard => "standard",
            UserRole::Elevated => "elevated",
        }
    }

    #[inline]
    pub const fn is_elevated(&self) -> bool {
        matches!(self, UserRole::Elevated)
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        match id {
            0 => UserRole::Standard,
            1 => UserRole::Elevated,
            _ => {
                tracing::error!("Invalid UserRole id: {}", id);
                unreachable!("Invalid UserRole id: {}", id)
            }
        }
    }

    /// Parse an API role code. Unknown codes are rejected.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "standard" => Some(UserRole::Standard),
            "elevated" => Some(UserRole::Elevated),
            _ => None,
        }
    }

    /// Parse a role value from a legacy import row.
    ///
    /// Empty means "keep whatever the record already has" and is
    /// returned as `None`; unknown non-empty values fall back to
    /// `Standard` rather than aborting the row.
    pub fn from_import_code(code: &str) -> Option<Self> {
        match code.trim() {
            "" => None,
            "super" | "elevated" => Some(UserRole::Elevated),
            "user" | "standard" => Some(UserRole::Standard),
            other => {
                tracing::warn!(role = %other, "Unknown imported role, defaulting to standard");
                Some(UserRole::Standard)
            }
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_id() {
        assert_eq!(UserRole::from_id(0), UserRole::Standard);
        assert_eq!(UserRole::from_id(1), UserRole::Elevated);
    }

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("standard"), Some(UserRole::Standard));
        assert_eq!(UserRole::from_code("elevated"), Some(UserRole::Elevated));
        assert_eq!(UserRole::from_code("super"), None);
        assert_eq!(UserRole::from_code(""), None);
    }

    #[test]
    fn test_user_role_from_import_code() {
        assert_eq!(UserRole::from_import_code("super"), Some(UserRole::Elevated));
        assert_eq!(UserRole::from_import_code("user"), Some(UserRole::Standard));
        assert_eq!(UserRole::from_import_code(""), None);
        assert_eq!(UserRole::from_import_code("  "), None);
        // Unknown values degrade to standard instead of failing the row
        assert_eq!(
            UserRole::from_import_code("manager"),
            Some(UserRole::Standard)
        );
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Standard.to_string(), "standard");
        assert_eq!(UserRole::Elevated.to_string(), "elevated");
    }

    #[test]
    fn test_is_elevated() {
        assert!(!UserRole::Standard.is_elevated());
        assert!(UserRole::Elevated.is_elevated());
    }
}
