//! Person Name Value Object
//!
//! First/last name pair stored on the profile. Display names arriving
//! as a single string (registration `name` field, import rows) are
//! split on the first whitespace run; the token `name` claim joins the
//! parts back with a single space.

use serde::{Deserialize, Serialize};
use std::fmt;

/// First/last name pair, either part possibly empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub first: String,
    pub last: String,
}

impl PersonName {
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }

    /// Split a display name on the first whitespace run.
    ///
    /// `"Ada Lovelace King"` becomes `("Ada", "Lovelace King")`;
    /// a single word becomes the first name with an empty last name.
    pub fn from_display_name(name: &str) -> Self {
        let trimmed = name.trim();
        match trimmed.split_once(char::is_whitespace) {
            Some((first, rest)) => Self::new(first, rest.trim_start()),
            None => Self::new(trimmed, ""),
        }
    }

    /// Join non-empty parts with a single space, trimmed.
    ///
    /// This is the value embedded in the token `name` claim.
    pub fn display(&self) -> String {
        format!("{} {}", self.first, self.last).trim().to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.last.is_empty()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
