//! Imported User Record
//!
//! A normalized legacy row ready to be upserted into the directory.
//! Produced by the import use case after per-row validation; consumed
//! by `ImportRepository::upsert_imported`.

use chrono::{DateTime, Utc};
use platform::legacy::LegacyHash;

use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_role::UserRole,
};

/// One legacy account, normalized for upsert (keyed by email)
#[derive(Debug, Clone)]
pub struct ImportedUser {
    /// Lowercased email, the upsert key
    pub email: Email,
    /// First/last split of the legacy display name
    pub name: PersonName,
    /// `None` means keep the existing role on update (empty role in
    /// the source row)
    pub role: Option<UserRole>,
    /// Legacy digest verbatim; `None` when the source row had none
    pub legacy_hash: Option<LegacyHash>,
    /// Overrides the store-assigned creation time when the source
    /// timestamp parsed
    pub created_at: Option<DateTime<Utc>>,
}

/// Outcome of a single upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}
