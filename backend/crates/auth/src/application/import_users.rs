//! Import Users Use Case
//!
//! Offline batch seeding legacy accounts into the user directory.
//! Rows are normalized and upserted by lowercased email; per-row
//! failures are recorded and skipped, never fatal to the batch.
//! Re-running with identical input only increments the updated count.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::legacy::LegacyHash;

use crate::domain::entity::imported_user::{ImportedUser, UpsertOutcome};
use crate::domain::repository::ImportRepository;
use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_role::UserRole,
};
use crate::error::AuthResult;

/// One raw row from the legacy credential source
#[derive(Debug, Clone)]
pub struct ImportRow {
    /// Identifier in the legacy system, used only for reporting
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub created_at: String,
    pub role: String,
}

/// Batch result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
}

/// Import users use case
pub struct ImportUsersUseCase<R>
where
    R: ImportRepository,
{
    repo: Arc<R>,
}

impl<R> ImportUsersUseCase<R>
where
    R: ImportRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Run the batch.
    ///
    /// `force_reset` is accepted for interface compatibility with the
    /// legacy tooling but does not branch: the current hash is set
    /// unusable and the legacy digest retained either way.
    pub async fn execute(&self, rows: Vec<ImportRow>, force_reset: bool) -> AuthResult<ImportSummary> {
        if force_reset {
            tracing::warn!(
                "--force-reset has no effect: imported accounts always get an unusable \
                 current hash and keep their legacy digest"
            );
        }

        let total = rows.len();
        tracing::info!(total, "Starting user import");

        let mut summary = ImportSummary::default();

        for row in rows {
            match self.normalize(&row) {
                Some(record) => match self.repo.upsert_imported(&record).await {
                    Ok(UpsertOutcome::Created) => summary.created += 1,
                    Ok(UpsertOutcome::Updated) => summary.updated += 1,
                    Err(e) => {
                        summary.skipped += 1;
                        tracing::warn!(
                            external_id = %row.external_id,
                            error = %e,
                            "Skipping row: upsert failed"
                        );
                    }
                },
                None => summary.skipped += 1,
            }
        }

        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            "Import complete"
        );
        tracing::warn!(
            "Imported accounts cannot authenticate via the current scheme until their \
             first successful legacy login migrates them"
        );

        Ok(summary)
    }

    /// Normalize one row, or `None` when it must be skipped
    fn normalize(&self, row: &ImportRow) -> Option<ImportedUser> {
        if row.email.trim().is_empty() {
            tracing::warn!(external_id = %row.external_id, "Skipping row: missing email");
            return None;
        }

        let email = match Email::new(&row.email) {
            Ok(email) => email,
            Err(e) => {
                tracing::warn!(
                    external_id = %row.external_id,
                    error = %e,
                    "Skipping row: invalid email"
                );
                return None;
            }
        };

        let legacy_hash = if row.password_digest.is_empty() {
            None
        } else {
            // Verbatim: corrupt digests are stored as-is and fail at
            // verification time, matching the generic login error.
            Some(LegacyHash::new(row.password_digest.clone()))
        };

        let created_at = parse_timestamp(&row.created_at);
        if created_at.is_none() && !row.created_at.trim().is_empty() {
            tracing::debug!(
                external_id = %row.external_id,
                value = %row.created_at,
                "Unparseable creation timestamp, keeping store default"
            );
        }

        Some(ImportedUser {
            email,
            name: PersonName::from_display_name(&row.name),
            role: UserRole::from_import_code(&row.role),
            legacy_hash,
            created_at,
        })
    }
}

/// Parse a legacy timestamp, RFC 3339 or `YYYY-MM-DD HH:MM:SS`
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let parsed = parse_timestamp("2021-03-04T05:06:07Z").unwrap();
        assert_eq!(parsed.timestamp(), 1614834367);
    }

    #[test]
    fn test_parse_timestamp_sql_format() {
        assert!(parse_timestamp("2021-03-04 05:06:07").is_some());
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
