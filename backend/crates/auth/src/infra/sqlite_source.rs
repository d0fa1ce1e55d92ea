//! Legacy SQLite Source
//!
//! Reads the legacy application's SQLite database for bulk import.
//! Columns are tolerated as NULL and normalized downstream; this layer
//! only hands raw rows to the import use case.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::Row;

use crate::application::import_users::ImportRow;
use crate::error::{AuthError, AuthResult};

/// Read all rows from the legacy `users` table.
///
/// A missing or unreadable file is `SourceUnavailable`: the batch
/// never starts on a broken source.
pub async fn read_legacy_users(path: &Path) -> AuthResult<Vec<ImportRow>> {
    if !path.is_file() {
        return Err(AuthError::SourceUnavailable(format!(
            "legacy database not found: {}",
            path.display()
        )));
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
        .map_err(|e| AuthError::SourceUnavailable(e.to_string()))?
        .read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| AuthError::SourceUnavailable(e.to_string()))?;

    let rows = sqlx::query("SELECT id, name, email, password, createdAt, role FROM users")
        .fetch_all(&pool)
        .await
        .map_err(|e| AuthError::SourceUnavailable(e.to_string()))?;

    pool.close().await;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let external_id: Option<i64> = row
            .try_get("id")
            .map_err(|e| AuthError::SourceUnavailable(e.to_string()))?;

        out.push(ImportRow {
            external_id: external_id.map(|id| id.to_string()).unwrap_or_default(),
            name: column_text(&row, "name")?,
            email: column_text(&row, "email")?,
            password_digest: column_text(&row, "password")?,
            created_at: column_text(&row, "createdAt")?,
            role: column_text(&row, "role")?,
        });
    }

    tracing::info!(rows = out.len(), source = %path.display(), "Read legacy user rows");

    Ok(out)
}

fn column_text(row: &sqlx::sqlite::SqliteRow, column: &str) -> AuthResult<String> {
    let value: Option<String> = row
        .try_get(column)
        .map_err(|e| AuthError::SourceUnavailable(e.to_string()))?;
    Ok(value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_source_unavailable() {
        let err = read_legacy_users(Path::new("/nonexistent/users.db"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SourceUnavailable(_)));
    }
}
