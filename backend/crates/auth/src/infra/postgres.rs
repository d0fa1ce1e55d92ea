//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use platform::legacy::LegacyHash;
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    credential::Credential,
    imported_user::{ImportedUser, UpsertOutcome},
    user::User,
};
use crate::domain::repository::{CredentialRepository, ImportRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, person_name::PersonName, stored_password::StoredPassword, user_id::UserId,
    user_name::UserName, user_role::UserRole,
};
use crate::error::AuthResult;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    username: String,
    username_canonical: String,
    email: String,
    first_name: String,
    last_name: String,
    user_role: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from_uuid(self.user_id),
            username: UserName::from_db(self.username, self.username_canonical),
            email: Email::from_db(self.email),
            name: PersonName::new(self.first_name, self.last_name),
            role: UserRole::from_id(self.user_role),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    user_id: Uuid,
    password: String,
    legacy_password: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> Credential {
        Credential {
            user_id: UserId::from_uuid(self.user_id),
            password: StoredPassword::from_db(&self.password),
            legacy_hash: self.legacy_password.map(LegacyHash::new),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const SELECT_USER: &str = r#"
    SELECT
        user_id,
        username,
        username_canonical,
        email,
        first_name,
        last_name,
        user_role,
        created_at,
        updated_at
    FROM users
"#;

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                username,
                username_canonical,
                email,
                first_name,
                last_name,
                user_role,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.username.original())
        .bind(user.username.canonical())
        .bind(user.email.as_str())
        .bind(&user.name.first)
        .bind(&user.name.last)
        .bind(user.role.id())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE user_id = $1"))
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        // Email is lowercased at construction and stored lowercased,
        // so equality here is a case-insensitive match.
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        let row =
            sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE username_canonical = $1"))
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn count(&self) -> AuthResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn update_role(&self, user_id: &UserId, role: UserRole) -> AuthResult<()> {
        sqlx::query("UPDATE users SET user_role = $2, updated_at = $3 WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .bind(role.id())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgAuthRepository {
    async fn create(&self, credential: &Credential) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_credentials (
                user_id,
                password,
                legacy_password,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(credential.user_id.as_uuid())
        .bind(credential.password.to_db())
        .bind(credential.legacy_hash.as_ref().map(|h| h.as_str()))
        .bind(credential.created_at)
        .bind(credential.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                user_id,
                password,
                legacy_password,
                created_at,
                updated_at
            FROM user_credentials
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CredentialRow::into_credential))
    }

    async fn migrate_credential(
        &self,
        user_id: &UserId,
        expected_legacy: &LegacyHash,
        new_hash: &HashedPassword,
    ) -> AuthResult<bool> {
        // Single conditional write: the WHERE clause on the prior
        // legacy value is the compare-and-swap that makes concurrent
        // migrations of one account race-safe. At most one UPDATE
        // matches; the loser sees zero rows affected.
        let affected = sqlx::query(
            r#"
            UPDATE user_credentials
            SET password = $3,
                legacy_password = NULL,
                updated_at = $4
            WHERE user_id = $1
              AND legacy_password = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(expected_legacy.as_str())
        .bind(new_hash.as_phc_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }
}

// ============================================================================
// Import Repository Implementation
// ============================================================================

impl ImportRepository for PgAuthRepository {
    async fn upsert_imported(&self, record: &ImportedUser) -> AuthResult<UpsertOutcome> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let existing: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM users WHERE email = $1 FOR UPDATE")
                .bind(record.email.as_str())
                .fetch_optional(&mut *tx)
                .await?;

        let outcome = if let Some(user_id) = existing {
            // Role only moves when the import row carried one.
            sqlx::query(
                r#"
                UPDATE users
                SET first_name = $2,
                    last_name = $3,
                    user_role = COALESCE($4, user_role),
                    created_at = COALESCE($5, created_at),
                    updated_at = $6
                WHERE user_id = $1
                "#,
            )
            .bind(user_id)
            .bind(&record.name.first)
            .bind(&record.name.last)
            .bind(record.role.map(|r| r.id()))
            .bind(record.created_at)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                UPDATE user_credentials
                SET password = $2,
                    legacy_password = $3,
                    updated_at = $4
                WHERE user_id = $1
                "#,
            )
            .bind(user_id)
            .bind(StoredPassword::Unusable.to_db())
            .bind(record.legacy_hash.as_ref().map(|h| h.as_str()))
            .bind(now)
            .execute(&mut *tx)
            .await?;

            UpsertOutcome::Updated
        } else {
            let user_id = Uuid::new_v4();
            let created_at = record.created_at.unwrap_or(now);

            // Username for imported accounts is the lowercased email.
            sqlx::query(
                r#"
                INSERT INTO users (
                    user_id,
                    username,
                    username_canonical,
                    email,
                    first_name,
                    last_name,
                    user_role,
                    created_at,
                    updated_at
                ) VALUES ($1, $2, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(user_id)
            .bind(record.email.as_str())
            .bind(record.email.as_str())
            .bind(&record.name.first)
            .bind(&record.name.last)
            .bind(record.role.unwrap_or_default().id())
            .bind(created_at)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO user_credentials (
                    user_id,
                    password,
                    legacy_password,
                    created_at,
                    updated_at
                ) VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(user_id)
            .bind(StoredPassword::Unusable.to_db())
            .bind(record.legacy_hash.as_ref().map(|h| h.as_str()))
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            UpsertOutcome::Created
        };

        tx.commit().await?;

        Ok(outcome)
    }
}
