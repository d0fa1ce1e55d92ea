//! End-to-end use case tests against the in-memory repository.

use std::sync::Arc;

use crate::application::{
    AssignRoleInput, AssignRoleUseCase, AuthConfig, ImportRow, ImportUsersUseCase, LogInInput,
    LogInUseCase, RegisterInput, RegisterUseCase, RoleTarget,
};
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_role::UserRole};
use crate::error::AuthError;
use crate::infra::memory::MemoryAuthRepository;

fn test_config() -> Arc<AuthConfig> {
    Arc::new(AuthConfig {
        token_secret: b"test-token-secret".to_vec(),
        ..Default::default()
    })
}

fn login_use_case(
    repo: &Arc<MemoryAuthRepository>,
    config: &Arc<AuthConfig>,
) -> LogInUseCase<MemoryAuthRepository, MemoryAuthRepository> {
    LogInUseCase::new(repo.clone(), repo.clone(), config.clone())
}

fn register_use_case(
    repo: &Arc<MemoryAuthRepository>,
    config: &Arc<AuthConfig>,
) -> RegisterUseCase<MemoryAuthRepository, MemoryAuthRepository> {
    RegisterUseCase::new(repo.clone(), repo.clone(), config.clone())
}

async fn register(
    repo: &Arc<MemoryAuthRepository>,
    config: &Arc<AuthConfig>,
    email: &str,
    password: &str,
) -> crate::domain::entity::user::User {
    register_use_case(repo, config)
        .execute(RegisterInput {
            name: None,
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
        .unwrap()
        .user
}

fn legacy_row(id: &str, name: &str, email: &str, password: &str, role: &str) -> ImportRow {
    ImportRow {
        external_id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        password_digest: bcrypt::hash(password, 4).unwrap(),
        created_at: "2021-03-04 05:06:07".to_string(),
        role: role.to_string(),
    }
}

async fn import_one(repo: &Arc<MemoryAuthRepository>, row: ImportRow) {
    let summary = ImportUsersUseCase::new(repo.clone())
        .execute(vec![row], false)
        .await
        .unwrap();
    assert_eq!(summary.created, 1);
}

// ============================================================================
// Login and migration
// ============================================================================

#[tokio::test]
async fn test_legacy_login_migrates_once() {
    let repo = Arc::new(MemoryAuthRepository::new());
    let config = test_config();

    import_one(&repo, legacy_row("1", "QA Tester", "qa@login.test", "pass123", "user")).await;

    let user = repo
        .find_by_email(&Email::new("qa@login.test").unwrap())
        .await
        .unwrap()
        .unwrap();
    let before = repo.find_by_user_id(&user.user_id).await.unwrap().unwrap();
    assert!(!before.password.is_usable());
    assert!(before.has_legacy());

    // First login verifies the legacy digest and migrates.
    let output = login_use_case(&repo, &config)
        .execute(LogInInput {
            identifier: "qa@login.test".to_string(),
            password: "pass123".to_string(),
        })
        .await
        .unwrap();
    assert!(!output.tokens.access_token.is_empty());

    let after = repo.find_by_user_id(&user.user_id).await.unwrap().unwrap();
    assert!(after.password.is_usable());
    assert!(!after.has_legacy());

    // Second login succeeds via the current scheme alone.
    login_use_case(&repo, &config)
        .execute(LogInInput {
            identifier: "qa@login.test".to_string(),
            password: "pass123".to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_look_identical() {
    let repo = Arc::new(MemoryAuthRepository::new());
    let config = test_config();

    register(&repo, &config, "ada@example.com", "MySecret123!").await;

    let wrong = login_use_case(&repo, &config)
        .execute(LogInInput {
            identifier: "ada@example.com".to_string(),
            password: "not-the-password".to_string(),
        })
        .await
        .unwrap_err();
    let unknown = login_use_case(&repo, &config)
        .execute(LogInInput {
            identifier: "nobody@example.com".to_string(),
            password: "whatever".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(wrong, AuthError::InvalidCredentials));
    assert!(matches!(unknown, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_is_case_insensitive_on_email() {
    let repo = Arc::new(MemoryAuthRepository::new());
    let config = test_config();

    register(&repo, &config, "Ada@Example.COM", "MySecret123!").await;

    let output = login_use_case(&repo, &config)
        .execute(LogInInput {
            identifier: "ADA@example.com".to_string(),
            password: "MySecret123!".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(output.user.email.as_str(), "ada@example.com");
}

#[tokio::test]
async fn test_malformed_legacy_digest_is_invalid_credentials() {
    let repo = Arc::new(MemoryAuthRepository::new());
    let config = test_config();

    let mut row = legacy_row("7", "Broken Row", "broken@example.com", "unused", "user");
    row.password_digest = "not-a-bcrypt-digest".to_string();
    import_one(&repo, row).await;

    let err = login_use_case(&repo, &config)
        .execute(LogInInput {
            identifier: "broken@example.com".to_string(),
            password: "unused".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_lost_migration_race_is_noop() {
    let repo = Arc::new(MemoryAuthRepository::new());
    let config = test_config();

    import_one(&repo, legacy_row("3", "Racer", "race@example.com", "pass123", "user")).await;

    let user = repo
        .find_by_email(&Email::new("race@example.com").unwrap())
        .await
        .unwrap()
        .unwrap();
    let credential = repo.find_by_user_id(&user.user_id).await.unwrap().unwrap();
    let legacy = credential.legacy_hash.clone().unwrap();

    let password = platform::password::ClearTextPassword::new_unchecked("pass123".to_string());
    let hash_a = password.hash(None).unwrap();
    let hash_b = password.hash(None).unwrap();

    let first = repo
        .migrate_credential(&user.user_id, &legacy, &hash_a)
        .await
        .unwrap();
    let second = repo
        .migrate_credential(&user.user_id, &legacy, &hash_b)
        .await
        .unwrap();

    assert!(first);
    assert!(!second);

    // The winner's hash stays in place.
    let after = repo.find_by_user_id(&user.user_id).await.unwrap().unwrap();
    assert!(after.password.verify(&password, None));

    // A login after both attempts still succeeds.
    login_use_case(&repo, &config)
        .execute(LogInInput {
            identifier: "race@example.com".to_string(),
            password: "pass123".to_string(),
        })
        .await
        .unwrap();
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_first_registered_user_is_elevated() {
    let repo = Arc::new(MemoryAuthRepository::new());
    let config = test_config();

    let first = register(&repo, &config, "first@example.com", "MySecret123!").await;
    let second = register(&repo, &config, "second@example.com", "MySecret123!").await;

    assert_eq!(first.role, UserRole::Elevated);
    assert_eq!(second.role, UserRole::Standard);
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let repo = Arc::new(MemoryAuthRepository::new());
    let config = test_config();

    let original = register(&repo, &config, "dup@example.com", "MySecret123!").await;

    let err = register_use_case(&repo, &config)
        .execute(RegisterInput {
            name: Some("Second Try".to_string()),
            // Same address, different casing.
            email: "DUP@example.com".to_string(),
            password: "OtherSecret456!".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::AlreadyRegistered));

    // The first record is untouched.
    let kept = repo
        .find_by_email(&Email::new("dup@example.com").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.user_id, original.user_id);
    assert_eq!(kept.name.first, "");
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_short_password_rejected() {
    let repo = Arc::new(MemoryAuthRepository::new());
    let config = test_config();

    let err = register_use_case(&repo, &config)
        .execute(RegisterInput {
            name: None,
            email: "short@example.com".to_string(),
            password: "short".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
}

// ============================================================================
// Import
// ============================================================================

#[tokio::test]
async fn test_import_is_idempotent() {
    let repo = Arc::new(MemoryAuthRepository::new());
    let rows = vec![
        legacy_row("1", "Ada Lovelace", "ada@example.com", "pass123", "super"),
        legacy_row("2", "Grace Hopper", "grace@example.com", "pass456", "user"),
    ];

    let use_case = ImportUsersUseCase::new(repo.clone());

    let first = use_case.execute(rows.clone(), false).await.unwrap();
    assert_eq!(first.created, 2);
    assert_eq!(first.updated, 0);

    let second = use_case.execute(rows, false).await.unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 2);
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_import_skips_rows_without_email() {
    let repo = Arc::new(MemoryAuthRepository::new());

    let mut bad = legacy_row("9", "No Email", "", "pass123", "user");
    bad.email = "  ".to_string();
    let rows = vec![
        bad,
        legacy_row("10", "Kept Row", "kept@example.com", "pass123", "user"),
    ];

    let summary = ImportUsersUseCase::new(repo.clone())
        .execute(rows, false)
        .await
        .unwrap();
    assert_eq!(summary.created, 1);
    assert_eq!(summary.skipped, 1);
}

#[tokio::test]
async fn test_import_maps_roles_and_splits_names() {
    let repo = Arc::new(MemoryAuthRepository::new());

    import_one(
        &repo,
        legacy_row("4", "Ada Lovelace", "ada@example.com", "pass123", "super"),
    )
    .await;

    let user = repo
        .find_by_email(&Email::new("ada@example.com").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.role, UserRole::Elevated);
    assert_eq!(user.name.first, "Ada");
    assert_eq!(user.name.last, "Lovelace");
    assert_eq!(user.username.canonical(), "ada@example.com");
}

#[tokio::test]
async fn test_reimport_without_role_keeps_existing_role() {
    let repo = Arc::new(MemoryAuthRepository::new());

    import_one(
        &repo,
        legacy_row("5", "Ada Lovelace", "ada@example.com", "pass123", "super"),
    )
    .await;

    let summary = ImportUsersUseCase::new(repo.clone())
        .execute(
            vec![legacy_row("5", "Ada Lovelace", "ada@example.com", "pass123", "")],
            false,
        )
        .await
        .unwrap();
    assert_eq!(summary.updated, 1);

    let user = repo
        .find_by_email(&Email::new("ada@example.com").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.role, UserRole::Elevated);
}

#[tokio::test]
async fn test_reimport_resets_migrated_credential() {
    let repo = Arc::new(MemoryAuthRepository::new());
    let config = test_config();

    import_one(&repo, legacy_row("6", "Re Import", "re@example.com", "pass123", "user")).await;

    // Migrate via a successful login.
    login_use_case(&repo, &config)
        .execute(LogInInput {
            identifier: "re@example.com".to_string(),
            password: "pass123".to_string(),
        })
        .await
        .unwrap();

    // A fresh import run puts the account back on the legacy path.
    ImportUsersUseCase::new(repo.clone())
        .execute(
            vec![legacy_row("6", "Re Import", "re@example.com", "newpass9", "user")],
            false,
        )
        .await
        .unwrap();

    let user = repo
        .find_by_email(&Email::new("re@example.com").unwrap())
        .await
        .unwrap()
        .unwrap();
    let credential = repo.find_by_user_id(&user.user_id).await.unwrap().unwrap();
    assert!(!credential.password.is_usable());
    assert!(credential.has_legacy());

    login_use_case(&repo, &config)
        .execute(LogInInput {
            identifier: "re@example.com".to_string(),
            password: "newpass9".to_string(),
        })
        .await
        .unwrap();
}

// ============================================================================
// Role assignment
// ============================================================================

#[tokio::test]
async fn test_standard_actor_cannot_assign_roles() {
    let repo = Arc::new(MemoryAuthRepository::new());
    let config = test_config();

    let admin = register(&repo, &config, "admin@example.com", "MySecret123!").await;
    let member = register(&repo, &config, "member@example.com", "MySecret123!").await;
    assert_eq!(admin.role, UserRole::Elevated);
    assert_eq!(member.role, UserRole::Standard);

    let use_case = AssignRoleUseCase::new(repo.clone());

    let err = use_case
        .execute(AssignRoleInput {
            actor_id: *member.user_id.as_uuid(),
            target: RoleTarget::Email("admin@example.com".to_string()),
            role: UserRole::Standard,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Forbidden));

    let promoted = use_case
        .execute(AssignRoleInput {
            actor_id: *admin.user_id.as_uuid(),
            target: RoleTarget::Email("member@example.com".to_string()),
            role: UserRole::Elevated,
        })
        .await
        .unwrap();
    assert_eq!(promoted.role, UserRole::Elevated);
}

#[tokio::test]
async fn test_assign_role_to_unknown_target_is_not_found() {
    let repo = Arc::new(MemoryAuthRepository::new());
    let config = test_config();

    let admin = register(&repo, &config, "admin@example.com", "MySecret123!").await;

    let err = AssignRoleUseCase::new(repo.clone())
        .execute(AssignRoleInput {
            actor_id: *admin.user_id.as_uuid(),
            target: RoleTarget::Email("ghost@example.com".to_string()),
            role: UserRole::Elevated,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound));
}
