//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenIssuer;
use crate::application::{
    AssignRoleInput, AssignRoleUseCase, LogInInput, LogInUseCase, RegisterInput, RegisterUseCase,
    RoleTarget,
};
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AssignRoleRequest, AssignRoleResponse, LoginRequest, LoginResponse, RefreshRequest,
    RefreshResponse, RegisterRequest, RegisterResponse, UserDto,
};
use crate::presentation::middleware::authenticate;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub issuer: TokenIssuer,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        let issuer = TokenIssuer::new(&config);
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            issuer,
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    R: UserRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        RegisterUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = RegisterInput {
        name: req.name,
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserDto::from(&output.user),
        }),
    ))
}

// ============================================================================
// Log In
// ============================================================================

/// POST /api/auth/login
pub async fn log_in<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: UserRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    let use_case = LogInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = LogInInput {
        identifier: req.identifier,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(LoginResponse {
        access_token: output.tokens.access_token,
        refresh_token: output.tokens.refresh_token,
        user: UserDto::from(&output.user),
    }))
}

// ============================================================================
// Token Refresh
// ============================================================================

/// POST /api/auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<RefreshResponse>>
where
    R: UserRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    let pair = state.issuer.refresh(&req.refresh_token)?;

    Ok(Json(RefreshResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<UserDto>>
where
    R: UserRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    let claims = authenticate(&state.issuer, &headers)?;
    let user_id = parse_subject(&claims.sub)?;

    // Fresh profile, not the token snapshot.
    let user = state
        .repo
        .find_by_id(&user_id)
        .await?
        .ok_or(AuthError::TokenInvalid)?;

    Ok(Json(UserDto::from(&user)))
}

// ============================================================================
// Role Assignment
// ============================================================================

/// POST /api/auth/role
pub async fn assign_role<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<AssignRoleRequest>,
) -> AuthResult<Json<AssignRoleResponse>>
where
    R: UserRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    let claims = authenticate(&state.issuer, &headers)?;
    let actor_id = parse_subject(&claims.sub)?;

    let target = match (req.user_id, req.email) {
        (Some(id), None) => RoleTarget::Id(id),
        (None, Some(email)) => RoleTarget::Email(email),
        _ => {
            return Err(AuthError::Validation(
                "exactly one of userId or email must be given".to_string(),
            ));
        }
    };

    let use_case = AssignRoleUseCase::new(state.repo.clone());

    let user = use_case
        .execute(AssignRoleInput {
            actor_id: *actor_id.as_uuid(),
            target,
            role: req.role,
        })
        .await?;

    Ok(Json(AssignRoleResponse {
        user: UserDto::from(&user),
    }))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_subject(sub: &str) -> AuthResult<UserId> {
    sub.parse::<uuid::Uuid>()
        .map(UserId::from_uuid)
        .map_err(|_| AuthError::TokenInvalid)
}
