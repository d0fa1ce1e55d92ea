//! Request Authentication Helpers
//!
//! Bearer token extraction and verification for handlers that require
//! an authenticated caller. Verification is stateless; handlers that
//! must not trust a stale role claim re-resolve the user.

use axum::http::{HeaderMap, header};

use crate::application::token::{Claims, TokenIssuer};
use crate::error::{AuthError, AuthResult};

/// Extract the bearer token from the `Authorization` header
pub fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::TokenInvalid)?
        .to_str()
        .map_err(|_| AuthError::TokenInvalid)?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or(AuthError::TokenInvalid)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::TokenInvalid);
    }

    Ok(token)
}

/// Verify the request's access token and return its claims
pub fn authenticate(issuer: &TokenIssuer, headers: &HeaderMap) -> AuthResult<Claims> {
    issuer.verify_access(bearer_token(headers)?)
}
