//! Token Issuer
//!
//! Issues and verifies signed access/refresh token pairs (HS256).
//! Verification is stateless: signature, expiry, and claims only, no
//! directory lookup. Privileged operations that must not trust a
//! stale role claim re-resolve the user themselves.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

/// Whether a token is good for API access or only for refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims embedded in every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user ID
    pub sub: String,
    /// User email
    pub email: String,
    /// Display name (first + last, single space, trimmed)
    pub name: String,
    /// Authorization role
    pub role: UserRole,
    /// Access or refresh
    pub kind: TokenKind,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expiration (unix timestamp)
    pub exp: i64,
}

/// Access/refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    /// `None` on a refresh exchange when rotation is disabled
    pub refresh_token: Option<String>,
}

/// Token issuer and verifier
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    rotate_refresh: bool,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&config.token_secret),
            decoding_key: DecodingKey::from_secret(&config.token_secret),
            validation: Validation::default(),
            access_ttl_secs: config.access_ttl_secs(),
            refresh_ttl_secs: config.refresh_ttl_secs(),
            rotate_refresh: config.rotate_refresh_tokens,
        }
    }

    /// Issue a fresh access/refresh pair for an authenticated user
    pub fn issue(&self, user: &User) -> AuthResult<TokenPair> {
        let now = chrono::Utc::now().timestamp();

        let access = self.encode(Claims {
            sub: user.user_id.to_string(),
            email: user.email.as_str().to_string(),
            name: user.name.display(),
            role: user.role,
            kind: TokenKind::Access,
            iat: now,
            exp: now + self.access_ttl_secs,
        })?;

        let refresh = self.encode(Claims {
            sub: user.user_id.to_string(),
            email: user.email.as_str().to_string(),
            name: user.name.display(),
            role: user.role,
            kind: TokenKind::Refresh,
            iat: now,
            exp: now + self.refresh_ttl_secs,
        })?;

        Ok(TokenPair {
            access_token: access,
            refresh_token: Some(refresh),
        })
    }

    /// Verify a presented access token and extract its claims
    pub fn verify_access(&self, token: &str) -> AuthResult<Claims> {
        let claims = self.decode(token)?;
        if claims.kind != TokenKind::Access {
            return Err(AuthError::TokenInvalid);
        }
        Ok(claims)
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token itself is only rotated when configured;
    /// otherwise the caller keeps using the one it presented.
    pub fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = self.decode(refresh_token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(AuthError::TokenInvalid);
        }

        let now = chrono::Utc::now().timestamp();

        let access = self.encode(Claims {
            kind: TokenKind::Access,
            iat: now,
            exp: now + self.access_ttl_secs,
            ..claims.clone()
        })?;

        let refresh = if self.rotate_refresh {
            Some(self.encode(Claims {
                kind: TokenKind::Refresh,
                iat: now,
                exp: now + self.refresh_ttl_secs,
                ..claims
            })?)
        } else {
            None
        };

        Ok(TokenPair {
            access_token: access,
            refresh_token: refresh,
        })
    }

    fn encode(&self, claims: Claims) -> AuthResult<String> {
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Token encode failed: {}", e)))
    }

    fn decode(&self, token: &str) -> AuthResult<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::TokenInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        email::Email, person_name::PersonName, user_name::UserName,
    };
    use std::time::Duration;

    fn test_config() -> AuthConfig {
        AuthConfig {
            token_secret: b"test-token-secret".to_vec(),
            ..Default::default()
        }
    }

    fn sample_user() -> User {
        User::new(
            UserName::new("ada@example.com").unwrap(),
            Email::new("ada@example.com").unwrap(),
            PersonName::from_display_name("Ada Lovelace"),
            UserRole::Elevated,
        )
    }

    #[test]
    fn test_issue_and_verify_claims() {
        let issuer = TokenIssuer::new(&test_config());
        let user = sample_user();

        let pair = issuer.issue(&user).unwrap();
        let claims = issuer.verify_access(&pair.access_token).unwrap();

        assert_eq!(claims.sub, user.user_id.to_string());
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.name, "Ada Lovelace");
        assert_eq!(claims.role, UserRole::Elevated);
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let issuer = TokenIssuer::new(&test_config());
        let pair = issuer.issue(&sample_user()).unwrap();

        let result = issuer.verify_access(&pair.refresh_token.unwrap());
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn test_access_token_rejected_at_refresh() {
        let issuer = TokenIssuer::new(&test_config());
        let pair = issuer.issue(&sample_user()).unwrap();

        let result = issuer.refresh(&pair.access_token);
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn test_refresh_exchange_without_rotation() {
        let issuer = TokenIssuer::new(&test_config());
        let pair = issuer.issue(&sample_user()).unwrap();

        let exchanged = issuer.refresh(&pair.refresh_token.unwrap()).unwrap();
        assert!(exchanged.refresh_token.is_none());
        assert!(issuer.verify_access(&exchanged.access_token).is_ok());
    }

    #[test]
    fn test_refresh_exchange_with_rotation() {
        let config = AuthConfig {
            rotate_refresh_tokens: true,
            ..test_config()
        };
        let issuer = TokenIssuer::new(&config);
        let pair = issuer.issue(&sample_user()).unwrap();

        let exchanged = issuer.refresh(&pair.refresh_token.unwrap()).unwrap();
        let rotated = exchanged.refresh_token.expect("rotated refresh token");
        assert!(issuer.refresh(&rotated).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenIssuer::new(&test_config());
        let other = TokenIssuer::new(&AuthConfig {
            token_secret: b"another-secret".to_vec(),
            ..Default::default()
        });

        let pair = issuer.issue(&sample_user()).unwrap();
        assert!(matches!(
            other.verify_access(&pair.access_token),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Expired well past the default leeway
        let config = AuthConfig {
            access_token_ttl: Duration::from_secs(0),
            ..test_config()
        };
        let mut issuer = TokenIssuer::new(&config);
        issuer.access_ttl_secs = -120;

        let pair = issuer.issue(&sample_user()).unwrap();
        assert!(matches!(
            issuer.verify_access(&pair.access_token),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let issuer = TokenIssuer::new(&test_config());
        let pair = issuer.issue(&sample_user()).unwrap();

        let mut tampered = pair.access_token.clone();
        tampered.push('x');
        assert!(matches!(
            issuer.verify_access(&tampered),
            Err(AuthError::TokenInvalid)
        ));
    }
}
