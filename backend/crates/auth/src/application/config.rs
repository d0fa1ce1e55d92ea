//! Application Configuration
//!
//! Configuration for the Auth application layer. Constructed once at
//! startup and passed into use cases; nothing here is read from
//! ambient global state.

use std::time::Duration;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for token signing (HS256)
    pub token_secret: Vec<u8>,
    /// Access token lifetime (default 60 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime (default 7 days)
    pub refresh_token_ttl: Duration,
    /// Whether a refresh exchange also rotates the refresh token
    pub rotate_refresh_tokens: bool,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(60 * 60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
            rotate_refresh_tokens: false,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Access token TTL in seconds
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_token_ttl.as_secs() as i64
    }

    /// Refresh token TTL in seconds
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_token_ttl.as_secs() as i64
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
