// API session handling
mod token_cache;

pub use token_cache::TokenCache;

use crate::api::ApiClient;
use crate::error::{FleetError, Result};
use crate::models::SessionToken;
use chrono::{Duration, Utc};

/// Lifetime of tokens issued by the backend
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// High-level authentication interface
pub struct AuthManager {
    token_cache: TokenCache,
}

impl AuthManager {
    pub fn new() -> Result<Self> {
        Ok(Self {
            token_cache: TokenCache::new()?,
        })
    }

    pub fn with_cache(token_cache: TokenCache) -> Self {
        Self { token_cache }
    }

    /// Get cached session if valid, None if expired or not found
    pub fn get_cached_token(&self, base_url: &str) -> Result<Option<SessionToken>> {
        self.token_cache.get_token(base_url)
    }

    /// Cached session or `NoSessionFound`
    pub fn require_token(&self, base_url: &str) -> Result<SessionToken> {
        self.get_cached_token(base_url)?
            .ok_or(FleetError::NoSessionFound)
    }

    /// Log in with email and password and cache the session
    pub async fn login(&self, client: &ApiClient, email: &str, password: &str) -> Result<SessionToken> {
        let response = client.login(email, password).await?;

        let session = SessionToken {
            token: response.token,
            base_url: client.base_url().to_string(),
            user: response.user,
            expires_at: Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS),
        };

        self.token_cache.save_token(&session)?;
        tracing::info!("Logged in to {} as {}", session.base_url, session.user.email);

        Ok(session)
    }

    /// Remove the cached session (logout). Returns whether one existed.
    pub fn logout(&self, base_url: &str) -> Result<bool> {
        let removed = self.token_cache.remove_token(base_url)?;
        if removed {
            tracing::info!("Removed session for {}", base_url);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_require_token_without_session() {
        let dir = TempDir::new().unwrap();
        let auth = AuthManager::with_cache(TokenCache::with_dir(dir.path()).unwrap());
        assert!(matches!(
            auth.require_token("http://localhost:8001"),
            Err(FleetError::NoSessionFound)
        ));
        assert!(!auth.logout("http://localhost:8001").unwrap());
    }
}
