use crate::error::{FleetError, Result};
use crate::models::SessionToken;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

/// Session cache, one JSON file per API base URL.
/// Stores tokens in the user cache dir under fleetwatch/sessions/
pub struct TokenCache {
    cache_dir: PathBuf,
}

impl TokenCache {
    pub fn new() -> Result<Self> {
        let cache_dir = dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
            .ok_or_else(|| {
                FleetError::CacheError("Could not determine cache directory".to_string())
            })?
            .join("fleetwatch")
            .join("sessions");

        Self::with_dir(cache_dir)
    }

    pub fn with_dir(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir)?;
        }
        Ok(Self { cache_dir })
    }

    fn cache_key(&self, base_url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(base_url.trim_end_matches('/').as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn cache_file_path(&self, base_url: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.json", self.cache_key(base_url)))
    }

    /// Get cached session for an API, None if missing or expired
    pub fn get_token(&self, base_url: &str) -> Result<Option<SessionToken>> {
        let cache_file = self.cache_file_path(base_url);

        if !cache_file.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&cache_file)
            .map_err(|e| FleetError::CacheError(format!("Failed to read cache file: {}", e)))?;

        let token: SessionToken = serde_json::from_str(&contents)?;

        if token.is_expired() {
            tracing::debug!("Cached session for {} has expired", base_url);
            return Ok(None);
        }

        Ok(Some(token))
    }

    pub fn save_token(&self, token: &SessionToken) -> Result<()> {
        let cache_file = self.cache_file_path(&token.base_url);

        let json = serde_json::to_string_pretty(token)?;

        fs::write(&cache_file, json)
            .map_err(|e| FleetError::CacheError(format!("Failed to write cache file: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&cache_file, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Remove a session (logout). Returns whether one existed.
    pub fn remove_token(&self, base_url: &str) -> Result<bool> {
        let cache_file = self.cache_file_path(base_url);

        if !cache_file.exists() {
            return Ok(false);
        }

        fs::remove_file(&cache_file)
            .map_err(|e| FleetError::CacheError(format!("Failed to remove cache file: {}", e)))?;
        Ok(true)
    }
}
