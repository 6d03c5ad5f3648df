// Configuration management
use crate::error::{FleetError, Result};
use crate::expiry::DEFAULT_WINDOW_DAYS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    /// Root of the fleet backend, without the `/api` suffix
    pub base_url: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

fn default_window_days() -> i64 {
    DEFAULT_WINDOW_DAYS
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Default output format for report commands (text, json)
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    ///
    /// Priority:
    /// 1. XDG_CONFIG_HOME/fleetwatch (if env var is set)
    /// 2. ~/.config/fleetwatch (if ~/.config exists)
    /// 3. ~/.fleetwatch (fallback on Unix, doesn't create ~/.config)
    /// 4. Platform default on Windows
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config).join("fleetwatch"));
        }

        #[cfg(unix)]
        {
            if let Some(home_dir) = dirs::home_dir() {
                let xdg_config = home_dir.join(".config");

                if xdg_config.exists() {
                    return Ok(xdg_config.join("fleetwatch"));
                }

                return Ok(home_dir.join(".fleetwatch"));
            }
        }

        #[cfg(not(unix))]
        {
            if let Some(config_dir) = dirs::config_dir() {
                return Ok(config_dir.join("fleetwatch"));
            }
        }

        Err(FleetError::ConfigError(
            "Could not determine config directory".to_string(),
        ))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, environment variables, and defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        let mut config = Self::load_from_path(&config_path)?;

        if let Ok(base_url) = std::env::var("FLEETWATCH_API_URL") {
            tracing::debug!("Using FLEETWATCH_API_URL from environment: {}", base_url);
            config.api.base_url = Some(base_url);
        }

        if let Ok(email) = std::env::var("FLEETWATCH_EMAIL") {
            tracing::debug!("Using FLEETWATCH_EMAIL from environment");
            config.api.email = Some(email);
        }

        Ok(config)
    }

    /// Read a config file, falling back to defaults when it does not exist
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Config::default());
        }

        tracing::debug!("Loading config from: {}", config_path.display());
        let contents = fs::read_to_string(config_path)
            .map_err(|e| FleetError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.thresholds.window_days < 0 {
            return Err(FleetError::ConfigError(format!(
                "thresholds.window_days must not be negative (got {})",
                self.thresholds.window_days
            )));
        }
        Ok(())
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| FleetError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string)
            .map_err(|e| FleetError::ConfigError(format!("Failed to write config file: {}", e)))
    }

    /// Create a sample config file with comments
    pub fn create_sample() -> Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).map_err(|e| {
                FleetError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config_path = Self::config_file_path()?;
        Self::write_sample(&config_path)?;
        Ok(config_path)
    }

    /// Write the commented sample, refusing to overwrite an existing file
    pub fn write_sample(config_path: &Path) -> Result<()> {
        if config_path.exists() {
            return Err(FleetError::ConfigError(format!(
                "Config file already exists at: {}",
                config_path.display()
            )));
        }

        fs::write(config_path, SAMPLE_CONFIG)
            .map_err(|e| FleetError::ConfigError(format!("Failed to write sample config: {}", e)))
    }

    /// Get the API base URL, returning an error if it is not configured
    pub fn api_base_url(&self) -> Result<&str> {
        self.api
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                FleetError::ConfigError(
                    "API base_url not configured. Set it in config file, FLEETWATCH_API_URL, or pass --api-url".to_string(),
                )
            })
    }
}

const SAMPLE_CONFIG: &str = r#"# fleetwatch configuration
# Location priority:
#   1. $XDG_CONFIG_HOME/fleetwatch/config.toml (if XDG_CONFIG_HOME is set)
#   2. ~/.config/fleetwatch/config.toml (if ~/.config exists)
#   3. ~/.fleetwatch/config.toml (fallback)
#
# Environment variables override the file:
#   FLEETWATCH_API_URL
#   FLEETWATCH_EMAIL

[api]
# Root URL of the fleet backend (the /api prefix is added automatically)
# Example: base_url = "https://filo.itfaiye.example.gov.tr"
base_url = ""

# Account used by 'fleetwatch login' when --email is not given
email = ""

[thresholds]
# Days ahead in which an expiry or oil change counts as due (default: 30)
window_days = 30

[display]
# Default output format for reports: text or json
format = "text"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.thresholds.window_days, 30);
        assert_eq!(config.display.format, "text");
        assert!(config.api_base_url().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(&dir.path().join("config.toml")).unwrap();
        assert!(config.api.base_url.is_none());
        assert_eq!(config.thresholds.window_days, DEFAULT_WINDOW_DAYS);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nbase_url = \"http://localhost:8001\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.api_base_url().unwrap(), "http://localhost:8001");
        assert_eq!(config.thresholds.window_days, 30);
    }

    #[test]
    fn test_sample_parses_and_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        Config::write_sample(&path).unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.thresholds.window_days, 30);
        // blank base_url in the sample is not a usable URL
        assert!(config.api_base_url().is_err());

        assert!(Config::write_sample(&path).is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.api.base_url = Some("https://filo.example".to_string());
        config.thresholds.window_days = 45;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.api.base_url.as_deref(), Some("https://filo.example"));
        assert_eq!(loaded.thresholds.window_days, 45);
    }

    #[test]
    fn test_negative_window_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[thresholds]\nwindow_days = -1\n").unwrap();
        assert!(matches!(
            Config::load_from_path(&path),
            Err(FleetError::ConfigError(_))
        ));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(matches!(
            Config::load_from_path(&path),
            Err(FleetError::Toml(_))
        ));

        fs::write(&path, "[thresholds]\nwindow_days = \"thirty\"\n").unwrap();
        let err = Config::load_from_path(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }
}
