//! Configuration management for the storefront

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub cdn: CdnConfig,
}

/// API root for the product and order endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

/// Asset CDN base; product image paths are resolved against it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdnConfig {
    pub base_url: String,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:3000/api/shop".to_string(),
            },
            cdn: CdnConfig {
                base_url: "http://localhost:3000/content".to_string(),
            },
        }
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("STOREFRONT_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("storefront").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_has_both_urls() {
        let config = Config::default_config();
        assert!(config.api.base_url.starts_with("http://"));
        assert!(config.cdn.base_url.starts_with("http://"));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://localhost:3000/api\"\n\n[cdn]\nbase_url = \"http://localhost:3000/content\""
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3000/api");
        assert_eq!(config.cdn.base_url, "http://localhost:3000/content");
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let path = PathBuf::from("/nonexistent/storefront/config.toml");
        assert!(Config::load_from_path(&path).is_err());
    }

    #[test]
    fn test_load_from_malformed_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid toml [[[").unwrap();
        assert!(Config::load_from_path(&path).is_err());
    }
}
