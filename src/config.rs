//! Worker configuration management.
//!
//! The cache version string and the core asset set are compiled-in
//! constants; a JSON config file can override the origin and asset list
//! for staging or local testing.
//!
//! Configuration is stored at `~/.config/galaxycache/config.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "galaxycache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Cache bucket version string.
/// Changing this string is the only supported way to invalidate previously
/// cached assets: install seeds into the bucket named here, and activate
/// deletes every bucket named anything else.
pub const CACHE_VERSION: &str = "teamgalaxy-core-v1";

/// Path of the offline fallback page within the core asset set.
pub const OFFLINE_PAGE: &str = "/offline.html";

/// Paths guaranteed cached after a successful install: the site root and
/// the offline fallback page. Adding paths here grows what install seeds
/// but has no effect on runtime caching behavior.
pub const CORE_ASSETS: [&str; 2] = ["/", OFFLINE_PAGE];

/// Origin the core asset paths resolve against.
const DEFAULT_ORIGIN: &str = "https://teamgalaxy.org";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub origin: String,
    pub cache_version: String,
    pub core_assets: Vec<String>,
    pub offline_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            cache_version: CACHE_VERSION.to_string(),
            core_assets: CORE_ASSETS.iter().map(|s| s.to_string()).collect(),
            offline_path: OFFLINE_PAGE.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Ok(serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory the disk store keeps its buckets under.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Resolve a core asset path against the configured origin.
    pub fn asset_url(&self, path: &str) -> Result<Url> {
        let origin = Url::parse(&self.origin)
            .with_context(|| format!("Invalid origin: {}", self.origin))?;
        origin
            .join(path)
            .with_context(|| format!("Invalid asset path: {}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_core_assets_include_offline_page() {
        let config = Config::default();
        assert_eq!(config.core_assets, vec!["/", "/offline.html"]);
        assert!(config.core_assets.contains(&config.offline_path));
        assert_eq!(config.cache_version, CACHE_VERSION);
    }

    #[test]
    fn test_asset_url_resolves_against_origin() {
        let config = Config {
            origin: "https://teamgalaxy.test".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.asset_url("/").unwrap().as_str(),
            "https://teamgalaxy.test/"
        );
        assert_eq!(
            config.asset_url("/offline.html").unwrap().as_str(),
            "https://teamgalaxy.test/offline.html"
        );
    }

    #[test]
    fn test_asset_url_rejects_bad_origin() {
        let config = Config {
            origin: "not a url".to_string(),
            ..Config::default()
        };
        assert!(config.asset_url("/").is_err());
    }
}
