//! Application configuration management.
//!
//! Loads and saves application-wide settings: the directory-name
//! exclusion set used while scanning, and an optional quarantine root
//! override. Stored as JSON at the platform-specific config directory.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use crate::scanner::default_excluded_dirs;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory names pruned during traversal.
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: BTreeSet<String>,

    /// Where quarantine folders are created. `None` means the platform
    /// default (desktop, falling back to home).
    #[serde(default)]
    pub quarantine_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_dirs: default_excluded_dirs(),
            quarantine_root: None,
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// Missing or unreadable config files fall back to defaults.
    #[must_use]
    pub fn load() -> Self {
        match Self::load_internal() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn load_internal() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save the configuration to the default platform-specific path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Merge CLI exclusions into the configured set.
    ///
    /// With `no_defaults` the configured set is ignored entirely and
    /// only the extra names apply.
    #[must_use]
    pub fn effective_excluded_dirs(&self, extra: &[String], no_defaults: bool) -> BTreeSet<String> {
        let mut set = if no_defaults {
            BTreeSet::new()
        } else {
            self.excluded_dirs.clone()
        };
        set.extend(extra.iter().cloned());
        set
    }

    fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("io", "dupsweep", "dupsweep")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_system_excludes() {
        let config = Config::default();
        assert!(config.excluded_dirs.contains("Windows"));
        assert!(config.quarantine_root.is_none());
    }

    #[test]
    fn test_effective_excludes_merges_extras() {
        let config = Config::default();
        let effective =
            config.effective_excluded_dirs(&["node_modules".to_string()], false);

        assert!(effective.contains("node_modules"));
        assert!(effective.contains("Windows"));
    }

    #[test]
    fn test_effective_excludes_without_defaults() {
        let config = Config::default();
        let effective = config.effective_excluded_dirs(&["target".to_string()], true);

        assert_eq!(effective.len(), 1);
        assert!(effective.contains("target"));
        assert!(!effective.contains("Windows"));
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let mut config = Config::default();
        config.quarantine_root = Some(PathBuf::from("/tmp/q"));
        config.excluded_dirs.insert("CacheFiles".to_string());

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.quarantine_root, config.quarantine_root);
        assert_eq!(parsed.excluded_dirs, config.excluded_dirs);
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let parsed: Config = serde_json::from_str("{}").unwrap();
        assert!(parsed.excluded_dirs.contains("$RECYCLE.BIN"));
    }
}
