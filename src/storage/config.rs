//! Configuration handling for prioritize
//!
//! Configuration is read from `~/.config/prioritize/config.toml` (global)
//! and `prioritize.toml` in the working directory (local). Command-line
//! flags override both.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::store::StoreOptions;

/// Name of the per-directory configuration file
pub const LOCAL_CONFIG_FILE: &str = "prioritize.toml";

/// Data file used when nothing else is configured
pub const DEFAULT_DATA_FILE: &str = "prioritize.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Per-directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Data file, relative to the directory holding the config
    pub file: PathBuf,

    /// Skip dependency edges that already exist
    pub dedup_edges: Option<bool>,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_DATA_FILE),
            dedup_edges: None,
        }
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Default for directories whose local config does not set it
    pub dedup_edges: Option<bool>,
}

/// Combined configuration (global + local)
#[derive(Debug, Clone)]
pub struct Config {
    pub local: LocalConfig,
    pub global: GlobalConfig,
    pub root: PathBuf,
}

impl Config {
    /// Loads configuration for the current directory
    pub fn load() -> Result<Self> {
        let root = std::env::current_dir().context("Failed to determine working directory")?;
        Self::for_dir(&root)
    }

    /// Loads configuration for a specific directory
    pub fn for_dir(root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let local = Self::load_local(root)?;

        Ok(Self {
            local,
            global,
            root: root.to_path_buf(),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "prioritize", "prioritize")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads the configuration file of a directory
    fn load_local(root: &Path) -> Result<LocalConfig> {
        let config_path = root.join(LOCAL_CONFIG_FILE);

        if !config_path.exists() {
            return Ok(LocalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read local config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse local config")
    }

    /// Returns the absolute path of the data file
    pub fn data_path(&self) -> PathBuf {
        self.root.join(&self.local.file)
    }

    /// Overrides the data file (e.g. from `--file`)
    pub fn set_data_file(&mut self, file: impl Into<PathBuf>) {
        self.local.file = file.into();
    }

    /// Store options, with local settings taking precedence over global ones
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            dedup_edges: self
                .local
                .dedup_edges
                .or(self.global.dedup_edges)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config {
            local: LocalConfig::default(),
            global: GlobalConfig::default(),
            root: PathBuf::from("/work"),
        };

        assert_eq!(config.data_path(), PathBuf::from("/work/prioritize.json"));
        assert_eq!(config.global.default_format, OutputFormat::Text);
        assert!(!config.store_options().dedup_edges);
    }

    #[test]
    fn parse_local_config() {
        let toml = r#"
file = "plans/work.json"
dedup_edges = true
"#;

        let config: LocalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.file, PathBuf::from("plans/work.json"));
        assert_eq!(config.dedup_edges, Some(true));
    }

    #[test]
    fn parse_global_config() {
        let toml = r#"
default_format = "json"
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
        assert_eq!(config.dedup_edges, None);
    }

    #[test]
    fn global_setting_applies_without_local_one() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LOCAL_CONFIG_FILE), "file = \"data.json\"\n").unwrap();

        let config = Config {
            local: Config::load_local(dir.path()).unwrap(),
            global: GlobalConfig {
                dedup_edges: Some(true),
                ..GlobalConfig::default()
            },
            root: dir.path().to_path_buf(),
        };

        assert_eq!(config.data_path(), dir.path().join("data.json"));
        assert!(config.store_options().dedup_edges);
    }

    #[test]
    fn local_setting_beats_global() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LOCAL_CONFIG_FILE), "dedup_edges = false\n").unwrap();

        let config = Config {
            local: Config::load_local(dir.path()).unwrap(),
            global: GlobalConfig {
                dedup_edges: Some(true),
                ..GlobalConfig::default()
            },
            root: dir.path().to_path_buf(),
        };

        assert!(!config.store_options().dedup_edges);
        assert_eq!(config.local.file, PathBuf::from(DEFAULT_DATA_FILE));
    }

    #[test]
    fn malformed_local_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LOCAL_CONFIG_FILE), "file = [").unwrap();

        assert!(Config::load_local(dir.path()).is_err());
    }

    #[test]
    fn absolute_data_file_wins_over_root() {
        let mut config = Config {
            local: LocalConfig::default(),
            global: GlobalConfig::default(),
            root: PathBuf::from("/work"),
        };
        config.set_data_file("/elsewhere/data.json");

        assert_eq!(config.data_path(), PathBuf::from("/elsewhere/data.json"));
    }
}
