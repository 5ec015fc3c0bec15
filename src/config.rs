use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StampError};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "bundlestamp.toml";

/// Represents the complete configuration for bundle-stamp.
///
/// Every field has a default, so an absent or partial file still yields
/// the standard koku-metrics-operator layout.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub operator: OperatorConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

fn default_operator_name() -> String {
    "koku-metrics-operator".to_string()
}

fn default_publisher() -> String {
    "Red Hat".to_string()
}

fn default_bundle_root() -> PathBuf {
    PathBuf::from("koku-metrics-operator")
}

fn default_description() -> PathBuf {
    PathBuf::from("docs/csv-description.md")
}

/// Identity of the operator being released.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OperatorConfig {
    /// Used in the `replaces:` reference and the related-images entry.
    #[serde(default = "default_operator_name")]
    pub name: String,

    /// Provider name line the `replaces:` reference is appended after.
    #[serde(default = "default_publisher")]
    pub publisher: String,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        OperatorConfig {
            name: default_operator_name(),
            publisher: default_publisher(),
        }
    }
}

/// Where release files live, relative to the working directory.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PathsConfig {
    /// Directory holding one sub-directory per released version.
    #[serde(default = "default_bundle_root")]
    pub bundle_root: PathBuf,

    /// Markdown file embedded as the CSV description.
    #[serde(default = "default_description")]
    pub description: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            bundle_root: default_bundle_root(),
            description: default_description(),
        }
    }
}

impl Config {
    /// `<bundle_root>/<version>`
    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.paths.bundle_root.join(version)
    }

    /// `<bundle_root>/<version>/manifests/<operator>.clusterserviceversion.yaml`
    pub fn manifest_path(&self, version: &str) -> PathBuf {
        self.version_dir(version)
            .join("manifests")
            .join(format!("{}.clusterserviceversion.yaml", self.operator.name))
    }

    /// `<bundle_root>/<version>/Dockerfile`
    pub fn dockerfile_path(&self, version: &str) -> PathBuf {
        self.version_dir(version).join("Dockerfile")
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `bundlestamp.toml` in current directory
/// 3. `.bundlestamp.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        PathBuf::from(CONFIG_FILE_NAME)
    } else if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if path.exists() {
            path
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| StampError::from_io(e, &path))?;
    toml::from_str(&config_str)
        .map_err(|e| StampError::config(format!("{}: {}", path.display(), e)))
}

/// Parses configuration from TOML text.
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| StampError::config(e.to_string()))
}
