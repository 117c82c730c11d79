use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};

/// File name looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "standalone.toml";

/// File name looked up in the user config directory
pub const USER_CONFIG_FILE: &str = "standalone-release.toml";

/// Represents the complete configuration for standalone-release.
///
/// Holds endpoints and build settings only. Credentials never live here;
/// they are taken from the environment by the binary.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub build: BuildConfig,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_registry_base() -> String {
    "https://pypi.org/pypi".to_string()
}

fn default_python() -> String {
    "python3".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build/artifacts")
}

/// Release listing endpoint settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GithubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Page size used when walking the release listing
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_base: default_api_base(),
            per_page: default_per_page(),
        }
    }
}

/// Package registry endpoint settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_base")]
    pub base_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            base_url: default_registry_base(),
        }
    }
}

/// Packaging settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BuildConfig {
    /// Interpreter used to create the build virtual environment
    #[serde(default = "default_python")]
    pub python: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            python: default_python(),
            output_dir: default_output_dir(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `standalone.toml` in current directory
/// 3. `standalone-release.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed, or an explicit path is missing
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(),
    };

    match path {
        Some(path) => parse_config_file(&path),
        None => Ok(Config::default()),
    }
}

fn discover_config() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG_FILE))
        .filter(|path| path.exists())
}

fn parse_config_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    toml::from_str(&contents)
        .map_err(|e| ReleaseError::config(format!("cannot parse {}: {}", path.display(), e)))
}
