//! Catalog configuration loading from config.toml
//!
//! The file names the media root used for product photos and lists the categories
//! that are seeded into the database on first run or when they are missing.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "CATALOG_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Media storage settings
    #[serde(default)]
    pub media: MediaConfig,
    /// Categories to seed
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

/// Where uploaded files are written and how they are served
#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    /// Media root directory
    #[serde(default = "default_media_root")]
    pub root: PathBuf,
    /// URL prefix the media root is served under
    #[serde(default = "default_media_url")]
    pub url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            url: default_media_url(),
        }
    }
}

fn default_media_root() -> PathBuf {
    PathBuf::from("media")
}

fn default_media_url() -> String {
    "/media/".to_string()
}

/// Configuration for a single seeded category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Display name of the category
    pub category_name: String,
    /// URL-safe identifier
    pub slug: String,
    /// Optional description
    #[serde(default)]
    pub description: String,
}

/// Loads catalog configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    tracing::debug!("Loading catalog configuration from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

/// Loads configuration from `$CATALOG_CONFIG`, falling back to `./config.toml`.
///
/// A missing default file is not an error: built-in defaults are used instead.
///
/// # Errors
/// Returns an error if `$CATALOG_CONFIG` is not valid UTF-8, or the chosen file cannot
/// be read or parsed.
pub fn load_default_config() -> Result<Config> {
    if let Some(path) = super::optional_env(CONFIG_PATH_ENV)? {
        return load_config(path);
    }

    let default_path = Path::new("config.toml");
    if default_path.exists() {
        load_config(default_path)
    } else {
        tracing::warn!("No config.toml found, using built-in defaults");
        Ok(Config::default())
    }
}
