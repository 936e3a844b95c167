use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::db::STORE_FILE_NAME;
use crate::db::query::DEFAULT_LIST_LIMIT;

/// Name of the per-project data directory.
pub const SHELF_DIR_NAME: &str = ".shelf";

/// Env var that points straight at a shelf data directory.
pub const SHELF_DIR_ENV: &str = "SHELF_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub list: ListConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store file name, relative to the shelf directory.
    #[serde(default = "default_store_file")]
    pub file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file: default_store_file(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_list_limit")]
    pub default_limit: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_limit: default_list_limit(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

impl ProjectConfig {
    /// Absolute path of the store file inside `shelf_dir`.
    #[must_use]
    pub fn store_path(&self, shelf_dir: &Path) -> PathBuf {
        shelf_dir.join(&self.store.file)
    }
}

/// Load `<shelf_dir>/config.toml`, falling back to defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(shelf_dir: &Path) -> Result<ProjectConfig> {
    let path = shelf_dir.join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load `<config_dir>/shelf/config.toml`, falling back to defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("shelf/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write a default `config.toml` into `shelf_dir` unless one already exists.
///
/// Returns `true` when a file was written.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_default_project_config(shelf_dir: &Path) -> Result<bool> {
    let path = shelf_dir.join("config.toml");
    if path.exists() {
        return Ok(false);
    }

    std::fs::create_dir_all(shelf_dir)
        .with_context(|| format!("Failed to create {}", shelf_dir.display()))?;
    let content = toml::to_string_pretty(&ProjectConfig::default())
        .context("Failed to serialize default config")?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

/// Walk up from `start` to the nearest directory holding `.shelf/`.
///
/// Returns the `.shelf/` directory itself.
#[must_use]
pub fn find_shelf_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(SHELF_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

/// Resolve the shelf directory: an explicit override wins, otherwise walk
/// up from `start`.
///
/// The override is taken as-is even when the directory does not exist yet,
/// so `shelf init` can create it.
#[must_use]
pub fn resolve_shelf_dir(start: &Path, env_override: Option<&str>) -> Option<PathBuf> {
    if let Some(raw) = env_override.map(str::trim).filter(|raw| !raw.is_empty()) {
        let path = PathBuf::from(raw);
        return Some(if path.is_absolute() {
            path
        } else {
            start.join(path)
        });
    }
    find_shelf_dir(start)
}

/// Map an output-mode name to its canonical form.
///
/// Accepts `pretty`, `text`, `json` plus the aliases `human` and `table`.
#[must_use]
pub fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "table" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

fn default_store_file() -> String {
    STORE_FILE_NAME.to_string()
}

const fn default_list_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}
