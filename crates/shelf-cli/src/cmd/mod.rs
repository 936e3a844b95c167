pub mod add;
pub mod completions;
pub mod dashboard;
pub mod init;
pub mod list;
pub mod remove;
pub mod search;
pub mod show;
pub mod update;

use crate::output::CliError;
use shelf_core::catalog::Catalog;
use shelf_core::config::{self, ProjectConfig, SHELF_DIR_ENV};
use shelf_core::error::{self, CatalogError, ErrorCode};
use shelf_core::model::{WorkStatus, WorkType};
use std::path::{Path, PathBuf};

/// An opened shelf: its project config and catalog handle.
pub struct Shelf {
    pub config: ProjectConfig,
    pub catalog: Catalog,
}

/// Parse a `--type` value, accepting any case plus `film` and `show`.
///
/// # Errors
///
/// Returns `InvalidArgument` for anything that is not a known type.
pub fn parse_work_type(raw: &str) -> Result<WorkType, CatalogError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "film" => Ok(WorkType::Movie),
        "show" => Ok(WorkType::Series),
        other => other.parse(),
    }
}

/// Parse a `--status` value, accepting any case plus `in_progress` and
/// `inprogress`.
///
/// # Errors
///
/// Returns `InvalidArgument` for anything that is not a known status.
pub fn parse_work_status(raw: &str) -> Result<WorkStatus, CatalogError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "in_progress" | "inprogress" => Ok(WorkStatus::InProgress),
        other => other.parse(),
    }
}

/// Locate the shelf directory for `project_root`, honoring `SHELF_DIR`.
pub fn shelf_dir_for(project_root: &Path) -> Option<PathBuf> {
    let env_override = std::env::var(SHELF_DIR_ENV).ok();
    config::resolve_shelf_dir(project_root, env_override.as_deref())
}

/// Open the shelf that `project_root` belongs to.
///
/// # Errors
///
/// Returns a [`CliError`] with `NotInitialized` when there is no shelf,
/// `ConfigParseError` for a broken config file, and the classified SQLite
/// code (`StoreBusy`, `CorruptStore`, ...) when the store cannot be opened.
pub fn open_shelf(project_root: &Path) -> anyhow::Result<Shelf> {
    let not_initialized = || {
        CliError::coded(
            format!("no shelf found from {}", project_root.display()),
            ErrorCode::NotInitialized,
        )
    };

    let dir = shelf_dir_for(project_root)
        .filter(|dir| dir.is_dir())
        .ok_or_else(not_initialized)?;

    let config = config::load_project_config(&dir)
        .map_err(|e| CliError::coded(format!("{e:#}"), ErrorCode::ConfigParseError))?;

    let store_path = config.store_path(&dir);
    if !store_path.exists() {
        return Err(not_initialized().into());
    }

    let catalog = Catalog::open(&store_path)
        .map_err(|e| CliError::coded(format!("{e:#}"), open_failure_code(&e)))?;
    tracing::debug!(shelf_dir = %dir.display(), "opened shelf");

    Ok(Shelf { config, catalog })
}

/// Anything that is not a recognizable SQLite failure means the file is
/// not a usable store.
fn open_failure_code(err: &anyhow::Error) -> ErrorCode {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<rusqlite::Error>())
        .map_or(ErrorCode::CorruptStore, |e| match error::storage_code(e) {
            ErrorCode::InternalUnexpected => ErrorCode::CorruptStore,
            code => code,
        })
}
