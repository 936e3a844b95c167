//! `shelf init`: create the `.shelf/` directory, config and store.

use crate::cmd::shelf_dir_for;
use crate::output::{OutputMode, pretty_kv, render_mode};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use shelf_core::catalog::Catalog;
use shelf_core::config::{self, SHELF_DIR_NAME};
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {}

#[derive(Debug, Serialize)]
struct InitReport {
    shelf_dir: String,
    store: String,
    created_config: bool,
    created_store: bool,
}

/// Execute `shelf init`. Creates the project skeleton:
///
/// ```text
/// .shelf/
///   config.toml      (default project config)
///   shelf.sqlite3    (migrated store)
/// ```
///
/// Re-running on an existing shelf leaves config and data untouched.
///
/// # Errors
///
/// Returns an error if any filesystem or store operation fails.
pub fn run_init(_args: &InitArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let shelf_dir = shelf_dir_for(project_root).unwrap_or_else(|| project_root.join(SHELF_DIR_NAME));

    let created_config = config::write_default_project_config(&shelf_dir)?;
    let project_config = config::load_project_config(&shelf_dir)?;
    let store_path = project_config.store_path(&shelf_dir);
    let created_store = !store_path.exists();

    drop(
        Catalog::open(&store_path)
            .with_context(|| format!("initialize store {}", store_path.display()))?,
    );
    tracing::info!(shelf_dir = %shelf_dir.display(), created_store, "initialized shelf");

    let report = InitReport {
        shelf_dir: shelf_dir.display().to_string(),
        store: store_path.display().to_string(),
        created_config,
        created_store,
    };

    render_mode(
        output,
        &report,
        |r, w| writeln!(w, "{}\t{}", r.shelf_dir, r.created_store),
        |r, w| {
            if r.created_store {
                writeln!(w, "Initialized shelf in {}", r.shelf_dir)?;
            } else {
                writeln!(w, "Shelf already initialized in {}", r.shelf_dir)?;
            }
            pretty_kv(w, "Store", &r.store)
        },
    )
}
