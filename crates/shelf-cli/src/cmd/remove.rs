//! `shelf remove`: delete a work permanently.
//!
//! Removing an id that is not on the shelf is not an error; the report says
//! `removed: false`.

use crate::cmd::open_shelf;
use crate::output::{OutputMode, render};
use clap::Args;
use serde::Serialize;
use shelf_core::model::WorkId;
use std::path::Path;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Work ID to remove.
    pub id: String,
}

#[derive(Debug, Serialize)]
struct RemoveReport {
    id: WorkId,
    removed: bool,
}

/// Execute `shelf remove <id>`.
///
/// # Errors
///
/// Returns an error if the shelf cannot be opened or the delete fails.
pub fn run_remove(args: &RemoveArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut shelf = open_shelf(project_root)?;
    let id = WorkId::from_raw(args.id.as_str());
    let removed = shelf.catalog.remove(&id)?;

    render(output, &RemoveReport { id, removed }, |r, w| match output {
        OutputMode::Text => writeln!(w, "{}\t{}", r.id, r.removed),
        _ if r.removed => writeln!(w, "Removed {}", r.id),
        _ => writeln!(w, "Nothing to remove: {} is not on the shelf", r.id),
    })
}
