//! `shelf search`: find works by title, creator or tag.
//!
//! Matching is a case-insensitive substring test over the most recently
//! updated page of works (the configured list limit).

use crate::cmd::open_shelf;
use crate::output::{OutputMode, render_list};
use clap::Args;
use shelf_core::catalog::WorkFilter;
use shelf_core::library;
use std::path::Path;

#[derive(Args, Debug)]
#[command(
    after_help = "EXAMPLES:\n    # Everything by an author\n    shelf search herbert\n\n\
                  # Tag match, first five hits\n    shelf search sci-fi -n 5"
)]
pub struct SearchArgs {
    /// Text to look for in titles, creators and tags.
    pub query: String,

    /// Maximum number of results to return.
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

/// Execute `shelf search <query>`.
///
/// # Errors
///
/// Returns an error if the shelf cannot be opened or the list query fails.
pub fn run_search(args: &SearchArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let shelf = open_shelf(project_root)?;
    let candidates = shelf
        .catalog
        .list(&WorkFilter::default(), Some(shelf.config.list.default_limit))?;
    let scanned = candidates.len();

    let mut hits = library::search(candidates, &args.query);
    hits.truncate(args.limit);
    tracing::debug!(query = %args.query, scanned, hits = hits.len(), "search");

    if hits.is_empty() && output == OutputMode::Pretty {
        println!("No works match '{}'.", args.query);
        return Ok(());
    }
    render_list(&hits, output)?;
    Ok(())
}
