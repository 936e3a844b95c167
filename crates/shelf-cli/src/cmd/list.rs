//! `shelf list`: list works, most recently updated first.

use crate::cmd::{open_shelf, parse_work_status, parse_work_type};
use crate::output::{OutputMode, Renderable, render_list, stars};
use clap::Args;
use shelf_core::catalog::WorkFilter;
use shelf_core::library::{SortDirection, SortKey, sort_works};
use shelf_core::model::{Work, WorkStatus, WorkType};
use std::io::{self, Write};
use std::path::Path;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by status: backlog, in-progress, finished, dropped.
    #[arg(short, long, value_parser = parse_work_status)]
    pub status: Option<WorkStatus>,

    /// Filter by type: book, movie, series, anime, manga. Ignored with --status.
    #[arg(short = 't', long = "type", value_parser = parse_work_type)]
    pub work_type: Option<WorkType>,

    /// Maximum works to return (default from config, normally 200).
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    /// Re-sort the page: title, type, status, rating, updated.
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Sort ascending instead of descending (with --sort).
    #[arg(long, requires = "sort")]
    pub asc: bool,
}

impl ListArgs {
    pub const fn filter(&self) -> WorkFilter {
        WorkFilter {
            status: self.status,
            work_type: self.work_type,
        }
    }

    pub const fn direction(&self) -> SortDirection {
        if self.asc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

impl Renderable for Work {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let creator = self
            .creator
            .as_deref()
            .map(|c| format!(" by {c}"))
            .unwrap_or_default();
        writeln!(
            w,
            "{:<13} {:<7} {:<12} {:<5}  {}{creator}",
            self.id,
            self.work_type,
            self.status,
            stars(self.rating),
            self.title
        )
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(&mut *w, self).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let rating = self.rating.map(|r| r.to_string()).unwrap_or_default();
        let progress = self.progress.map(|p| p.to_string()).unwrap_or_default();
        writeln!(
            w,
            "{}\t{}\t{}\t{rating}\t{progress}\t{}",
            self.id, self.work_type, self.status, self.title
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["ID", "TYPE", "STATUS", "RATING", "PROGRESS", "TITLE"]
    }
}

/// Execute `shelf list`.
///
/// # Errors
///
/// Returns an error if the shelf cannot be opened or the query fails.
pub fn run_list(args: &ListArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let shelf = open_shelf(project_root)?;
    let filter = args.filter();
    if filter.type_is_shadowed() {
        tracing::warn!("--type is ignored when --status is given");
    }

    let limit = args.limit.unwrap_or(shelf.config.list.default_limit);
    let mut works = shelf.catalog.list(&filter, Some(limit))?;
    if let Some(key) = args.sort {
        sort_works(&mut works, key, args.direction());
    }

    if works.is_empty() && output == OutputMode::Pretty {
        println!("No works found.");
        return Ok(());
    }
    render_list(&works, output)?;
    Ok(())
}
