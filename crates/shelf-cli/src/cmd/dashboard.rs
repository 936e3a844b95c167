//! `shelf dashboard`: what you are on, what is next, what is done.

use crate::cmd::open_shelf;
use crate::output::{OutputMode, Renderable, pretty_kv, pretty_section, render_mode};
use clap::Args;
use serde::Serialize;
use shelf_core::catalog::WorkFilter;
use shelf_core::library::{self, Dashboard, Stats};
use shelf_core::model::{WorkStatus, WorkType};
use std::io::{self, Write};
use std::path::Path;

#[derive(Args, Debug, Default)]
pub struct DashboardArgs {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardReport {
    stats: Stats,
    #[serde(flatten)]
    board: Dashboard,
}

fn write_stats_line(w: &mut dyn Write, stats: &Stats) -> io::Result<()> {
    let count = |status: WorkStatus| stats.by_status.get(&status).copied().unwrap_or(0);
    pretty_kv(
        w,
        "Works",
        format!(
            "{} total, {} in progress, {} backlog, {} finished, {} dropped",
            stats.total,
            count(WorkStatus::InProgress),
            count(WorkStatus::Backlog),
            count(WorkStatus::Finished),
            count(WorkStatus::Dropped),
        ),
    )?;
    let by_type: Vec<String> = WorkType::ALL
        .iter()
        .filter_map(|t| stats.by_type.get(t).map(|n| format!("{n} {t}")))
        .collect();
    if !by_type.is_empty() {
        pretty_kv(w, "By type", by_type.join(", "))?;
    }
    Ok(())
}

fn write_pretty(report: &DashboardReport, w: &mut dyn Write) -> io::Result<()> {
    write_stats_line(w, &report.stats)?;
    for (heading, works, empty) in report.board.sections() {
        writeln!(w)?;
        pretty_section(w, &format!("{heading} ({})", works.len()))?;
        if works.is_empty() {
            writeln!(w, "{empty}")?;
        }
        for work in works {
            work.render_human(w)?;
        }
    }
    Ok(())
}

fn write_text(report: &DashboardReport, w: &mut dyn Write) -> io::Result<()> {
    for (heading, works, _) in report.board.sections() {
        for work in works {
            write!(w, "{heading}\t")?;
            work.render_table(w)?;
        }
    }
    Ok(())
}

/// Execute `shelf dashboard`.
///
/// # Errors
///
/// Returns an error if the shelf cannot be opened or a query fails.
pub fn run_dashboard(
    _args: &DashboardArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let shelf = open_shelf(project_root)?;
    let works = shelf
        .catalog
        .list(&WorkFilter::default(), Some(shelf.config.list.default_limit))?;
    let report = DashboardReport {
        stats: library::stats(&shelf.catalog)?,
        board: library::dashboard(works),
    };

    render_mode(output, &report, write_text, write_pretty)
}
