//! `shelf update`: patch one or more fields on a work.
//!
//! Only the flags you pass are changed. Text fields (`--review`, `--notes`,
//! `--cover-url`, `--creator`) are cleared by passing an empty string; the
//! numeric ones have explicit `--clear-*` flags.

use crate::cmd::{open_shelf, parse_work_status, parse_work_type};
use crate::cmd::show::render_work;
use crate::output::OutputMode;
use clap::Args;
use shelf_core::model::{Progress, WorkId, WorkPatch, WorkStatus, WorkType};
use std::path::Path;

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct UpdateArgs {
    /// Work ID to update.
    pub id: String,

    /// New title.
    #[arg(long)]
    pub title: Option<String>,

    /// New type: book, movie, series, anime, manga.
    #[arg(short = 't', long = "type", value_parser = parse_work_type)]
    pub work_type: Option<WorkType>,

    /// New status: backlog, in-progress, finished, dropped.
    #[arg(short, long, value_parser = parse_work_status)]
    pub status: Option<WorkStatus>,

    /// New rating from 1 to 5.
    #[arg(short, long, allow_negative_numbers = true, conflicts_with = "clear_rating")]
    pub rating: Option<i64>,

    /// Remove the rating.
    #[arg(long)]
    pub clear_rating: bool,

    /// Replace all tags (comma-separated or repeated).
    #[arg(long = "tag", value_delimiter = ',', conflicts_with = "clear_tags")]
    pub tags: Vec<String>,

    /// Remove every tag.
    #[arg(long)]
    pub clear_tags: bool,

    /// New progress as current/total.
    #[arg(short, long, conflicts_with = "clear_progress")]
    pub progress: Option<Progress>,

    /// Remove the progress counter.
    #[arg(long)]
    pub clear_progress: bool,

    /// New release year.
    #[arg(short, long, conflicts_with = "clear_year")]
    pub year: Option<i32>,

    /// Remove the release year.
    #[arg(long)]
    pub clear_year: bool,

    /// New creator (empty string to clear).
    #[arg(short, long)]
    pub creator: Option<String>,

    /// New review (empty string to clear).
    #[arg(long)]
    pub review: Option<String>,

    /// New notes (empty string to clear).
    #[arg(long)]
    pub notes: Option<String>,

    /// New cover image URL (empty string to clear).
    #[arg(long)]
    pub cover_url: Option<String>,

    /// Start time in epoch milliseconds.
    #[arg(long, conflicts_with = "clear_started_at")]
    pub started_at: Option<i64>,

    /// Remove the start time.
    #[arg(long)]
    pub clear_started_at: bool,

    /// Finish time in epoch milliseconds.
    #[arg(long, conflicts_with = "clear_finished_at")]
    pub finished_at: Option<i64>,

    /// Remove the finish time.
    #[arg(long)]
    pub clear_finished_at: bool,
}

/// `Some(Some(v))` to set, `Some(None)` to clear, `None` to keep.
fn clearable<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear { Some(None) } else { value.map(Some) }
}

impl UpdateArgs {
    pub fn to_patch(&self) -> WorkPatch {
        let tags = if self.clear_tags {
            Some(Vec::new())
        } else if self.tags.is_empty() {
            None
        } else {
            Some(self.tags.clone())
        };

        WorkPatch {
            title: self.title.clone(),
            work_type: self.work_type,
            status: self.status,
            rating: clearable(self.rating, self.clear_rating),
            review: self.review.clone(),
            tags,
            notes: self.notes.clone(),
            cover_url: self.cover_url.clone(),
            creator: self.creator.clone(),
            year: clearable(self.year, self.clear_year),
            progress: clearable(self.progress, self.clear_progress),
            started_at: clearable(self.started_at, self.clear_started_at),
            finished_at: clearable(self.finished_at, self.clear_finished_at),
        }
    }
}

/// Execute `shelf update`.
///
/// An update with no field flags still touches `updatedAt`.
///
/// # Errors
///
/// Returns `WorkNotFound` for an unknown id, `InvalidArgument` when the
/// patched work fails validation, or any error from opening the shelf.
pub fn run_update(args: &UpdateArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut shelf = open_shelf(project_root)?;
    let id = WorkId::from_raw(args.id.as_str());
    let patch = args.to_patch();
    if patch.is_empty() {
        tracing::debug!(%id, "empty patch, touching updatedAt only");
    }

    let work = shelf.catalog.update(&id, &patch)?;
    render_work(output, &work)
}
