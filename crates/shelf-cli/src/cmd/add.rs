//! `shelf add`: record a new work on the shelf.

use crate::cmd::{open_shelf, parse_work_status, parse_work_type};
use crate::cmd::show::{not_found, render_work};
use crate::output::OutputMode;
use clap::Args;
use shelf_core::model::{NewWork, Progress, WorkStatus, WorkType};
use std::path::Path;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Title of the work.
    #[arg(long)]
    pub title: String,

    /// Kind of work: book, movie, series, anime, manga.
    #[arg(short = 't', long = "type", value_parser = parse_work_type)]
    pub work_type: WorkType,

    /// Initial status.
    #[arg(short, long, default_value = "backlog", value_parser = parse_work_status)]
    pub status: WorkStatus,

    /// Rating from 1 to 5.
    #[arg(short, long, allow_negative_numbers = true)]
    pub rating: Option<i64>,

    /// Tags to attach (comma-separated or repeated).
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Author, director or studio.
    #[arg(short, long)]
    pub creator: Option<String>,

    /// Release year.
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Progress as current/total, e.g. 12/24.
    #[arg(short, long)]
    pub progress: Option<Progress>,

    /// Review text.
    #[arg(long)]
    pub review: Option<String>,

    /// Free-form notes.
    #[arg(long)]
    pub notes: Option<String>,

    /// Cover image URL.
    #[arg(long)]
    pub cover_url: Option<String>,

    /// When you started, in epoch milliseconds.
    #[arg(long)]
    pub started_at: Option<i64>,

    /// When you finished, in epoch milliseconds.
    #[arg(long)]
    pub finished_at: Option<i64>,
}

impl AddArgs {
    pub fn to_new_work(&self) -> NewWork {
        NewWork {
            rating: self.rating,
            review: self.review.clone(),
            tags: self.tags.clone(),
            notes: self.notes.clone(),
            cover_url: self.cover_url.clone(),
            creator: self.creator.clone(),
            year: self.year,
            progress: self.progress,
            started_at: self.started_at,
            finished_at: self.finished_at,
            ..NewWork::new(self.title.clone(), self.work_type, self.status)
        }
    }
}

/// Execute `shelf add`.
///
/// # Errors
///
/// Returns an `InvalidArgument` error when any field fails validation, or
/// any error from opening the shelf.
pub fn run_add(args: &AddArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut shelf = open_shelf(project_root)?;
    let id = shelf.catalog.create(&args.to_new_work())?;

    let Some(work) = shelf.catalog.get(&id)? else {
        return Err(not_found(&id).into());
    };
    render_work(output, &work)
}
