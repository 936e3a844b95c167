//! `shelf show`: display every field of a single work.

use crate::cmd::open_shelf;
use crate::output::{
    CliError, OutputMode, format_ms, pretty_kv, pretty_rule, pretty_section, progress_bar,
    render_mode, stars,
};
use clap::Args;
use shelf_core::error::ErrorCode;
use shelf_core::model::{Work, WorkId};
use std::io::{self, Write};
use std::path::Path;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Work ID to display, e.g. wk-3f9a0c12be.
    pub id: String,
}

/// Full human-readable view of one work.
pub fn write_work_detail(w: &mut dyn Write, work: &Work) -> io::Result<()> {
    pretty_section(w, &work.title)?;
    pretty_kv(w, "ID", work.id.as_str())?;
    pretty_kv(w, "Type", work.work_type.as_str())?;
    pretty_kv(w, "Status", work.status.as_str())?;
    pretty_kv(w, "Rating", stars(work.rating))?;
    if let Some(creator) = &work.creator {
        pretty_kv(w, "Creator", creator)?;
    }
    if let Some(year) = work.year {
        pretty_kv(w, "Year", year.to_string())?;
    }
    if let Some(progress) = work.progress {
        pretty_kv(w, "Progress", progress_bar(progress, work.work_type))?;
    }
    if !work.tags.is_empty() {
        pretty_kv(w, "Tags", work.tags.join(", "))?;
    }
    if let Some(cover_url) = &work.cover_url {
        pretty_kv(w, "Cover", cover_url)?;
    }
    if let Some(started_at) = work.started_at {
        pretty_kv(w, "Started", format_ms(started_at))?;
    }
    if let Some(finished_at) = work.finished_at {
        pretty_kv(w, "Finished", format_ms(finished_at))?;
    }
    pretty_kv(w, "Created", format_ms(work.created_at))?;
    pretty_kv(w, "Updated", format_ms(work.updated_at))?;

    if let Some(review) = &work.review {
        writeln!(w)?;
        pretty_section(w, "Review")?;
        writeln!(w, "{review}")?;
    }
    if let Some(notes) = &work.notes {
        writeln!(w)?;
        pretty_section(w, "Notes")?;
        writeln!(w, "{notes}")?;
    }
    pretty_rule(w)
}

/// One `key<TAB>value` line per present field.
pub fn write_work_text(w: &mut dyn Write, work: &Work) -> io::Result<()> {
    writeln!(w, "id\t{}", work.id)?;
    writeln!(w, "title\t{}", work.title)?;
    writeln!(w, "type\t{}", work.work_type)?;
    writeln!(w, "status\t{}", work.status)?;
    if let Some(rating) = work.rating {
        writeln!(w, "rating\t{rating}")?;
    }
    if let Some(creator) = &work.creator {
        writeln!(w, "creator\t{creator}")?;
    }
    if let Some(year) = work.year {
        writeln!(w, "year\t{year}")?;
    }
    if let Some(progress) = work.progress {
        writeln!(w, "progress\t{progress}")?;
    }
    if !work.tags.is_empty() {
        writeln!(w, "tags\t{}", work.tags.join(","))?;
    }
    if let Some(cover_url) = &work.cover_url {
        writeln!(w, "cover_url\t{cover_url}")?;
    }
    if let Some(started_at) = work.started_at {
        writeln!(w, "started_at\t{started_at}")?;
    }
    if let Some(finished_at) = work.finished_at {
        writeln!(w, "finished_at\t{finished_at}")?;
    }
    writeln!(w, "created_at\t{}", work.created_at)?;
    writeln!(w, "updated_at\t{}", work.updated_at)?;
    if let Some(review) = &work.review {
        writeln!(w, "review\t{}", review.replace('\n', "\\n"))?;
    }
    if let Some(notes) = &work.notes {
        writeln!(w, "notes\t{}", notes.replace('\n', "\\n"))?;
    }
    Ok(())
}

/// Render a work in the requested mode.
pub fn render_work(output: OutputMode, work: &Work) -> anyhow::Result<()> {
    render_mode(
        output,
        work,
        |work, w| write_work_text(w, work),
        |work, w| write_work_detail(w, work),
    )
}

/// Error for an id that does not resolve.
pub fn not_found(id: &WorkId) -> CliError {
    CliError::coded(format!("work not found: {id}"), ErrorCode::WorkNotFound)
}

/// Execute `shelf show <id>`.
///
/// # Errors
///
/// Returns a `WorkNotFound` error when the id does not resolve, or any
/// error from opening the shelf.
pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let shelf = open_shelf(project_root)?;
    let id = WorkId::from_raw(args.id.as_str());

    let Some(work) = shelf.catalog.get(&id)? else {
        return Err(not_found(&id).into());
    };
    render_work(output, &work)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::model::{Progress, WorkStatus, WorkType};

    fn sample() -> Work {
        Work {
            id: WorkId::from_raw("wk-0123456789"),
            title: "Dune".into(),
            work_type: WorkType::Book,
            status: WorkStatus::InProgress,
            rating: Some(4),
            review: None,
            tags: vec!["sci-fi".into(), "classic".into()],
            notes: Some("line one\nline two".into()),
            cover_url: None,
            creator: Some("Frank Herbert".into()),
            year: Some(1965),
            progress: Some(Progress::new(80, 320)),
            started_at: None,
            finished_at: None,
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn detail_view_shows_progress_and_notes() {
        let mut buf = Vec::new();
        write_work_detail(&mut buf, &sample()).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("Dune\n"));
        assert!(text.contains("80/320 pages"));
        assert!(text.contains("Frank Herbert"));
        assert!(text.contains("line two"));
        assert!(!text.contains("Review"));
    }

    #[test]
    fn text_view_is_one_field_per_line() {
        let mut buf = Vec::new();
        write_work_text(&mut buf, &sample()).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("status\tin-progress\n"));
        assert!(text.contains("tags\tsci-fi,classic\n"));
        assert!(text.contains("notes\tline one\\nline two\n"));
        assert!(!text.contains("cover_url"));
    }

    #[test]
    fn not_found_carries_code() {
        let err = not_found(&WorkId::from_raw("wk-nope"));
        assert_eq!(err.error_code.as_deref(), Some("E2002"));
        assert!(err.message.contains("wk-nope"));
    }
}
