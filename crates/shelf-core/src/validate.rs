//! Field normalization and invariant checks applied before any write.
//!
//! Everything here is pure. The create path validates a full [`NewWork`];
//! the update path validates only the fields present in a [`WorkPatch`].
//! A failure aborts the whole operation before the store is touched.

use crate::error::{CatalogError, Result};
use crate::model::{NewWork, Progress, Work, WorkPatch, WorkStatus, WorkType};

/// Maximum number of tags kept on a work.
pub const MAX_TAGS: usize = 20;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Trim and lowercase each tag, drop empties, keep the first [`MAX_TAGS`].
///
/// Order and duplicates from the caller are preserved. Never fails.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.as_ref().trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .collect()
}

/// Trim optional free text; an empty result means absent.
#[must_use]
pub fn normalize_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(ToString::to_string)
}

/// Trim a title, rejecting one that is empty afterwards.
///
/// # Errors
///
/// Returns `InvalidArgument` for an empty or whitespace-only title.
pub fn normalize_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::invalid("title", "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Check that a present rating lies in `1..=5`.
///
/// # Errors
///
/// Returns `InvalidArgument` for any rating outside the range.
pub fn validate_rating(rating: Option<i64>) -> Result<Option<u8>> {
    let Some(value) = rating else {
        return Ok(None);
    };
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(CatalogError::invalid(
            "rating",
            format!("{value} is outside {MIN_RATING}..={MAX_RATING}"),
        ));
    }
    u8::try_from(value)
        .map(Some)
        .map_err(|_| CatalogError::invalid("rating", format!("{value} does not fit")))
}

/// Check `total > 0` and `0 <= current <= total` for a present counter.
///
/// # Errors
///
/// Returns `InvalidArgument` when either bound is broken.
pub fn validate_progress(progress: Option<Progress>) -> Result<Option<Progress>> {
    let Some(p) = progress else {
        return Ok(None);
    };
    if p.total <= 0 || p.current < 0 {
        return Err(CatalogError::invalid(
            "progress",
            format!("{p} needs total > 0 and current >= 0"),
        ));
    }
    if p.current > p.total {
        return Err(CatalogError::invalid(
            "progress",
            format!("current {} cannot exceed total {}", p.current, p.total),
        ));
    }
    Ok(Some(p))
}

/// Normalized fields of a work about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidWork {
    pub title: String,
    pub work_type: WorkType,
    pub status: WorkStatus,
    pub rating: Option<u8>,
    pub review: Option<String>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub cover_url: Option<String>,
    pub creator: Option<String>,
    pub year: Option<i32>,
    pub progress: Option<Progress>,
    pub started_at: Option<i64>,
    pub finished_at: Option<i64>,
}

/// Validate and normalize the create-path input.
///
/// # Errors
///
/// Returns `InvalidArgument` on the first broken invariant.
pub fn validate_new_work(new: &NewWork) -> Result<ValidWork> {
    let progress = validate_progress(new.progress)?;
    let rating = validate_rating(new.rating)?;
    let title = normalize_title(&new.title)?;

    Ok(ValidWork {
        title,
        work_type: new.work_type,
        status: new.status,
        rating,
        review: normalize_text(new.review.as_deref()),
        tags: normalize_tags(&new.tags),
        notes: normalize_text(new.notes.as_deref()),
        cover_url: normalize_text(new.cover_url.as_deref()),
        creator: normalize_text(new.creator.as_deref()),
        year: new.year,
        progress,
        started_at: new.started_at,
        finished_at: new.finished_at,
    })
}

/// A patch whose present fields have been normalized and checked.
///
/// Outer `Option` = field is patched; inner `Option` = new value or clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidPatch {
    pub title: Option<String>,
    pub work_type: Option<WorkType>,
    pub status: Option<WorkStatus>,
    pub rating: Option<Option<u8>>,
    pub review: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<Option<String>>,
    pub cover_url: Option<Option<String>>,
    pub creator: Option<Option<String>>,
    pub year: Option<Option<i32>>,
    pub progress: Option<Option<Progress>>,
    pub started_at: Option<Option<i64>>,
    pub finished_at: Option<Option<i64>>,
}

impl ValidPatch {
    /// Overwrite the patched fields of `work`. Timestamps are left alone.
    pub fn apply_to(self, work: &mut Work) {
        if let Some(title) = self.title {
            work.title = title;
        }
        if let Some(work_type) = self.work_type {
            work.work_type = work_type;
        }
        if let Some(status) = self.status {
            work.status = status;
        }
        if let Some(rating) = self.rating {
            work.rating = rating;
        }
        if let Some(review) = self.review {
            work.review = review;
        }
        if let Some(tags) = self.tags {
            work.tags = tags;
        }
        if let Some(notes) = self.notes {
            work.notes = notes;
        }
        if let Some(cover_url) = self.cover_url {
            work.cover_url = cover_url;
        }
        if let Some(creator) = self.creator {
            work.creator = creator;
        }
        if let Some(year) = self.year {
            work.year = year;
        }
        if let Some(progress) = self.progress {
            work.progress = progress;
        }
        if let Some(started_at) = self.started_at {
            work.started_at = started_at;
        }
        if let Some(finished_at) = self.finished_at {
            work.finished_at = finished_at;
        }
    }
}

/// Validate and normalize only the fields present in `patch`.
///
/// A progress patch of `Some(None)` clears the counter without range checks.
///
/// # Errors
///
/// Returns `InvalidArgument` on the first broken invariant.
pub fn validate_patch(patch: &WorkPatch) -> Result<ValidPatch> {
    let progress = match patch.progress {
        Some(Some(p)) => Some(validate_progress(Some(p))?),
        Some(None) => Some(None),
        None => None,
    };
    let rating = match patch.rating {
        Some(value) => Some(validate_rating(value)?),
        None => None,
    };
    let title = patch.title.as_deref().map(normalize_title).transpose()?;

    Ok(ValidPatch {
        title,
        work_type: patch.work_type,
        status: patch.status,
        rating,
        review: patch.review.as_deref().map(|t| normalize_text(Some(t))),
        tags: patch.tags.as_deref().map(normalize_tags),
        notes: patch.notes.as_deref().map(|t| normalize_text(Some(t))),
        cover_url: patch.cover_url.as_deref().map(|t| normalize_text(Some(t))),
        creator: patch.creator.as_deref().map(|t| normalize_text(Some(t))),
        year: patch.year,
        progress,
        started_at: patch.started_at,
        finished_at: patch.finished_at,
    })
}
