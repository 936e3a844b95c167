use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

use super::WorkId;
use crate::error::CatalogError;

/// The five kinds of tracked media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkType {
    Book,
    Movie,
    Series,
    Anime,
    Manga,
}

impl WorkType {
    pub const ALL: [Self; 5] = [
        Self::Book,
        Self::Movie,
        Self::Series,
        Self::Anime,
        Self::Manga,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Anime => "anime",
            Self::Manga => "manga",
        }
    }

    /// Unit the progress counter is measured in. Movies have none.
    #[must_use]
    pub const fn progress_unit(self) -> &'static str {
        match self {
            Self::Book => "pages",
            Self::Movie => "",
            Self::Series | Self::Anime => "episodes",
            Self::Manga => "chapters",
        }
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Canonical lowercase names only.
impl FromStr for WorkType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "book" => Ok(Self::Book),
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            "anime" => Ok(Self::Anime),
            "manga" => Ok(Self::Manga),
            other => Err(CatalogError::invalid(
                "type",
                format!("unknown type '{other}': expected book, movie, series, anime or manga"),
            )),
        }
    }
}

/// Where a work sits on the shelf.
///
/// There is no transition graph: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkStatus {
    Backlog,
    InProgress,
    Finished,
    Dropped,
}

impl WorkStatus {
    pub const ALL: [Self; 4] = [
        Self::Backlog,
        Self::InProgress,
        Self::Finished,
        Self::Dropped,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in-progress",
            Self::Finished => "finished",
            Self::Dropped => "dropped",
        }
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for WorkStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlog" => Ok(Self::Backlog),
            "in-progress" => Ok(Self::InProgress),
            "finished" => Ok(Self::Finished),
            "dropped" => Ok(Self::Dropped),
            other => Err(CatalogError::invalid(
                "status",
                format!(
                    "unknown status '{other}': expected backlog, in-progress, finished or dropped"
                ),
            )),
        }
    }
}

/// A current/total counter of pages, episodes or chapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: i64,
    pub total: i64,
}

impl Progress {
    #[must_use]
    pub const fn new(current: i64, total: i64) -> Self {
        Self { current, total }
    }

    /// Completion percentage, clamped to 100. Zero when `total` is not positive.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(self) -> f64 {
        if self.total <= 0 {
            return 0.0;
        }
        (self.current as f64 / self.total as f64 * 100.0).min(100.0)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.total)
    }
}

impl FromStr for Progress {
    type Err = CatalogError;

    /// Parse `current/total`, e.g. `120/320`. Range checks happen in validation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim().parse::<i64>().map_err(|_| {
                CatalogError::invalid("progress", format!("'{s}' is not of the form current/total"))
            })
        };
        let (current, total) = s.split_once('/').ok_or_else(|| {
            CatalogError::invalid("progress", format!("'{s}' is not of the form current/total"))
        })?;
        Ok(Self::new(parse(current)?, parse(total)?))
    }
}

/// A stored work with every invariant already enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: WorkId,
    pub title: String,
    #[serde(rename = "type")]
    pub work_type: WorkType,
    pub status: WorkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Caller-supplied fields for a new work, before normalization.
///
/// `id`, `createdAt` and `updatedAt` are assigned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWork {
    pub title: String,
    #[serde(rename = "type")]
    pub work_type: WorkType,
    pub status: WorkStatus,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub progress: Option<Progress>,
    #[serde(default)]
    pub started_at: Option<i64>,
    #[serde(default)]
    pub finished_at: Option<i64>,
}

impl NewWork {
    /// Minimal new work; every optional field absent and no tags.
    #[must_use]
    pub fn new(title: impl Into<String>, work_type: WorkType, status: WorkStatus) -> Self {
        Self {
            title: title.into(),
            work_type,
            status,
            rating: None,
            review: None,
            tags: Vec::new(),
            notes: None,
            cover_url: None,
            creator: None,
            year: None,
            progress: None,
            started_at: None,
            finished_at: None,
        }
    }
}

/// A sparse update. Every field is independently optional.
///
/// For the clearable numeric fields the outer `Option` says whether the
/// field is patched at all and the inner one carries the new value, with
/// `Some(None)` removing it. Text fields are cleared by patching them to an
/// empty or whitespace-only string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub work_type: Option<WorkType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkStatus>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub rating: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub year: Option<Option<i32>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub progress: Option<Option<Progress>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Option<i64>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<Option<i64>>,
}

impl WorkPatch {
    /// Returns `true` when no field is patched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Distinguishes an explicit JSON `null` (clear) from a missing key (keep).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
