//! Read-side views over an already-listed set of works.
//!
//! Nothing here touches the store except [`stats`]. The functions take
//! the output of a list call and search, sort or group it in memory.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::model::{Work, WorkStatus, WorkType};

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Returns `true` when `query` occurs in the title, creator or any tag,
/// ignoring case. An empty query matches everything.
#[must_use]
pub fn matches_query(work: &Work, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    work.title.to_lowercase().contains(&needle)
        || work
            .creator
            .as_deref()
            .is_some_and(|creator| creator.to_lowercase().contains(&needle))
        || work.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
}

/// Keep the works matching `query`, preserving order.
#[must_use]
pub fn search(works: Vec<Work>, query: &str) -> Vec<Work> {
    works
        .into_iter()
        .filter(|work| matches_query(work, query))
        .collect()
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Title,
    Type,
    Status,
    Rating,
    #[default]
    UpdatedAt,
}

impl SortKey {
    pub const ALL: [Self; 5] = [
        Self::Title,
        Self::Type,
        Self::Status,
        Self::Rating,
        Self::UpdatedAt,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Type => "type",
            Self::Status => "status",
            Self::Rating => "rating",
            Self::UpdatedAt => "updated",
        }
    }

    fn compare(self, a: &Work, b: &Work) -> Ordering {
        match self {
            Self::Title => a
                .title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title)),
            Self::Type => a.work_type.as_str().cmp(b.work_type.as_str()),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
            Self::Rating => a.rating.unwrap_or(0).cmp(&b.rating.unwrap_or(0)),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "type" => Ok(Self::Type),
            "status" => Ok(Self::Status),
            "rating" => Ok(Self::Rating),
            "updated" | "updatedat" | "updated_at" | "updated-at" => Ok(Self::UpdatedAt),
            other => Err(CatalogError::invalid(
                "sort",
                format!("unknown sort key '{other}': expected title, type, status, rating or updated"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Stable in-place sort. A missing rating sorts as 0.
///
/// Works that compare equal keep their incoming order in both directions.
pub fn sort_works(works: &mut [Work], key: SortKey, direction: SortDirection) {
    works.sort_by(|a, b| {
        let ordering = key.compare(a, b);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Works grouped the way the dashboard shows them. Dropped works are not
/// part of any section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub in_progress: Vec<Work>,
    pub backlog: Vec<Work>,
    pub finished: Vec<Work>,
}

impl Dashboard {
    /// `(heading, works, empty message)` for each section in display order.
    #[must_use]
    pub fn sections(&self) -> [(&'static str, &[Work], &'static str); 3] {
        [
            (
                "In Progress",
                self.in_progress.as_slice(),
                "Start something new by adding a work.",
            ),
            ("Backlog", self.backlog.as_slice(), "Your backlog is empty."),
            ("Finished", self.finished.as_slice(), "Nothing finished yet."),
        ]
    }
}

/// Split `works` into dashboard sections, keeping their relative order.
#[must_use]
pub fn dashboard(works: Vec<Work>) -> Dashboard {
    let mut board = Dashboard::default();
    for work in works {
        match work.status {
            WorkStatus::InProgress => board.in_progress.push(work),
            WorkStatus::Backlog => board.backlog.push(work),
            WorkStatus::Finished => board.finished.push(work),
            WorkStatus::Dropped => {}
        }
    }
    board
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Shelf-wide counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub by_status: BTreeMap<WorkStatus, usize>,
    pub by_type: BTreeMap<WorkType, usize>,
}

/// Count works by status and by type.
///
/// # Errors
///
/// Returns an error if the aggregate queries fail.
pub fn stats(catalog: &Catalog) -> Result<Stats> {
    let by_status = catalog.counts_by_status()?;
    let by_type = catalog.counts_by_type()?;
    Ok(Stats {
        total: by_status.values().sum(),
        by_status,
        by_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkId;

    fn work(id: &str, title: &str, status: WorkStatus, rating: Option<u8>, updated: i64) -> Work {
        Work {
            id: WorkId::from_raw(id),
            title: title.to_string(),
            work_type: WorkType::Book,
            status,
            rating,
            review: None,
            tags: Vec::new(),
            notes: None,
            cover_url: None,
            creator: None,
            year: None,
            progress: None,
            started_at: None,
            finished_at: None,
            created_at: 0,
            updated_at: updated,
        }
    }

    fn ids(works: &[Work]) -> Vec<&str> {
        works.iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn search_matches_title_creator_and_tags() {
        let mut dune = work("wk-1", "Dune", WorkStatus::Backlog, None, 1);
        dune.creator = Some("Frank Herbert".into());
        let mut akira = work("wk-2", "Akira", WorkStatus::Backlog, None, 2);
        akira.tags = vec!["cyberpunk".into()];
        let works = vec![dune, akira];

        assert_eq!(ids(&search(works.clone(), "herb")), vec!["wk-1"]);
        assert_eq!(ids(&search(works.clone(), "CYBER")), vec!["wk-2"]);
        assert_eq!(ids(&search(works.clone(), "dUnE")), vec!["wk-1"]);
        assert_eq!(search(works.clone(), "").len(), 2);
        assert!(search(works, "zzz").is_empty());
    }

    #[test]
    fn rating_sort_treats_missing_as_zero() {
        let mut works = vec![
            work("wk-1", "A", WorkStatus::Backlog, Some(3), 1),
            work("wk-2", "B", WorkStatus::Backlog, None, 2),
            work("wk-3", "C", WorkStatus::Backlog, Some(5), 3),
        ];
        sort_works(&mut works, SortKey::Rating, SortDirection::Desc);
        assert_eq!(ids(&works), vec!["wk-3", "wk-1", "wk-2"]);

        sort_works(&mut works, SortKey::Rating, SortDirection::Asc);
        assert_eq!(ids(&works), vec!["wk-2", "wk-1", "wk-3"]);
    }

    #[test]
    fn title_sort_ignores_case() {
        let mut works = vec![
            work("wk-1", "banana", WorkStatus::Backlog, None, 1),
            work("wk-2", "Apple", WorkStatus::Backlog, None, 2),
            work("wk-3", "cherry", WorkStatus::Backlog, None, 3),
        ];
        sort_works(&mut works, SortKey::Title, SortDirection::Asc);
        assert_eq!(ids(&works), vec!["wk-2", "wk-1", "wk-3"]);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let mut works = vec![
            work("wk-1", "A", WorkStatus::Finished, None, 1),
            work("wk-2", "B", WorkStatus::Finished, None, 2),
        ];
        sort_works(&mut works, SortKey::Status, SortDirection::Desc);
        assert_eq!(ids(&works), vec!["wk-1", "wk-2"]);
    }

    #[test]
    fn sort_key_parses_aliases() {
        assert_eq!("updatedAt".parse::<SortKey>().expect("parse"), SortKey::UpdatedAt);
        assert_eq!("Rating".parse::<SortKey>().expect("parse"), SortKey::Rating);
        assert!("year".parse::<SortKey>().is_err());
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().expect("parse"), key);
        }
    }

    #[test]
    fn dashboard_groups_and_hides_dropped() {
        let works = vec![
            work("wk-1", "A", WorkStatus::InProgress, None, 4),
            work("wk-2", "B", WorkStatus::Dropped, None, 3),
            work("wk-3", "C", WorkStatus::Backlog, None, 2),
            work("wk-4", "D", WorkStatus::InProgress, None, 1),
        ];
        let board = dashboard(works);
        assert_eq!(ids(&board.in_progress), vec!["wk-1", "wk-4"]);
        assert_eq!(ids(&board.backlog), vec!["wk-3"]);
        assert!(board.finished.is_empty());
        assert_eq!(board.sections()[2].2, "Nothing finished yet.");
    }

    #[test]
    fn stats_count_every_row() {
        use crate::model::NewWork;

        let mut catalog = Catalog::open_in_memory().expect("catalog");
        for (work_type, status) in [
            (WorkType::Book, WorkStatus::Finished),
            (WorkType::Anime, WorkStatus::Finished),
            (WorkType::Book, WorkStatus::Dropped),
        ] {
            catalog
                .create(&NewWork::new("x", work_type, status))
                .expect("create");
        }

        let stats = stats(&catalog).expect("stats");
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status.get(&WorkStatus::Finished), Some(&2));
        assert_eq!(stats.by_type.get(&WorkType::Book), Some(&2));
    }
}
