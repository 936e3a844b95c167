//! Read paths over the works table.
//!
//! [`list_works`] picks exactly one retrieval index from the filter, names
//! it with `INDEXED BY`, and returns a finite, most-recently-updated-first
//! result capped at the requested limit. [`get_work`] is a point lookup
//! that reports a missing id as `None`, never as an error.

use rusqlite::{Connection, OptionalExtension, Row, params, types::Type};
use std::collections::BTreeMap;
use std::fmt;

use super::schema::WORK_COLUMNS;
use crate::error::Result;
use crate::model::{Progress, Work, WorkId, WorkStatus, WorkType};

/// Row cap applied when the caller does not pass one.
pub const DEFAULT_LIST_LIMIT: u32 = 200;

// ---------------------------------------------------------------------------
// Filters and index selection
// ---------------------------------------------------------------------------

/// Optional list filters.
///
/// The two fields are not combined: when both are set only `status` is
/// honored (see [`IndexPath::select`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkFilter {
    pub status: Option<WorkStatus>,
    pub work_type: Option<WorkType>,
}

impl WorkFilter {
    #[must_use]
    pub const fn status(status: WorkStatus) -> Self {
        Self {
            status: Some(status),
            work_type: None,
        }
    }

    #[must_use]
    pub const fn work_type(work_type: WorkType) -> Self {
        Self {
            status: None,
            work_type: Some(work_type),
        }
    }

    /// Returns `true` when `type` is set but will be ignored.
    #[must_use]
    pub const fn type_is_shadowed(&self) -> bool {
        self.status.is_some() && self.work_type.is_some()
    }
}

/// The retrieval index a list call runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexPath {
    /// `(status, updated_at)` composite index.
    Status(WorkStatus),
    /// `(work_type, updated_at)` composite index.
    Type(WorkType),
    /// Plain `(updated_at)` index.
    Recent,
}

impl IndexPath {
    /// Status first, then type, then the unfiltered index.
    #[must_use]
    pub const fn select(filter: &WorkFilter) -> Self {
        match (filter.status, filter.work_type) {
            (Some(status), _) => Self::Status(status),
            (None, Some(work_type)) => Self::Type(work_type),
            (None, None) => Self::Recent,
        }
    }

    #[must_use]
    pub const fn index_name(self) -> &'static str {
        match self {
            Self::Status(_) => "idx_works_status_updated",
            Self::Type(_) => "idx_works_type_updated",
            Self::Recent => "idx_works_updated",
        }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "status={status}"),
            Self::Type(work_type) => write!(f, "type={work_type}"),
            Self::Recent => f.write_str("recent"),
        }
    }
}

// ---------------------------------------------------------------------------
// Core query functions
// ---------------------------------------------------------------------------

/// Fetch a single work by exact id.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is malformed.
pub fn get_work(conn: &Connection, id: &WorkId) -> Result<Option<Work>> {
    let sql = format!("SELECT {WORK_COLUMNS} FROM works WHERE work_id = ?1");
    let work = conn
        .query_row(&sql, params![id.as_str()], row_to_work)
        .optional()?;
    Ok(work)
}

/// List works, most recently updated first, capped at `limit`
/// (default [`DEFAULT_LIST_LIMIT`]).
///
/// Ties on `updated_at` are broken by insertion order, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is malformed.
pub fn list_works(conn: &Connection, filter: &WorkFilter, limit: Option<u32>) -> Result<Vec<Work>> {
    let limit = i64::from(limit.unwrap_or(DEFAULT_LIST_LIMIT));
    let path = IndexPath::select(filter);
    tracing::debug!(path = %path, index = path.index_name(), limit, "list works");

    let index = path.index_name();
    let works = match path {
        IndexPath::Status(status) => {
            let sql = format!(
                "SELECT {WORK_COLUMNS} FROM works INDEXED BY {index} WHERE status = ?1 \
                 ORDER BY updated_at_ms DESC, rowid DESC LIMIT ?2"
            );
            collect_works(conn, &sql, params![status.as_str(), limit])?
        }
        IndexPath::Type(work_type) => {
            let sql = format!(
                "SELECT {WORK_COLUMNS} FROM works INDEXED BY {index} WHERE work_type = ?1 \
                 ORDER BY updated_at_ms DESC, rowid DESC LIMIT ?2"
            );
            collect_works(conn, &sql, params![work_type.as_str(), limit])?
        }
        IndexPath::Recent => {
            let sql = format!(
                "SELECT {WORK_COLUMNS} FROM works INDEXED BY {index} \
                 ORDER BY updated_at_ms DESC, rowid DESC LIMIT ?1"
            );
            collect_works(conn, &sql, params![limit])?
        }
    };

    Ok(works)
}

/// Count works under the same filter precedence as [`list_works`].
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_works(conn: &Connection, filter: &WorkFilter) -> Result<u64> {
    let count: i64 = match IndexPath::select(filter) {
        IndexPath::Status(status) => conn.query_row(
            "SELECT COUNT(*) FROM works WHERE status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?,
        IndexPath::Type(work_type) => conn.query_row(
            "SELECT COUNT(*) FROM works WHERE work_type = ?1",
            params![work_type.as_str()],
            |row| row.get(0),
        )?,
        IndexPath::Recent => conn.query_row("SELECT COUNT(*) FROM works", [], |row| row.get(0))?,
    };
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Check whether a work exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn work_exists(conn: &Connection, id: &WorkId) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM works WHERE work_id = ?1)",
        params![id.as_str()],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Count works grouped by status. Statuses with no works are omitted.
///
/// # Errors
///
/// Returns an error if the aggregate query fails.
pub fn counts_by_status(conn: &Connection) -> Result<BTreeMap<WorkStatus, usize>> {
    let mut counts = BTreeMap::new();
    for (key, count) in count_grouped(conn, "status")? {
        let status = key.parse::<WorkStatus>()?;
        counts.insert(status, count);
    }
    Ok(counts)
}

/// Count works grouped by type. Types with no works are omitted.
///
/// # Errors
///
/// Returns an error if the aggregate query fails.
pub fn counts_by_type(conn: &Connection) -> Result<BTreeMap<WorkType, usize>> {
    let mut counts = BTreeMap::new();
    for (key, count) in count_grouped(conn, "work_type")? {
        let work_type = key.parse::<WorkType>()?;
        counts.insert(work_type, count);
    }
    Ok(counts)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn collect_works(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Work>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, row_to_work)?;

    let mut works = Vec::new();
    for row in rows {
        works.push(row?);
    }
    Ok(works)
}

fn count_grouped(conn: &Connection, column: &str) -> Result<Vec<(String, usize)>> {
    let sql = format!("SELECT {column}, COUNT(*) FROM works GROUP BY {column} ORDER BY {column}");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        let key: String = row.get(0)?;
        let count: i64 = row.get(1)?;
        Ok((key, usize::try_from(count).unwrap_or(usize::MAX)))
    })?;

    let mut grouped = Vec::new();
    for row in rows {
        grouped.push(row?);
    }
    Ok(grouped)
}

fn conversion_error(
    index: usize,
    error: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
}

pub(crate) fn row_to_work(row: &Row<'_>) -> rusqlite::Result<Work> {
    let work_type: String = row.get(2)?;
    let status: String = row.get(3)?;
    let rating: Option<i64> = row.get(4)?;
    let tags_json: String = row.get(6)?;
    let progress_current: Option<i64> = row.get(11)?;
    let progress_total: Option<i64> = row.get(12)?;

    let rating = rating
        .map(|value| {
            u8::try_from(value)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(e)))
        })
        .transpose()?;

    Ok(Work {
        id: WorkId::from_raw(row.get::<_, String>(0)?),
        title: row.get(1)?,
        work_type: work_type
            .parse::<WorkType>()
            .map_err(|e| conversion_error(2, e))?,
        status: status
            .parse::<WorkStatus>()
            .map_err(|e| conversion_error(3, e))?,
        rating,
        review: row.get(5)?,
        tags: serde_json::from_str(&tags_json).map_err(|e| conversion_error(6, e))?,
        notes: row.get(7)?,
        cover_url: row.get(8)?,
        creator: row.get(9)?,
        year: row.get(10)?,
        progress: match (progress_current, progress_total) {
            (Some(current), Some(total)) => Some(Progress::new(current, total)),
            _ => None,
        },
        started_at: row.get(13)?,
        finished_at: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    /// Insert a work with minimal required fields.
    fn insert_work(conn: &Connection, id: &str, work_type: &str, status: &str, updated: i64) {
        conn.execute(
            "INSERT INTO works (work_id, title, work_type, status, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![id, format!("Title of {id}"), work_type, status, updated],
        )
        .expect("insert work");
    }

    fn ids(works: &[Work]) -> Vec<&str> {
        works.iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn get_work_found_with_all_columns() {
        let conn = open_in_memory().expect("store");
        conn.execute(
            "INSERT INTO works (work_id, title, work_type, status, rating, review, tags_json, \
             notes, cover_url, creator, year, progress_current, progress_total, \
             started_at_ms, finished_at_ms, created_at_ms, updated_at_ms) \
             VALUES ('wk-aaaaaaaaaa', 'Dune', 'book', 'in-progress', 4, 'great', '[\"sci-fi\"]', \
             '# notes', 'https://img', 'Frank Herbert', 1965, 120, 412, 10, NULL, 5, 6)",
            [],
        )
        .expect("insert");

        let work = get_work(&conn, &WorkId::from_raw("wk-aaaaaaaaaa"))
            .expect("query")
            .expect("present");
        assert_eq!(work.title, "Dune");
        assert_eq!(work.work_type, WorkType::Book);
        assert_eq!(work.status, WorkStatus::InProgress);
        assert_eq!(work.rating, Some(4));
        assert_eq!(work.tags, vec!["sci-fi"]);
        assert_eq!(work.year, Some(1965));
        assert_eq!(work.progress, Some(Progress::new(120, 412)));
        assert_eq!(work.started_at, Some(10));
        assert_eq!(work.finished_at, None);
        assert_eq!((work.created_at, work.updated_at), (5, 6));
    }

    #[test]
    fn get_work_not_found_is_none() {
        let conn = open_in_memory().expect("store");
        let work = get_work(&conn, &WorkId::from_raw("wk-nonexistent")).expect("query");
        assert!(work.is_none());
    }

    #[test]
    fn list_unfiltered_is_most_recent_first() {
        let conn = open_in_memory().expect("store");
        insert_work(&conn, "wk-1", "book", "backlog", 100);
        insert_work(&conn, "wk-2", "movie", "finished", 300);
        insert_work(&conn, "wk-3", "anime", "dropped", 200);

        let works = list_works(&conn, &WorkFilter::default(), None).expect("list");
        assert_eq!(ids(&works), vec!["wk-2", "wk-3", "wk-1"]);
    }

    #[test]
    fn list_by_status_only_returns_that_status() {
        let conn = open_in_memory().expect("store");
        insert_work(&conn, "wk-1", "book", "finished", 100);
        insert_work(&conn, "wk-2", "movie", "backlog", 300);
        insert_work(&conn, "wk-3", "anime", "finished", 200);

        let works =
            list_works(&conn, &WorkFilter::status(WorkStatus::Finished), None).expect("list");
        assert_eq!(ids(&works), vec!["wk-3", "wk-1"]);
        assert!(works.iter().all(|w| w.status == WorkStatus::Finished));
    }

    #[test]
    fn list_by_type_only_returns_that_type() {
        let conn = open_in_memory().expect("store");
        insert_work(&conn, "wk-1", "manga", "finished", 100);
        insert_work(&conn, "wk-2", "movie", "backlog", 300);
        insert_work(&conn, "wk-3", "manga", "backlog", 200);

        let works = list_works(&conn, &WorkFilter::work_type(WorkType::Manga), None).expect("list");
        assert_eq!(ids(&works), vec!["wk-3", "wk-1"]);
    }

    #[test]
    fn status_takes_precedence_over_type() {
        let conn = open_in_memory().expect("store");
        insert_work(&conn, "wk-1", "book", "finished", 100);
        insert_work(&conn, "wk-2", "movie", "finished", 300);
        insert_work(&conn, "wk-3", "book", "backlog", 200);

        let filter = WorkFilter {
            status: Some(WorkStatus::Finished),
            work_type: Some(WorkType::Book),
        };
        assert!(filter.type_is_shadowed());
        assert_eq!(IndexPath::select(&filter), IndexPath::Status(WorkStatus::Finished));

        let works = list_works(&conn, &filter, None).expect("list");
        assert_eq!(ids(&works), vec!["wk-2", "wk-1"]);
    }

    #[test]
    fn limit_is_honored_as_given() {
        let conn = open_in_memory().expect("store");
        for i in 0..5 {
            insert_work(&conn, &format!("wk-{i}"), "book", "backlog", i);
        }

        let one = list_works(&conn, &WorkFilter::default(), Some(1)).expect("list");
        assert_eq!(ids(&one), vec!["wk-4"]);

        let none = list_works(&conn, &WorkFilter::default(), Some(0)).expect("list");
        assert!(none.is_empty());

        let all = list_works(&conn, &WorkFilter::default(), Some(u32::MAX)).expect("list");
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn default_limit_caps_at_two_hundred() {
        let conn = open_in_memory().expect("store");
        for i in 0..205 {
            insert_work(&conn, &format!("wk-{i:05}"), "book", "backlog", i);
        }
        let works = list_works(&conn, &WorkFilter::default(), None).expect("list");
        assert_eq!(works.len(), 200);
        assert_eq!(works[0].id.as_str(), "wk-00204");
    }

    #[test]
    fn ties_break_newest_insert_first() {
        let conn = open_in_memory().expect("store");
        insert_work(&conn, "wk-a", "book", "backlog", 100);
        insert_work(&conn, "wk-b", "book", "backlog", 100);

        let works = list_works(&conn, &WorkFilter::default(), None).expect("list");
        assert_eq!(ids(&works), vec!["wk-b", "wk-a"]);
    }

    #[test]
    fn counts_group_by_status_and_type() {
        let conn = open_in_memory().expect("store");
        insert_work(&conn, "wk-1", "book", "finished", 1);
        insert_work(&conn, "wk-2", "book", "backlog", 2);
        insert_work(&conn, "wk-3", "anime", "finished", 3);

        let by_status = counts_by_status(&conn).expect("counts");
        assert_eq!(by_status.get(&WorkStatus::Finished), Some(&2));
        assert_eq!(by_status.get(&WorkStatus::Backlog), Some(&1));
        assert_eq!(by_status.get(&WorkStatus::Dropped), None);

        let by_type = counts_by_type(&conn).expect("counts");
        assert_eq!(by_type.get(&WorkType::Book), Some(&2));
        assert_eq!(by_type.get(&WorkType::Anime), Some(&1));

        assert_eq!(
            count_works(&conn, &WorkFilter::status(WorkStatus::Finished)).expect("count"),
            2
        );
        assert_eq!(count_works(&conn, &WorkFilter::default()).expect("count"), 3);
    }

    #[test]
    fn work_exists_works() {
        let conn = open_in_memory().expect("store");
        insert_work(&conn, "wk-1", "book", "finished", 1);
        assert!(work_exists(&conn, &WorkId::from_raw("wk-1")).expect("query"));
        assert!(!work_exists(&conn, &WorkId::from_raw("wk-2")).expect("query"));
    }

    #[test]
    fn index_path_names_match_schema() {
        use crate::db::schema::REQUIRED_INDEXES;
        for path in [
            IndexPath::Recent,
            IndexPath::Status(WorkStatus::Backlog),
            IndexPath::Type(WorkType::Book),
        ] {
            assert!(REQUIRED_INDEXES.contains(&path.index_name()));
        }
    }
}
