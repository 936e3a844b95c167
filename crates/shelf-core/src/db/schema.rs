//! Canonical SQLite schema for the shelf store.
//!
//! One table holds every work. Tags live inline as a JSON array because
//! nothing queries by tag. Three indexes serve the list paths:
//! - `idx_works_updated` for the unfiltered "most recent first" view
//! - `idx_works_status_updated` for per-status views (dashboard sections)
//! - `idx_works_type_updated` for per-type views

/// Migration v1: the works table plus store metadata.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS works (
    work_id TEXT PRIMARY KEY,
    title TEXT NOT NULL CHECK (length(trim(title)) > 0),
    work_type TEXT NOT NULL CHECK (work_type IN ('book', 'movie', 'series', 'anime', 'manga')),
    status TEXT NOT NULL CHECK (status IN ('backlog', 'in-progress', 'finished', 'dropped')),
    rating INTEGER CHECK (rating IS NULL OR rating BETWEEN 1 AND 5),
    review TEXT,
    tags_json TEXT NOT NULL DEFAULT '[]'
        CHECK (json_valid(tags_json) AND json_array_length(tags_json) <= 20),
    notes TEXT,
    cover_url TEXT,
    creator TEXT,
    year INTEGER,
    progress_current INTEGER,
    progress_total INTEGER,
    started_at_ms INTEGER,
    finished_at_ms INTEGER,
    created_at_ms INTEGER NOT NULL,
    updated_at_ms INTEGER NOT NULL,
    CHECK ((progress_current IS NULL) = (progress_total IS NULL)),
    CHECK (
        progress_total IS NULL
        OR (progress_total > 0 AND progress_current BETWEEN 0 AND progress_total)
    ),
    CHECK (updated_at_ms >= created_at_ms),
    CHECK (work_id LIKE 'wk-%')
);

CREATE TABLE IF NOT EXISTS store_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL,
    initialized_at_ms INTEGER NOT NULL DEFAULT 0
);

INSERT OR IGNORE INTO store_meta (id, schema_version, initialized_at_ms)
VALUES (1, 1, CAST(strftime('%s', 'now') AS INTEGER) * 1000);
";

/// Migration v2: ordered retrieval indexes for the list paths.
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_works_updated
    ON works(updated_at_ms);

CREATE INDEX IF NOT EXISTS idx_works_status_updated
    ON works(status, updated_at_ms);

CREATE INDEX IF NOT EXISTS idx_works_type_updated
    ON works(work_type, updated_at_ms);
";

/// Indexes the list paths name explicitly with `INDEXED BY`.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_works_updated",
    "idx_works_status_updated",
    "idx_works_type_updated",
];

/// Column list shared by every `SELECT` that materializes a [`crate::model::Work`].
pub const WORK_COLUMNS: &str = "work_id, title, work_type, status, rating, review, tags_json, \
     notes, cover_url, creator, year, progress_current, progress_total, \
     started_at_ms, finished_at_ms, created_at_ms, updated_at_ms";
