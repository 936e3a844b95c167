use std::fmt;

use crate::model::WorkId;

/// Machine-readable error codes for scripts and front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    InvalidArgument,
    WorkNotFound,
    InvalidEnumValue,
    CorruptStore,
    StoreBusy,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InvalidArgument => "E2001",
            Self::WorkNotFound => "E2002",
            Self::InvalidEnumValue => "E2003",
            Self::CorruptStore => "E3001",
            Self::StoreBusy => "E3002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Shelf not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidArgument => "Invalid argument",
            Self::WorkNotFound => "Work not found",
            Self::InvalidEnumValue => "Invalid type/status value",
            Self::CorruptStore => "Corrupt SQLite store",
            Self::StoreBusy => "SQLite store is busy",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to the user.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `shelf init` to create a shelf in this directory."),
            Self::ConfigParseError => Some("Fix syntax in .shelf/config.toml and retry."),
            Self::InvalidArgument => {
                Some("Ratings are 1-5; progress needs total > 0 and 0 <= current <= total.")
            }
            Self::WorkNotFound => Some("Use `shelf list` to find a valid work id."),
            Self::InvalidEnumValue => Some(
                "Types: book, movie, series, anime, manga. Statuses: backlog, in-progress, finished, dropped.",
            ),
            Self::CorruptStore => Some("Move the broken .shelf/shelf.sqlite3 aside and run `shelf init`."),
            Self::StoreBusy => Some("Another shelf command is writing; retry in a moment."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors surfaced by the catalog's mutation and query operations.
///
/// Nothing is retried internally; every variant is recoverable at the
/// caller's discretion.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A field value violates a work invariant, or enum text did not parse.
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// `update` targeted an id that does not resolve to a stored work.
    #[error("work not found: {0}")]
    NotFound(WorkId),

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),

    #[error("tag column encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument { field, .. } => {
                if matches!(*field, "type" | "status") {
                    ErrorCode::InvalidEnumValue
                } else {
                    ErrorCode::InvalidArgument
                }
            }
            Self::NotFound(_) => ErrorCode::WorkNotFound,
            Self::Storage(e) => storage_code(e),
            Self::Encoding(_) => ErrorCode::InternalUnexpected,
        }
    }

    /// Returns `true` for the `InvalidArgument` kind.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Returns `true` for the `NotFound` kind.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Classify a SQLite failure. Only lock contention is retryable and only
/// a damaged file is reported as corrupt.
#[must_use]
pub fn storage_code(err: &rusqlite::Error) -> ErrorCode {
    use rusqlite::ErrorCode as Sqlite;

    match err.sqlite_error_code() {
        Some(Sqlite::DatabaseBusy | Sqlite::DatabaseLocked) => ErrorCode::StoreBusy,
        Some(Sqlite::DatabaseCorrupt | Sqlite::NotADatabase) => ErrorCode::CorruptStore,
        _ => ErrorCode::InternalUnexpected,
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
