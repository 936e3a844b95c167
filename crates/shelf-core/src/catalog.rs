//! The store handle most callers use.
//!
//! A [`Catalog`] owns one SQLite connection and one [`Clock`]. Opening it
//! is the process-start initialization step: pragmas are applied and the
//! schema migrated before the first operation.

use anyhow::Result as AnyResult;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::path::Path;

use crate::clock::{Clock, SystemClock};
use crate::db::{self, mutate, query};
use crate::error::Result;
use crate::model::{NewWork, Work, WorkId, WorkPatch, WorkStatus, WorkType};

pub use crate::db::query::{DEFAULT_LIST_LIMIT, IndexPath, WorkFilter};

pub struct Catalog {
    conn: Connection,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog").finish_non_exhaustive()
    }
}

impl Catalog {
    /// Open (or create) the store file at `path` with the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, configured or migrated.
    pub fn open(path: &Path) -> AnyResult<Self> {
        let conn = db::open_store(path)?;
        tracing::debug!(path = %path.display(), "opened catalog");
        Ok(Self::from_connection(conn))
    }

    /// A private in-memory catalog, mostly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be applied.
    pub fn open_in_memory() -> AnyResult<Self> {
        Ok(Self::from_connection(db::open_in_memory()?))
    }

    /// Wrap an already-migrated connection.
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used for `created_at` / `updated_at`.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Insert a new work and return its id.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` on any broken invariant, otherwise a storage error.
    pub fn create(&mut self, new: &NewWork) -> Result<WorkId> {
        mutate::create_work(&mut self.conn, self.clock.as_ref(), new)
    }

    /// Apply a sparse patch and return the stored work.
    ///
    /// # Errors
    ///
    /// `InvalidArgument`, `NotFound`, or a storage error.
    pub fn update(&mut self, id: &WorkId, patch: &WorkPatch) -> Result<Work> {
        mutate::update_work(&mut self.conn, self.clock.as_ref(), id, patch)
    }

    /// Delete a work if present. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error only.
    pub fn remove(&mut self, id: &WorkId) -> Result<bool> {
        mutate::remove_work(&mut self.conn, id)
    }

    /// # Errors
    ///
    /// Returns a storage error only; a missing id is `Ok(None)`.
    pub fn get(&self, id: &WorkId) -> Result<Option<Work>> {
        query::get_work(&self.conn, id)
    }

    /// Most recently updated works first, capped at `limit`
    /// (default [`DEFAULT_LIST_LIMIT`]).
    ///
    /// # Errors
    ///
    /// Returns a storage error only.
    pub fn list(&self, filter: &WorkFilter, limit: Option<u32>) -> Result<Vec<Work>> {
        query::list_works(&self.conn, filter, limit)
    }

    /// # Errors
    ///
    /// Returns a storage error only.
    pub fn count(&self, filter: &WorkFilter) -> Result<u64> {
        query::count_works(&self.conn, filter)
    }

    /// # Errors
    ///
    /// Returns a storage error only.
    pub fn counts_by_status(&self) -> Result<BTreeMap<WorkStatus, usize>> {
        query::counts_by_status(&self.conn)
    }

    /// # Errors
    ///
    /// Returns a storage error only.
    pub fn counts_by_type(&self) -> Result<BTreeMap<WorkType, usize>> {
        query::counts_by_type(&self.conn)
    }
}
