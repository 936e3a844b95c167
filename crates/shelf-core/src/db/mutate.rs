//! Write paths over the works table.
//!
//! Each mutation validates its input first, then runs inside a single
//! SQLite transaction. A validation failure never opens the transaction,
//! and a storage failure rolls the whole write back.

use rusqlite::{Connection, Transaction, TransactionBehavior, params};

use super::query::{get_work, work_exists};
use crate::clock::Clock;
use crate::error::{CatalogError, Result};
use crate::model::{NewWork, Work, WorkId, WorkPatch};
use crate::validate::{validate_new_work, validate_patch};

/// Insert a new work and return its freshly assigned id.
///
/// `created_at` and `updated_at` are both set to the clock's current
/// reading. Tags default to empty. The id collision check and the insert share one
/// `BEGIN IMMEDIATE` transaction.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidArgument`] if any field breaks an
/// invariant (nothing is written), or a storage error if the insert fails.
pub fn create_work(conn: &mut Connection, clock: &dyn Clock, new: &NewWork) -> Result<WorkId> {
    let valid = validate_new_work(new)?;
    let now = clock.now_ms();

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let id = fresh_id(&tx, now, &valid.title)?;
    let tags_json = serde_json::to_string(&valid.tags)?;

    tx.execute(
        "INSERT INTO works (
            work_id, title, work_type, status, rating, review, tags_json,
            notes, cover_url, creator, year, progress_current, progress_total,
            started_at_ms, finished_at_ms, created_at_ms, updated_at_ms
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?16)",
        params![
            id.as_str(),
            valid.title,
            valid.work_type.as_str(),
            valid.status.as_str(),
            valid.rating,
            valid.review,
            tags_json,
            valid.notes,
            valid.cover_url,
            valid.creator,
            valid.year,
            valid.progress.map(|p| p.current),
            valid.progress.map(|p| p.total),
            valid.started_at,
            valid.finished_at,
            now,
        ],
    )?;
    tx.commit()?;

    tracing::info!(work_id = %id, work_type = %valid.work_type, status = %valid.status, "created work");
    Ok(id)
}

/// Apply a sparse patch to an existing work and return the stored result.
///
/// Only patched fields change. `updated_at` moves to the clock's reading,
/// or stays put if the clock is behind the stored value. The read and the
/// write share one `BEGIN IMMEDIATE` transaction, so a concurrent writer
/// cannot slip in between them.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidArgument`] for a patch that breaks an
/// invariant, [`CatalogError::NotFound`] when `id` does not resolve, or a
/// storage error. Nothing is written in any of these cases.
pub fn update_work(
    conn: &mut Connection,
    clock: &dyn Clock,
    id: &WorkId,
    patch: &WorkPatch,
) -> Result<Work> {
    let valid = validate_patch(patch)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let Some(mut work) = get_work(&tx, id)? else {
        return Err(CatalogError::NotFound(id.clone()));
    };

    valid.apply_to(&mut work);
    work.updated_at = clock.now_ms().max(work.updated_at);
    let tags_json = serde_json::to_string(&work.tags)?;

    tx.execute(
        "UPDATE works SET
            title = ?2, work_type = ?3, status = ?4, rating = ?5, review = ?6,
            tags_json = ?7, notes = ?8, cover_url = ?9, creator = ?10, year = ?11,
            progress_current = ?12, progress_total = ?13,
            started_at_ms = ?14, finished_at_ms = ?15, updated_at_ms = ?16
         WHERE work_id = ?1",
        params![
            work.id.as_str(),
            work.title,
            work.work_type.as_str(),
            work.status.as_str(),
            work.rating,
            work.review,
            tags_json,
            work.notes,
            work.cover_url,
            work.creator,
            work.year,
            work.progress.map(|p| p.current),
            work.progress.map(|p| p.total),
            work.started_at,
            work.finished_at,
            work.updated_at,
        ],
    )?;
    tx.commit()?;

    tracing::info!(work_id = %work.id, status = %work.status, "updated work");
    Ok(work)
}

/// Delete a work. Deleting a missing id is a silent no-op.
///
/// Returns whether a row was actually removed.
///
/// # Errors
///
/// Returns a storage error if the delete fails.
pub fn remove_work(conn: &mut Connection, id: &WorkId) -> Result<bool> {
    let tx = conn.transaction()?;
    let deleted = tx.execute("DELETE FROM works WHERE work_id = ?1", params![id.as_str()])?;
    tx.commit()?;

    if deleted > 0 {
        tracing::info!(work_id = %id, "removed work");
    } else {
        tracing::debug!(work_id = %id, "remove: no such work");
    }
    Ok(deleted > 0)
}

/// Draw nonces until the derived id is unused.
fn fresh_id(tx: &Transaction<'_>, now: i64, title: &str) -> Result<WorkId> {
    loop {
        let id = WorkId::generate(now, title, rand::random::<u64>());
        if !work_exists(tx, &id)? {
            return Ok(id);
        }
        tracing::debug!(work_id = %id, "id collision, drawing a new nonce");
    }
}
