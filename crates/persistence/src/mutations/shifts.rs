// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftdesk_domain::{ShiftChanges, ShiftDraft};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{NewShiftRow, ShiftChangeset};
use crate::diesel_schema::shifts;
use crate::error::PersistenceError;

/// Inserts a shift and returns the new id.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyViolation` if the employee or plan
/// does not exist.
pub fn insert_shift(
    conn: &mut SqliteConnection,
    draft: &ShiftDraft,
    now: &str,
) -> Result<i64, PersistenceError> {
    let row: NewShiftRow<'_> = NewShiftRow::from_draft(draft, now)?;
    diesel::insert_into(shifts::table)
        .values(&row)
        .execute(conn)?;
    let shift_id: i64 = conn.last_insert_id()?;

    debug!(
        shift_id,
        employee_id = draft.employee_id,
        date = %draft.date,
        "Shift inserted"
    );
    Ok(shift_id)
}

/// Inserts several shifts in one transaction, returning ids in input order.
///
/// # Errors
///
/// Returns an error if any insert fails; nothing is written in that case.
pub fn insert_shifts(
    conn: &mut SqliteConnection,
    drafts: &[ShiftDraft],
    now: &str,
) -> Result<Vec<i64>, PersistenceError> {
    let ids: Vec<i64> = conn.transaction::<_, PersistenceError, _>(|conn| {
        drafts
            .iter()
            .map(|draft| insert_shift(conn, draft, now))
            .collect()
    })?;

    info!(count = ids.len(), "Shifts inserted");
    Ok(ids)
}

/// Applies changes to a shift.
///
/// `updated_at` is always refreshed. When `plan_id` is given, only a shift
/// owned by that plan is touched.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no matching shift exists.
pub fn update_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
    plan_id: Option<i64>,
    changes: &ShiftChanges,
    now: &str,
) -> Result<(), PersistenceError> {
    let changeset: ShiftChangeset<'_> = ShiftChangeset::from_changes(changes, now)?;

    let updated: usize = match plan_id {
        Some(plan_id) => diesel::update(shifts::table)
            .filter(shifts::shift_id.eq(shift_id))
            .filter(shifts::schedule_plan_id.eq(plan_id))
            .set(&changeset)
            .execute(conn)?,
        None => diesel::update(shifts::table)
            .filter(shifts::shift_id.eq(shift_id))
            .set(&changeset)
            .execute(conn)?,
    };

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Shift {shift_id} not found"
        )));
    }

    debug!(shift_id, "Shift updated");
    Ok(())
}

/// Deletes a shift.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the shift does not exist.
pub fn delete_shift(conn: &mut SqliteConnection, shift_id: i64) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(shifts::table)
        .filter(shifts::shift_id.eq(shift_id))
        .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Shift {shift_id} not found"
        )));
    }

    info!(shift_id, "Shift deleted");
    Ok(())
}

/// Deletes the listed shifts that belong to a plan, returning the count.
///
/// Ids owned by other plans are left alone.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_plan_shifts(
    conn: &mut SqliteConnection,
    plan_id: i64,
    shift_ids: &[i64],
) -> Result<usize, PersistenceError> {
    if shift_ids.is_empty() {
        return Ok(0);
    }

    let deleted: usize = diesel::delete(shifts::table)
        .filter(shifts::schedule_plan_id.eq(plan_id))
        .filter(shifts::shift_id.eq_any(shift_ids))
        .execute(conn)?;

    debug!(plan_id, deleted, "Plan shifts deleted");
    Ok(deleted)
}

/// Deletes every shift owned by a plan, returning the count.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_all_plan_shifts(
    conn: &mut SqliteConnection,
    plan_id: i64,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(shifts::table)
        .filter(shifts::schedule_plan_id.eq(plan_id))
        .execute(conn)?;
    debug!(plan_id, deleted, "All plan shifts deleted");
    Ok(deleted)
}
