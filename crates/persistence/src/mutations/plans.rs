// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule plan mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftdesk_domain::PlanStatus;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{NewPlanData, NewPlanRow, PlanChanges, PlanChangeset};
use crate::diesel_schema::schedule_plans;
use crate::error::PersistenceError;

/// Inserts a draft plan and returns the new id.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the week already has a
/// plan with this version.
pub fn insert_plan(
    conn: &mut SqliteConnection,
    data: &NewPlanData,
    now: &str,
) -> Result<i64, PersistenceError> {
    let row = NewPlanRow {
        week_start_date: data.week_start_date.to_string(),
        status: PlanStatus::Draft.as_str(),
        version: data.version,
        created_by: data.created_by,
        copied_from_plan_id: data.copied_from_plan_id,
        notes: data.notes.as_deref(),
        created_at: now,
        updated_at: now,
    };

    diesel::insert_into(schedule_plans::table)
        .values(&row)
        .execute(conn)?;
    let plan_id: i64 = conn.last_insert_id()?;

    info!(
        plan_id,
        week_start_date = %data.week_start_date,
        version = data.version,
        "Schedule plan created"
    );
    Ok(plan_id)
}

/// Applies status and notes changes to a plan.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the plan does not exist.
pub fn update_plan(
    conn: &mut SqliteConnection,
    plan_id: i64,
    changes: &PlanChanges,
    now: &str,
) -> Result<(), PersistenceError> {
    let changeset = PlanChangeset {
        status: changes.status.as_ref().map(PlanStatus::as_str),
        notes: changes.notes.as_ref().map(Option::as_deref),
        updated_at: now,
    };

    let updated: usize = diesel::update(schedule_plans::table)
        .filter(schedule_plans::plan_id.eq(plan_id))
        .set(&changeset)
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Plan {plan_id} not found"
        )));
    }

    info!(plan_id, "Schedule plan updated");
    Ok(())
}

/// Refreshes a plan's `updated_at`.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn touch_plan(
    conn: &mut SqliteConnection,
    plan_id: i64,
    now: &str,
) -> Result<(), PersistenceError> {
    diesel::update(schedule_plans::table)
        .filter(schedule_plans::plan_id.eq(plan_id))
        .set(schedule_plans::updated_at.eq(now))
        .execute(conn)?;
    Ok(())
}

/// Deletes a plan together with its shifts.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the plan does not exist.
pub fn delete_plan(conn: &mut SqliteConnection, plan_id: i64) -> Result<usize, PersistenceError> {
    let removed_shifts: usize = conn.transaction::<_, PersistenceError, _>(|conn| {
        let removed: usize = super::shifts::delete_all_plan_shifts(conn, plan_id)?;
        let deleted: usize = diesel::delete(schedule_plans::table)
            .filter(schedule_plans::plan_id.eq(plan_id))
            .execute(conn)?;
        if deleted == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Plan {plan_id} not found"
            )));
        }
        Ok(removed)
    })?;

    info!(plan_id, removed_shifts, "Schedule plan deleted");
    Ok(removed_shifts)
}
