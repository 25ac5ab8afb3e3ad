// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule plan queries.

use diesel::dsl::max;
use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftdesk_domain::{SchedulePlan, ShiftDate};

use crate::data_models::PlanRow;
use crate::diesel_schema::schedule_plans;
use crate::error::PersistenceError;

/// Retrieves a plan by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the plan is not found.
pub fn get_plan(
    conn: &mut SqliteConnection,
    plan_id: i64,
) -> Result<Option<SchedulePlan>, PersistenceError> {
    schedule_plans::table
        .filter(schedule_plans::plan_id.eq(plan_id))
        .select(PlanRow::as_select())
        .first(conn)
        .optional()?
        .map(SchedulePlan::try_from)
        .transpose()
}

/// Retrieves the highest-version plan for a week.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn latest_plan_for_week(
    conn: &mut SqliteConnection,
    week_start_date: ShiftDate,
) -> Result<Option<SchedulePlan>, PersistenceError> {
    schedule_plans::table
        .filter(schedule_plans::week_start_date.eq(week_start_date.to_string()))
        .order(schedule_plans::version.desc())
        .select(PlanRow::as_select())
        .first(conn)
        .optional()?
        .map(SchedulePlan::try_from)
        .transpose()
}

/// Returns the highest version stored for a week, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn max_plan_version(
    conn: &mut SqliteConnection,
    week_start_date: ShiftDate,
) -> Result<Option<i32>, PersistenceError> {
    Ok(schedule_plans::table
        .filter(schedule_plans::week_start_date.eq(week_start_date.to_string()))
        .select(max(schedule_plans::version))
        .first::<Option<i32>>(conn)?)
}

/// Counts the plans of any version for a week.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_plans_for_week(
    conn: &mut SqliteConnection,
    week_start_date: ShiftDate,
) -> Result<i64, PersistenceError> {
    Ok(schedule_plans::table
        .filter(schedule_plans::week_start_date.eq(week_start_date.to_string()))
        .count()
        .get_result(conn)?)
}
