// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift queries. Lists are ordered by date, then start time.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftdesk_domain::{Shift, ShiftDate};

use crate::data_models::{ShiftFilter, ShiftRow};
use crate::diesel_schema::shifts;
use crate::error::PersistenceError;

/// Retrieves a shift by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the shift is not found.
pub fn get_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> Result<Option<Shift>, PersistenceError> {
    shifts::table
        .filter(shifts::shift_id.eq(shift_id))
        .select(ShiftRow::as_select())
        .first(conn)
        .optional()?
        .map(Shift::try_from)
        .transpose()
}

/// Lists shifts matching every set field of `filter`.
///
/// Dates are stored as `YYYY-MM-DD`, so text comparison orders them.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_shifts(
    conn: &mut SqliteConnection,
    filter: &ShiftFilter,
) -> Result<Vec<Shift>, PersistenceError> {
    let mut query = shifts::table.select(ShiftRow::as_select()).into_boxed();

    if let Some(employee_id) = filter.employee_id {
        query = query.filter(shifts::employee_id.eq(employee_id));
    }
    if let Some(start) = filter.start_date {
        query = query.filter(shifts::date.ge(start.to_string()));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(shifts::date.le(end.to_string()));
    }
    if let Some(status) = filter.status {
        query = query.filter(shifts::status.eq(status.as_str()));
    }
    if let Some(plan_id) = filter.schedule_plan_id {
        query = query.filter(shifts::schedule_plan_id.eq(plan_id));
    }

    query
        .order((
            shifts::date.asc(),
            shifts::start_time.asc(),
            shifts::shift_id.asc(),
        ))
        .load(conn)?
        .into_iter()
        .map(Shift::try_from)
        .collect()
}

/// Lists one employee's shifts on one date.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_employee_shifts_on(
    conn: &mut SqliteConnection,
    employee_id: i64,
    date: ShiftDate,
) -> Result<Vec<Shift>, PersistenceError> {
    list_shifts(
        conn,
        &ShiftFilter {
            employee_id: Some(employee_id),
            start_date: Some(date),
            end_date: Some(date),
            ..ShiftFilter::default()
        },
    )
}

/// Lists the shifts owned by a plan.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_plan_shifts(
    conn: &mut SqliteConnection,
    plan_id: i64,
) -> Result<Vec<Shift>, PersistenceError> {
    list_shifts(
        conn,
        &ShiftFilter {
            schedule_plan_id: Some(plan_id),
            ..ShiftFilter::default()
        },
    )
}
