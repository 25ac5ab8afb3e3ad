// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Clock record, break and survey queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftdesk_domain::{BreakInterval, ClockRecord};

use crate::data_models::{BreakRow, ClockRecordFilter, ClockRecordRow, SurveyData};
use crate::diesel_schema::{clock_breaks, clock_in_out, shift_survey_responses};
use crate::error::PersistenceError;

/// Retrieves the employee's open clock record, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn open_clock_record(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Option<ClockRecord>, PersistenceError> {
    clock_in_out::table
        .filter(clock_in_out::employee_id.eq(employee_id))
        .filter(clock_in_out::clock_out_time.is_null())
        .order(clock_in_out::clock_in_time.desc())
        .select(ClockRecordRow::as_select())
        .first(conn)
        .optional()?
        .map(ClockRecord::try_from)
        .transpose()
}

/// Retrieves a clock record by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_clock_record(
    conn: &mut SqliteConnection,
    clock_record_id: i64,
) -> Result<Option<ClockRecord>, PersistenceError> {
    clock_in_out::table
        .filter(clock_in_out::clock_record_id.eq(clock_record_id))
        .select(ClockRecordRow::as_select())
        .first(conn)
        .optional()?
        .map(ClockRecord::try_from)
        .transpose()
}

/// Retrieves the open break of a clock record, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn open_break(
    conn: &mut SqliteConnection,
    clock_record_id: i64,
) -> Result<Option<BreakInterval>, PersistenceError> {
    clock_breaks::table
        .filter(clock_breaks::clock_record_id.eq(clock_record_id))
        .filter(clock_breaks::end_time.is_null())
        .select(BreakRow::as_select())
        .first(conn)
        .optional()?
        .map(BreakInterval::try_from)
        .transpose()
}

/// Lists every break of a clock record in start order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_breaks(
    conn: &mut SqliteConnection,
    clock_record_id: i64,
) -> Result<Vec<BreakInterval>, PersistenceError> {
    clock_breaks::table
        .filter(clock_breaks::clock_record_id.eq(clock_record_id))
        .order((clock_breaks::start_time.asc(), clock_breaks::break_id.asc()))
        .select(BreakRow::as_select())
        .load(conn)?
        .into_iter()
        .map(BreakInterval::try_from)
        .collect()
}

/// Lists clock records, newest clock-in first.
///
/// Clock-in instants are stored as RFC 3339 UTC text, so a date bound is a
/// text prefix comparison: the end bound is exclusive of the following day.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_clock_records(
    conn: &mut SqliteConnection,
    filter: &ClockRecordFilter,
) -> Result<Vec<ClockRecord>, PersistenceError> {
    let mut query = clock_in_out::table
        .select(ClockRecordRow::as_select())
        .into_boxed();

    if let Some(employee_id) = filter.employee_id {
        query = query.filter(clock_in_out::employee_id.eq(employee_id));
    }
    if let Some(start) = filter.start_date {
        query = query.filter(clock_in_out::clock_in_time.ge(start.to_string()));
    }
    if let Some(end) = filter.end_date {
        let day_after: String = end.add_days(1)?.to_string();
        query = query.filter(clock_in_out::clock_in_time.lt(day_after));
    }

    query
        .order((
            clock_in_out::clock_in_time.desc(),
            clock_in_out::clock_record_id.desc(),
        ))
        .load(conn)?
        .into_iter()
        .map(ClockRecord::try_from)
        .collect()
}

/// Retrieves the survey submitted for a clock record, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn survey_for_clock_record(
    conn: &mut SqliteConnection,
    clock_record_id: i64,
) -> Result<Option<SurveyData>, PersistenceError> {
    Ok(shift_survey_responses::table
        .filter(shift_survey_responses::clock_record_id.eq(clock_record_id))
        .select(SurveyData::as_select())
        .first(conn)
        .optional()?)
}
