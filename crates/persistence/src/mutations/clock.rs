// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Clock record, break and survey mutations.
//!
//! The partial unique indexes on open records and open breaks reject a
//! second open row, and the survey index rejects a second survey for one
//! record. Both surface as `PersistenceError::UniqueViolation`.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftdesk::ClockEffect;
use shiftdesk_domain::format_timestamp;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{NewBreakRow, NewClockRecordRow, NewSurveyData};
use crate::diesel_schema::{clock_breaks, clock_in_out, shift_survey_responses};
use crate::error::PersistenceError;

/// Opens a clock record and returns its id.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the employee already has
/// an open record.
pub fn insert_clock_record(
    conn: &mut SqliteConnection,
    employee_id: i64,
    shift_id: Option<i64>,
    at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let stamp: String = format_timestamp(at)?;
    let row = NewClockRecordRow {
        employee_id,
        shift_id,
        clock_in_time: &stamp,
        created_at: &stamp,
        updated_at: &stamp,
    };

    diesel::insert_into(clock_in_out::table)
        .values(&row)
        .execute(conn)?;
    let clock_record_id: i64 = conn.last_insert_id()?;

    info!(clock_record_id, employee_id, "Clocked in");
    Ok(clock_record_id)
}

/// Opens a break on a clock record and returns its id.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the record already has an
/// open break.
pub fn insert_break(
    conn: &mut SqliteConnection,
    clock_record_id: i64,
    at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let stamp: String = format_timestamp(at)?;
    diesel::insert_into(clock_breaks::table)
        .values(&NewBreakRow {
            clock_record_id,
            start_time: &stamp,
        })
        .execute(conn)?;
    let break_id: i64 = conn.last_insert_id()?;

    debug!(break_id, clock_record_id, "Break started");
    Ok(break_id)
}

/// Closes an open break.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the break is missing or closed.
pub fn close_break(
    conn: &mut SqliteConnection,
    break_id: i64,
    at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let stamp: String = format_timestamp(at)?;
    let updated: usize = diesel::update(clock_breaks::table)
        .filter(clock_breaks::break_id.eq(break_id))
        .filter(clock_breaks::end_time.is_null())
        .set(clock_breaks::end_time.eq(&stamp))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Open break {break_id} not found"
        )));
    }

    debug!(break_id, "Break ended");
    Ok(())
}

/// Closes an employee's open clock record.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the record is missing, closed or
/// owned by another employee.
pub fn close_clock_record(
    conn: &mut SqliteConnection,
    employee_id: i64,
    clock_record_id: i64,
    at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let stamp: String = format_timestamp(at)?;
    let updated: usize = diesel::update(clock_in_out::table)
        .filter(clock_in_out::clock_record_id.eq(clock_record_id))
        .filter(clock_in_out::employee_id.eq(employee_id))
        .filter(clock_in_out::clock_out_time.is_null())
        .set((
            clock_in_out::clock_out_time.eq(&stamp),
            clock_in_out::updated_at.eq(&stamp),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Open clock record {clock_record_id} not found"
        )));
    }

    info!(clock_record_id, employee_id, "Clocked out");
    Ok(())
}

/// Applies a clock transition's effects in one transaction.
///
/// Returns the id of the clock record the effects touched; for a clock-in
/// that is the newly created record.
///
/// # Errors
///
/// Returns an error if any effect fails; nothing is written in that case.
pub fn apply_clock_effects(
    conn: &mut SqliteConnection,
    employee_id: i64,
    effects: &[ClockEffect],
) -> Result<Option<i64>, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let mut touched: Option<i64> = None;
        for effect in effects {
            match *effect {
                ClockEffect::OpenRecord { shift_id, at } => {
                    touched = Some(insert_clock_record(conn, employee_id, shift_id, at)?);
                }
                ClockEffect::OpenBreak {
                    clock_record_id,
                    at,
                } => {
                    insert_break(conn, clock_record_id, at)?;
                    touched = Some(clock_record_id);
                }
                ClockEffect::CloseBreak { break_id, at } => {
                    close_break(conn, break_id, at)?;
                }
                ClockEffect::CloseRecord {
                    clock_record_id,
                    at,
                } => {
                    close_clock_record(conn, employee_id, clock_record_id, at)?;
                    touched = Some(clock_record_id);
                }
            }
        }
        Ok(touched)
    })
}

/// Stores a post-clock-out survey and returns its id.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the record already has a
/// survey, or `ForeignKeyViolation` for an unknown record or employee.
pub fn insert_survey(
    conn: &mut SqliteConnection,
    data: &NewSurveyData<'_>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(shift_survey_responses::table)
        .values(data)
        .execute(conn)?;
    let survey_id: i64 = conn.last_insert_id()?;

    info!(
        survey_id,
        clock_record_id = data.clock_record_id,
        rating = data.rating,
        "Shift survey stored"
    );
    Ok(survey_id)
}
