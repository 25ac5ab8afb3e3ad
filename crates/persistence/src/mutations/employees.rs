// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee and staff session mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftdesk_domain::EmploymentStatus;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{NewEmployeeData, NewEmployeeRow};
use crate::diesel_schema::{employees, staff_sessions};
use crate::error::PersistenceError;

/// Creates an employee and returns the new id.
///
/// The login name is stored uppercase so lookups are case-insensitive.
/// A password is hashed with bcrypt before it is stored.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the login name exists.
/// Returns an error if hashing or the insert fails.
pub fn create_employee(
    conn: &mut SqliteConnection,
    data: &NewEmployeeData<'_>,
) -> Result<i64, PersistenceError> {
    let password_hash: Option<String> = data
        .password
        .map(|password| bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .transpose()
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let row = NewEmployeeRow {
        full_name: data.full_name,
        role: data.role.as_str(),
        employment_status: EmploymentStatus::Active.as_str(),
        kiosk_pin: data.kiosk_pin,
        login_name: data.login_name.map(str::to_uppercase),
        password_hash,
        created_at: data.created_at,
    };

    diesel::insert_into(employees::table)
        .values(&row)
        .execute(conn)?;
    let employee_id: i64 = conn.last_insert_id()?;

    info!(employee_id, role = data.role.as_str(), "Employee created");
    Ok(employee_id)
}

/// Sets an employee's kiosk PIN.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such employee exists.
pub fn set_kiosk_pin(
    conn: &mut SqliteConnection,
    employee_id: i64,
    pin: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(employees::table)
        .filter(employees::employee_id.eq(employee_id))
        .set(employees::kiosk_pin.eq(pin))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Employee {employee_id} not found"
        )));
    }

    info!(employee_id, "Kiosk PIN updated");
    Ok(())
}

/// Creates a staff session and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    employee_id: i64,
    now: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(staff_sessions::table)
        .values((
            staff_sessions::session_token.eq(session_token),
            staff_sessions::employee_id.eq(employee_id),
            staff_sessions::created_at.eq(now),
            staff_sessions::last_activity_at.eq(now),
            staff_sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;
    let session_id: i64 = conn.last_insert_id()?;

    info!(session_id, employee_id, "Staff session created");
    Ok(session_id)
}

/// Records activity on a session.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
    now: &str,
) -> Result<(), PersistenceError> {
    diesel::update(staff_sessions::table)
        .filter(staff_sessions::session_id.eq(session_id))
        .set(staff_sessions::last_activity_at.eq(now))
        .execute(conn)?;
    Ok(())
}

/// Deletes a session by token. Deleting an unknown token is not an error.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(staff_sessions::table)
        .filter(staff_sessions::session_token.eq(session_token))
        .execute(conn)?;
    debug!(deleted, "Staff session deleted");
    Ok(())
}

/// Deletes every session that expired before `now`, returning the count.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: &str,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(staff_sessions::table)
        .filter(staff_sessions::expires_at.lt(now))
        .execute(conn)?;
    if deleted > 0 {
        info!(deleted, "Expired staff sessions removed");
    }
    Ok(deleted)
}
