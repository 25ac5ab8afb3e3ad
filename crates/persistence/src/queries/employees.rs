// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee and staff session queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftdesk_domain::{Employee, EmploymentStatus};
use tracing::debug;

use crate::data_models::{EmployeeRow, SessionData, SessionRow};
use crate::diesel_schema::{employees, staff_sessions};
use crate::error::PersistenceError;

/// Retrieves an employee by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the employee is not found.
pub fn get_employee(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Option<Employee>, PersistenceError> {
    debug!(employee_id, "Looking up employee");

    employees::table
        .filter(employees::employee_id.eq(employee_id))
        .select(EmployeeRow::as_select())
        .first(conn)
        .optional()?
        .map(Employee::try_from)
        .transpose()
}

/// Retrieves an employee and their password hash by login name.
///
/// The login name is matched case-insensitively by normalizing to uppercase.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no employee has that login.
pub fn get_employee_by_login(
    conn: &mut SqliteConnection,
    login_name: &str,
) -> Result<Option<(Employee, Option<String>)>, PersistenceError> {
    let normalized: String = login_name.to_uppercase();
    debug!(login_name = %normalized, "Looking up employee by login");

    let row: Option<EmployeeRow> = employees::table
        .filter(employees::login_name.eq(&normalized))
        .select(EmployeeRow::as_select())
        .first(conn)
        .optional()?;

    match row {
        Some(row) => {
            let hash: Option<String> = row.password_hash.clone();
            Ok(Some((Employee::try_from(row)?, hash)))
        }
        None => Ok(None),
    }
}

/// Finds the active employee holding a kiosk PIN.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_active_employee_by_pin(
    conn: &mut SqliteConnection,
    pin: &str,
) -> Result<Option<Employee>, PersistenceError> {
    employees::table
        .filter(employees::kiosk_pin.eq(pin))
        .filter(employees::employment_status.eq(EmploymentStatus::Active.as_str()))
        .select(EmployeeRow::as_select())
        .first(conn)
        .optional()?
        .map(Employee::try_from)
        .transpose()
}

/// Returns whether another active employee already uses `pin`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn is_pin_taken(
    conn: &mut SqliteConnection,
    pin: &str,
    excluding_employee_id: i64,
) -> Result<bool, PersistenceError> {
    let count: i64 = employees::table
        .filter(employees::kiosk_pin.eq(pin))
        .filter(employees::employment_status.eq(EmploymentStatus::Active.as_str()))
        .filter(employees::employee_id.ne(excluding_employee_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Lists every employee ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_employees(conn: &mut SqliteConnection) -> Result<Vec<Employee>, PersistenceError> {
    employees::table
        .order((employees::full_name.asc(), employees::employee_id.asc()))
        .select(EmployeeRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Employee::try_from)
        .collect()
}

/// Counts all employees.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_employees(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(employees::table.count().get_result(conn)?)
}

/// Retrieves a staff session by token.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session does not exist.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    Ok(staff_sessions::table
        .filter(staff_sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?
        .map(SessionData::from))
}

/// Checks a password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns an error if the hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
}
