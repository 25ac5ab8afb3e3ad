// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for `ShiftDesk`.
//!
//! Stores employees, staff sessions, shifts, schedule plans, clock records
//! and breaks in `SQLite` through Diesel. The schema is applied from the
//! embedded migrations whenever a database is opened.
//!
//! ## Storage format
//!
//! - Dates are `YYYY-MM-DD` text and wall-clock times are `HH:MM[:SS]` text,
//!   so ordering by the column orders chronologically.
//! - Instants are RFC 3339 UTC text truncated to whole seconds.
//! - Only one clock record per employee and one break per clock record may
//!   be open; partial unique indexes enforce it.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory` gives every caller its own shared-cache
//! in-memory database, so tests never see each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use shiftdesk::ClockEffect;
use shiftdesk_domain::{
    BreakInterval, ClockRecord, Employee, SchedulePlan, Shift, ShiftChanges, ShiftDate,
    ShiftDraft,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    ClockRecordFilter, NewEmployeeData, NewPlanData, NewSurveyData, PlanChanges, SessionData,
    ShiftFilter, SurveyData,
};
pub use error::PersistenceError;

/// Source of unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// The `SQLite` store behind the service.
///
/// Methods take `&mut self`; callers share one instance behind a lock.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Opens a fresh in-memory database with the schema applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Opens (or creates) a database file with the schema applied.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Employees and sessions
    // ========================================================================

    /// Creates an employee and returns the new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the login name is taken or the insert fails.
    pub fn create_employee(&mut self, data: &NewEmployeeData<'_>) -> Result<i64, PersistenceError> {
        mutations::employees::create_employee(&mut self.conn, data)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_employee(&mut self, employee_id: i64) -> Result<Option<Employee>, PersistenceError> {
        queries::employees::get_employee(&mut self.conn, employee_id)
    }

    /// Looks up an employee by login name, with the stored password hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_employee_by_login(
        &mut self,
        login_name: &str,
    ) -> Result<Option<(Employee, Option<String>)>, PersistenceError> {
        queries::employees::get_employee_by_login(&mut self.conn, login_name)
    }

    /// Finds the active employee holding a kiosk PIN.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_active_employee_by_pin(
        &mut self,
        pin: &str,
    ) -> Result<Option<Employee>, PersistenceError> {
        queries::employees::find_active_employee_by_pin(&mut self.conn, pin)
    }

    /// Whether another active employee already holds `pin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn is_pin_taken(
        &mut self,
        pin: &str,
        excluding_employee_id: i64,
    ) -> Result<bool, PersistenceError> {
        queries::employees::is_pin_taken(&mut self.conn, pin, excluding_employee_id)
    }

    /// # Errors
    ///
    /// Returns an error if the employee does not exist or the update fails.
    pub fn set_kiosk_pin(&mut self, employee_id: i64, pin: &str) -> Result<(), PersistenceError> {
        mutations::employees::set_kiosk_pin(&mut self.conn, employee_id, pin)
    }

    /// Lists employees ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_employees(&mut self) -> Result<Vec<Employee>, PersistenceError> {
        queries::employees::list_employees(&mut self.conn)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_employees(&mut self) -> Result<i64, PersistenceError> {
        queries::employees::count_employees(&mut self.conn)
    }

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        employee_id: i64,
        now: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::employees::create_session(
            &mut self.conn,
            session_token,
            employee_id,
            now,
            expires_at,
        )
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::employees::get_session_by_token(&mut self.conn, session_token)
    }

    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(
        &mut self,
        session_id: i64,
        now: &str,
    ) -> Result<(), PersistenceError> {
        mutations::employees::update_session_activity(&mut self.conn, session_id, now)
    }

    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::employees::delete_session(&mut self.conn, session_token)
    }

    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::employees::delete_expired_sessions(&mut self.conn, now)
    }

    /// Checks a password against a stored bcrypt hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is malformed.
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
        queries::employees::verify_password(password, password_hash)
    }

    // ========================================================================
    // Shifts
    // ========================================================================

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_shift(&mut self, shift_id: i64) -> Result<Option<Shift>, PersistenceError> {
        queries::shifts::get_shift(&mut self.conn, shift_id)
    }

    /// Lists shifts ordered by date, then start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_shifts(&mut self, filter: &ShiftFilter) -> Result<Vec<Shift>, PersistenceError> {
        queries::shifts::list_shifts(&mut self.conn, filter)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_employee_shifts_on(
        &mut self,
        employee_id: i64,
        date: ShiftDate,
    ) -> Result<Vec<Shift>, PersistenceError> {
        queries::shifts::list_employee_shifts_on(&mut self.conn, employee_id, date)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_plan_shifts(&mut self, plan_id: i64) -> Result<Vec<Shift>, PersistenceError> {
        queries::shifts::list_plan_shifts(&mut self.conn, plan_id)
    }

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_shift(&mut self, draft: &ShiftDraft, now: &str) -> Result<i64, PersistenceError> {
        mutations::shifts::insert_shift(&mut self.conn, draft, now)
    }

    /// Inserts shifts atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails.
    pub fn insert_shifts(
        &mut self,
        drafts: &[ShiftDraft],
        now: &str,
    ) -> Result<Vec<i64>, PersistenceError> {
        mutations::shifts::insert_shifts(&mut self.conn, drafts, now)
    }

    /// # Errors
    ///
    /// Returns an error if the shift does not exist or the update fails.
    pub fn update_shift(
        &mut self,
        shift_id: i64,
        changes: &ShiftChanges,
        now: &str,
    ) -> Result<(), PersistenceError> {
        mutations::shifts::update_shift(&mut self.conn, shift_id, None, changes, now)
    }

    /// Updates a shift only if `plan_id` owns it.
    ///
    /// # Errors
    ///
    /// Returns an error if no such shift belongs to the plan.
    pub fn update_plan_shift(
        &mut self,
        plan_id: i64,
        shift_id: i64,
        changes: &ShiftChanges,
        now: &str,
    ) -> Result<(), PersistenceError> {
        mutations::shifts::update_shift(&mut self.conn, shift_id, Some(plan_id), changes, now)
    }

    /// # Errors
    ///
    /// Returns an error if the shift does not exist or the delete fails.
    pub fn delete_shift(&mut self, shift_id: i64) -> Result<(), PersistenceError> {
        mutations::shifts::delete_shift(&mut self.conn, shift_id)
    }

    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_plan_shifts(
        &mut self,
        plan_id: i64,
        shift_ids: &[i64],
    ) -> Result<usize, PersistenceError> {
        mutations::shifts::delete_plan_shifts(&mut self.conn, plan_id, shift_ids)
    }

    // ========================================================================
    // Schedule plans
    // ========================================================================

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_plan(&mut self, plan_id: i64) -> Result<Option<SchedulePlan>, PersistenceError> {
        queries::plans::get_plan(&mut self.conn, plan_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn latest_plan_for_week(
        &mut self,
        week_start_date: ShiftDate,
    ) -> Result<Option<SchedulePlan>, PersistenceError> {
        queries::plans::latest_plan_for_week(&mut self.conn, week_start_date)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn max_plan_version(
        &mut self,
        week_start_date: ShiftDate,
    ) -> Result<Option<i32>, PersistenceError> {
        queries::plans::max_plan_version(&mut self.conn, week_start_date)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_plans_for_week(
        &mut self,
        week_start_date: ShiftDate,
    ) -> Result<i64, PersistenceError> {
        queries::plans::count_plans_for_week(&mut self.conn, week_start_date)
    }

    /// # Errors
    ///
    /// Returns an error if the version is taken or the insert fails.
    pub fn insert_plan(&mut self, data: &NewPlanData, now: &str) -> Result<i64, PersistenceError> {
        mutations::plans::insert_plan(&mut self.conn, data, now)
    }

    /// # Errors
    ///
    /// Returns an error if the plan does not exist or the update fails.
    pub fn update_plan(
        &mut self,
        plan_id: i64,
        changes: &PlanChanges,
        now: &str,
    ) -> Result<(), PersistenceError> {
        mutations::plans::update_plan(&mut self.conn, plan_id, changes, now)
    }

    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn touch_plan(&mut self, plan_id: i64, now: &str) -> Result<(), PersistenceError> {
        mutations::plans::touch_plan(&mut self.conn, plan_id, now)
    }

    /// Deletes a plan and its shifts, returning how many shifts went with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan does not exist or the delete fails.
    pub fn delete_plan(&mut self, plan_id: i64) -> Result<usize, PersistenceError> {
        mutations::plans::delete_plan(&mut self.conn, plan_id)
    }

    // ========================================================================
    // Clock records
    // ========================================================================

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn open_clock_record(
        &mut self,
        employee_id: i64,
    ) -> Result<Option<ClockRecord>, PersistenceError> {
        queries::clock::open_clock_record(&mut self.conn, employee_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_clock_record(
        &mut self,
        clock_record_id: i64,
    ) -> Result<Option<ClockRecord>, PersistenceError> {
        queries::clock::get_clock_record(&mut self.conn, clock_record_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn open_break(
        &mut self,
        clock_record_id: i64,
    ) -> Result<Option<BreakInterval>, PersistenceError> {
        queries::clock::open_break(&mut self.conn, clock_record_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_breaks(
        &mut self,
        clock_record_id: i64,
    ) -> Result<Vec<BreakInterval>, PersistenceError> {
        queries::clock::list_breaks(&mut self.conn, clock_record_id)
    }

    /// Lists clock records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_clock_records(
        &mut self,
        filter: &ClockRecordFilter,
    ) -> Result<Vec<ClockRecord>, PersistenceError> {
        queries::clock::list_clock_records(&mut self.conn, filter)
    }

    /// Applies a clock transition's effects atomically and returns the id
    /// of the clock record they touched.
    ///
    /// # Errors
    ///
    /// Returns an error if any effect fails.
    pub fn apply_clock_effects(
        &mut self,
        employee_id: i64,
        effects: &[ClockEffect],
    ) -> Result<Option<i64>, PersistenceError> {
        mutations::clock::apply_clock_effects(&mut self.conn, employee_id, effects)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn survey_for_clock_record(
        &mut self,
        clock_record_id: i64,
    ) -> Result<Option<SurveyData>, PersistenceError> {
        queries::clock::survey_for_clock_record(&mut self.conn, clock_record_id)
    }

    /// # Errors
    ///
    /// Returns an error if the record already has a survey or the insert fails.
    pub fn insert_survey(&mut self, data: &NewSurveyData<'_>) -> Result<i64, PersistenceError> {
        mutations::clock::insert_survey(&mut self.conn, data)
    }
}
