// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for staff identity, shifts and clock records.
//!
//! Every handler takes the persistence layer, the authenticated actor where
//! one is required, and an injected `now`. Errors are always returned as
//! [`ApiError`] so the HTTP layer can map them to a status code.

use std::collections::HashMap;
use std::str::FromStr;

use shiftdesk_domain::{
    BreakInterval, ClockRecord, Employee, EmployeeRole, Shift, ShiftChanges, ShiftChangesInput,
    ShiftDate, ShiftDraft, ShiftStatus, TimeWindow, ViolationCollector, catalog, check_shift_conflict,
    format_timestamp,
};
use shiftdesk_persistence::{
    ClockRecordFilter, NewEmployeeData, Persistence, PersistenceError, ShiftFilter,
};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::credential_policy::{PasswordPolicy, validate_pin};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    BootstrapRequest, ClockRecordQuery, ClockRecordResponse, CreateEmployeeRequest,
    CreateShiftRequest, EmployeeInfo, EmployeeSummary, LoginRequest, LoginResponse,
    SetKioskPinRequest, ShiftListQuery, ShiftResponse, SuccessResponse, UpdateShiftRequest,
};

/// Formats `now` for storage.
pub(crate) fn timestamp(now: OffsetDateTime) -> Result<String, ApiError> {
    format_timestamp(now).map_err(translate_domain_error)
}

/// Loads employee summaries keyed by id for embedding in listings.
pub(crate) fn employee_directory(
    persistence: &mut Persistence,
) -> Result<HashMap<i64, Employee>, ApiError> {
    Ok(persistence
        .list_employees()
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|e| (e.employee_id, e))
        .collect())
}

/// Builds shift responses with the owning employee embedded.
pub(crate) fn shift_responses(
    shifts: &[Shift],
    directory: &HashMap<i64, Employee>,
) -> Vec<ShiftResponse> {
    shifts
        .iter()
        .map(|s| {
            ShiftResponse::new(
                s,
                directory.get(&s.employee_id).map(EmployeeSummary::from),
            )
        })
        .collect()
}

fn require_employee(persistence: &mut Persistence, employee_id: i64) -> Result<Employee, ApiError> {
    persistence
        .get_employee(employee_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::not_found("Employee", format!("Employee {employee_id} not found")))
}

fn parse_optional_dates(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<(Option<ShiftDate>, Option<ShiftDate>), ApiError> {
    let mut collector: ViolationCollector = ViolationCollector::new();
    let start: Option<ShiftDate> =
        start_date.and_then(|v| collector.check("start_date", ShiftDate::parse(v)));
    let end: Option<ShiftDate> =
        end_date.and_then(|v| collector.check("end_date", ShiftDate::parse(v)));
    collector.finish().map_err(translate_domain_error)?;
    Ok((start, end))
}

// ============================================================================
// Staff identity
// ============================================================================

/// Creates the first admin on an empty system.
///
/// # Errors
///
/// Returns `ApiError::Conflict` once any employee exists, or a validation
/// error if the password fails the credential policy.
pub fn bootstrap(
    persistence: &mut Persistence,
    request: &BootstrapRequest,
    now: OffsetDateTime,
) -> Result<EmployeeInfo, ApiError> {
    let existing: i64 = persistence
        .count_employees()
        .map_err(translate_persistence_error)?;
    if existing > 0 {
        return Err(ApiError::Conflict {
            message: String::from("System is already bootstrapped"),
        });
    }

    let mut collector: ViolationCollector = ViolationCollector::new();
    if request.login_name.trim().is_empty() {
        collector.push("login_name", "must not be empty");
    }
    if request.full_name.trim().is_empty() {
        collector.push("full_name", "must not be empty");
    }
    collector.finish().map_err(translate_domain_error)?;

    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &request.login_name,
    )?;

    let created_at: String = timestamp(now)?;
    let employee_id: i64 = persistence
        .create_employee(&NewEmployeeData {
            full_name: request.full_name.trim(),
            role: EmployeeRole::Admin,
            login_name: Some(request.login_name.trim()),
            password: Some(&request.password),
            kiosk_pin: None,
            created_at: &created_at,
        })
        .map_err(translate_persistence_error)?;

    info!(employee_id, "Bootstrapped first admin");
    let employee: Employee = require_employee(persistence, employee_id)?;
    Ok(EmployeeInfo::from(&employee))
}

/// Authenticates a staff member and opens a session.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` for wrong credentials or an
/// inactive employee.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    now: OffsetDateTime,
) -> Result<LoginResponse, ApiError> {
    let (session_token, _actor, employee): (String, AuthenticatedActor, Employee) =
        AuthenticationService::login(persistence, &request.login_name, &request.password, now)?;

    Ok(LoginResponse {
        session_token,
        employee: EmployeeInfo::from(&employee),
    })
}

/// Ends a staff session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<SuccessResponse, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(SuccessResponse::ok())
}

/// Describes the employee behind the current session.
#[must_use]
pub fn whoami(employee: &Employee) -> EmployeeInfo {
    EmployeeInfo::from(employee)
}

/// Creates an employee. Manager only.
///
/// A login name requires a password that satisfies the credential policy.
/// A kiosk PIN must be four digits and unused among active employees.
///
/// # Errors
///
/// Returns an error if the actor is not a manager, a field is invalid, or the
/// login name or PIN is already taken.
pub fn create_employee(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateEmployeeRequest,
    now: OffsetDateTime,
) -> Result<EmployeeInfo, ApiError> {
    AuthorizationService::require_manager(actor, "create_employee")?;

    let mut collector: ViolationCollector = ViolationCollector::new();
    if request.full_name.trim().is_empty() {
        collector.push("full_name", "must not be empty");
    }
    let role: Option<EmployeeRole> =
        collector.check("role", EmployeeRole::from_str(&request.role));
    if request.login_name.is_some() && request.password.is_none() {
        collector.push("password", "is required when a login name is given");
    }
    if request.password.is_some() && request.login_name.is_none() {
        collector.push("login_name", "is required when a password is given");
    }
    collector.finish().map_err(translate_domain_error)?;
    let role: EmployeeRole = role.ok_or_else(|| ApiError::Internal {
        message: String::from("role missing after validation"),
    })?;

    if let (Some(login_name), Some(password)) = (&request.login_name, &request.password) {
        PasswordPolicy::default().validate(
            password,
            request.password_confirmation.as_deref().unwrap_or_default(),
            login_name,
        )?;
    }

    if let Some(pin) = &request.kiosk_pin {
        validate_pin(pin)?;
        if persistence
            .is_pin_taken(pin, 0)
            .map_err(translate_persistence_error)?
        {
            return Err(pin_taken());
        }
    }

    let created_at: String = timestamp(now)?;
    let employee_id: i64 = persistence
        .create_employee(&NewEmployeeData {
            full_name: request.full_name.trim(),
            role,
            login_name: request.login_name.as_deref().map(str::trim),
            password: request.password.as_deref(),
            kiosk_pin: request.kiosk_pin.as_deref(),
            created_at: &created_at,
        })
        .map_err(translate_persistence_error)?;

    info!(
        employee_id,
        role = role.as_str(),
        created_by = actor.employee_id,
        "Created employee"
    );
    let employee: Employee = require_employee(persistence, employee_id)?;
    Ok(EmployeeInfo::from(&employee))
}

/// Lists every employee. Manager only.
///
/// # Errors
///
/// Returns an error if the actor is not a manager or the query fails.
pub fn list_employees(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<EmployeeInfo>, ApiError> {
    AuthorizationService::require_manager(actor, "list_employees")?;
    Ok(persistence
        .list_employees()
        .map_err(translate_persistence_error)?
        .iter()
        .map(EmployeeInfo::from)
        .collect())
}

fn pin_taken() -> ApiError {
    ApiError::Conflict {
        message: String::from("PIN is already assigned to another active employee"),
    }
}

/// Assigns a kiosk PIN to an employee. Manager only.
///
/// # Errors
///
/// Returns an error if the PIN is not four digits, the employee does not
/// exist, or another active employee already holds the PIN.
pub fn set_kiosk_pin(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    employee_id: i64,
    request: &SetKioskPinRequest,
) -> Result<SuccessResponse, ApiError> {
    AuthorizationService::require_manager(actor, "set_kiosk_pin")?;
    validate_pin(&request.pin)?;
    require_employee(persistence, employee_id)?;

    if persistence
        .is_pin_taken(&request.pin, employee_id)
        .map_err(translate_persistence_error)?
    {
        return Err(pin_taken());
    }

    persistence
        .set_kiosk_pin(employee_id, &request.pin)
        .map_err(translate_persistence_error)?;
    info!(employee_id, set_by = actor.employee_id, "Kiosk PIN updated");
    Ok(SuccessResponse::ok())
}

// ============================================================================
// Shifts
// ============================================================================

/// Returns the time window catalog.
#[must_use]
pub fn shift_types() -> Vec<TimeWindow> {
    catalog()
}

/// Lists shifts ordered by date then start time.
///
/// Non-managers only ever see their own shifts, whatever employee filter
/// they send. Unprovisioned storage yields an empty list.
///
/// # Errors
///
/// Returns a validation error for malformed filters, or a storage error.
pub fn list_shifts(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: &ShiftListQuery,
) -> Result<Vec<ShiftResponse>, ApiError> {
    let mut collector: ViolationCollector = ViolationCollector::new();
    let start_date: Option<ShiftDate> = query
        .start_date
        .as_deref()
        .and_then(|v| collector.check("start_date", ShiftDate::parse(v)));
    let end_date: Option<ShiftDate> = query
        .end_date
        .as_deref()
        .and_then(|v| collector.check("end_date", ShiftDate::parse(v)));
    let status: Option<ShiftStatus> = query
        .status
        .as_deref()
        .and_then(|v| collector.check("status", ShiftStatus::from_str(v)));
    collector.finish().map_err(translate_domain_error)?;

    let employee_id: Option<i64> = if actor.is_manager() {
        query.employee_id
    } else {
        Some(actor.employee_id)
    };

    let filter: ShiftFilter = ShiftFilter {
        employee_id,
        start_date,
        end_date,
        status,
        schedule_plan_id: None,
    };

    let shifts: Vec<Shift> = match persistence.list_shifts(&filter) {
        Ok(shifts) => shifts,
        Err(e) if e.is_storage_unavailable() => {
            debug!(error = %e, "Shift storage unavailable, returning no shifts");
            return Ok(Vec::new());
        }
        Err(e) => return Err(translate_persistence_error(e)),
    };

    let directory: HashMap<i64, Employee> = employee_directory(persistence)?;
    Ok(shift_responses(&shifts, &directory))
}

/// Loads a shift visible to `actor`. Another employee's shift reads as missing.
fn load_visible_shift(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    shift_id: i64,
) -> Result<Shift, ApiError> {
    let not_found = || ApiError::not_found("Shift", format!("Shift {shift_id} not found"));
    let shift: Shift = persistence
        .get_shift(shift_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(not_found)?;
    if !actor.is_manager() && shift.employee_id != actor.employee_id {
        return Err(not_found());
    }
    Ok(shift)
}

fn shift_response(persistence: &mut Persistence, shift: &Shift) -> Result<ShiftResponse, ApiError> {
    let employee: Option<Employee> = persistence
        .get_employee(shift.employee_id)
        .map_err(translate_persistence_error)?;
    Ok(ShiftResponse::new(
        shift,
        employee.as_ref().map(EmployeeSummary::from),
    ))
}

/// Retrieves one shift.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the shift does not exist or
/// belongs to someone else and the actor is not a manager.
pub fn get_shift(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    shift_id: i64,
) -> Result<ShiftResponse, ApiError> {
    let shift: Shift = load_visible_shift(persistence, actor, shift_id)?;
    shift_response(persistence, &shift)
}

/// Creates a shift. Manager only.
///
/// The new shift is rejected only when another shift for the same employee
/// and date has the exact same start or end time; overlapping hours are
/// otherwise accepted.
///
/// # Errors
///
/// Returns a validation error listing every invalid field, a conflict error
/// for a colliding shift, or not-found for an unknown employee or plan.
pub fn create_shift(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateShiftRequest,
    now: OffsetDateTime,
) -> Result<ShiftResponse, ApiError> {
    AuthorizationService::require_manager(actor, "create_shift")?;

    let draft: ShiftDraft =
        ShiftDraft::validate(&request.as_input(), "").map_err(translate_domain_error)?;

    require_employee(persistence, draft.employee_id)?;
    if let Some(plan_id) = draft.schedule_plan_id {
        persistence
            .get_plan(plan_id)
            .map_err(translate_persistence_error)?
            .ok_or_else(|| ApiError::not_found("Schedule plan", format!("Plan {plan_id} not found")))?;
    }

    let same_day: Vec<Shift> = persistence
        .list_employee_shifts_on(draft.employee_id, draft.date)
        .map_err(translate_persistence_error)?;
    check_shift_conflict(&draft, &same_day).map_err(translate_domain_error)?;

    let now_str: String = timestamp(now)?;
    let shift_id: i64 = persistence
        .insert_shift(&draft, &now_str)
        .map_err(translate_persistence_error)?;

    info!(
        shift_id,
        employee_id = draft.employee_id,
        date = %draft.date,
        created_by = actor.employee_id,
        "Created shift"
    );

    let shift: Shift = load_visible_shift(persistence, actor, shift_id)?;
    shift_response(persistence, &shift)
}

/// Updates a shift.
///
/// Managers may change any field. The shift's own employee may change only
/// `notes`; any other field in their request is refused, not dropped.
///
/// # Errors
///
/// Returns not-found for an unknown or foreign shift, an authorization error
/// for restricted fields, or a validation error listing every bad field.
pub fn update_shift(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    shift_id: i64,
    request: &UpdateShiftRequest,
    now: OffsetDateTime,
) -> Result<ShiftResponse, ApiError> {
    let existing: Shift = load_visible_shift(persistence, actor, shift_id)?;

    let input: ShiftChangesInput<'_> = request.as_input();
    if !actor.is_manager() {
        let restricted: Vec<&'static str> = input.fields_other_than_notes();
        if !restricted.is_empty() {
            return Err(ApiError::Unauthorized {
                action: String::from("update_shift"),
                reason: String::from("You can only update notes on your shifts"),
            });
        }
    }

    let changes: ShiftChanges =
        ShiftChanges::validate(&input, "").map_err(translate_domain_error)?;
    if changes.is_empty() {
        return shift_response(persistence, &existing);
    }
    if let Some(employee_id) = changes.employee_id {
        require_employee(persistence, employee_id)?;
    }

    let now_str: String = timestamp(now)?;
    persistence
        .update_shift(shift_id, &changes, &now_str)
        .map_err(translate_persistence_error)?;
    info!(shift_id, updated_by = actor.employee_id, "Updated shift");

    let shift: Shift = load_visible_shift(persistence, actor, shift_id)?;
    shift_response(persistence, &shift)
}

/// Deletes a shift. Manager only; the row is removed outright.
///
/// # Errors
///
/// Returns an error if the actor is not a manager or the shift does not exist.
pub fn delete_shift(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    shift_id: i64,
) -> Result<SuccessResponse, ApiError> {
    AuthorizationService::require_manager(actor, "delete_shift")?;
    persistence.delete_shift(shift_id).map_err(|e| match e {
        PersistenceError::NotFound(_) => {
            ApiError::not_found("Shift", format!("Shift {shift_id} not found"))
        }
        other => translate_persistence_error(other),
    })?;
    info!(shift_id, deleted_by = actor.employee_id, "Deleted shift");
    Ok(SuccessResponse::ok())
}

// ============================================================================
// Clock records
// ============================================================================

/// Lists clock records, newest clock-in first, with their breaks.
///
/// Non-managers see only their own records. Unprovisioned storage yields
/// an empty list.
///
/// # Errors
///
/// Returns a validation error for malformed dates, or a storage error.
pub fn list_clock_records(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: &ClockRecordQuery,
) -> Result<Vec<ClockRecordResponse>, ApiError> {
    let (start_date, end_date) =
        parse_optional_dates(query.start_date.as_deref(), query.end_date.as_deref())?;
    let employee_id: Option<i64> = if actor.is_manager() {
        query.employee_id
    } else {
        Some(actor.employee_id)
    };

    let records: Vec<ClockRecord> = match persistence.list_clock_records(&ClockRecordFilter {
        employee_id,
        start_date,
        end_date,
    }) {
        Ok(records) => records,
        Err(e) if e.is_storage_unavailable() => {
            debug!(error = %e, "Clock storage unavailable, returning no records");
            return Ok(Vec::new());
        }
        Err(e) => return Err(translate_persistence_error(e)),
    };

    records
        .iter()
        .map(|record| {
            let breaks: Vec<BreakInterval> = persistence
                .list_breaks(record.clock_record_id)
                .map_err(translate_persistence_error)?;
            ClockRecordResponse::new(record, &breaks).map_err(translate_domain_error)
        })
        .collect()
}
