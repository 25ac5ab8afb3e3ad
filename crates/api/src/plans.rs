// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule plan handlers: weekly versions, copy, grid sync, labor
//! validation and CSV export.

use std::collections::HashMap;
use std::str::FromStr;

use num_traits::cast::ToPrimitive;
use shiftdesk_domain::{
    Employee, FieldViolation, LaborConstraints, PlanStatus, SchedulePlan, ScheduleValidation, Shift,
    ShiftChanges, ShiftChangesInput, ShiftDate, ShiftDraft, ShiftStatus,
    copy_shift_into_plan, ensure_copy_target_free, ensure_plan_deletable, next_plan_version,
    validate_schedule,
};
use shiftdesk_persistence::{NewPlanData, Persistence, PlanChanges};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::handlers::{employee_directory, shift_responses, timestamp};
use crate::request_response::{
    CopyPlanRequest, CreatePlanRequest, PlanOnlyResponse, PlanResponse, PlanWithShiftsResponse,
    SuccessResponse, SyncRequest, SyncResponse, SyncResults, UpdatePlanRequest, WeekQuery,
};

/// Header row of the plan CSV export.
pub const EXPORT_HEADER: [&str; 13] = [
    "employee_id",
    "employee_name",
    "date",
    "shift_type",
    "start_time",
    "end_time",
    "second_start_time",
    "second_end_time",
    "break_minutes",
    "paid_hours",
    "is_day_off",
    "status",
    "notes",
];

fn require_plan(persistence: &mut Persistence, plan_id: i64) -> Result<SchedulePlan, ApiError> {
    persistence
        .get_plan(plan_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::not_found("Schedule plan", format!("Plan {plan_id} not found")))
}

fn parse_week(value: &str, field: &str) -> Result<ShiftDate, ApiError> {
    ShiftDate::parse(value).map_err(|e| ApiError::ValidationFailed {
        details: vec![FieldViolation::new(field, e.to_string())],
    })
}

fn plan_with_shifts(
    persistence: &mut Persistence,
    plan: &SchedulePlan,
) -> Result<PlanWithShiftsResponse, ApiError> {
    let shifts: Vec<Shift> = persistence
        .list_plan_shifts(plan.plan_id)
        .map_err(translate_persistence_error)?;
    let directory: HashMap<i64, Employee> = employee_directory(persistence)?;
    Ok(PlanWithShiftsResponse {
        plan: Some(PlanResponse::from(plan)),
        shifts: shift_responses(&shifts, &directory),
    })
}

/// Returns the newest plan version for a week with its shifts.
///
/// A week with no plan yields `plan: null` and no shifts, as does storage
/// that has not been provisioned yet.
///
/// # Errors
///
/// Returns a validation error for a malformed date, or a storage error.
pub fn get_plan_for_week(
    persistence: &mut Persistence,
    query: &WeekQuery,
) -> Result<PlanWithShiftsResponse, ApiError> {
    let week: ShiftDate = parse_week(&query.week_start_date, "week_start_date")?;
    let empty = || PlanWithShiftsResponse {
        plan: None,
        shifts: Vec::new(),
    };

    let plan: Option<SchedulePlan> = match persistence.latest_plan_for_week(week) {
        Ok(plan) => plan,
        Err(e) if e.is_storage_unavailable() => {
            debug!(error = %e, "Plan storage unavailable, returning empty week");
            return Ok(empty());
        }
        Err(e) => return Err(translate_persistence_error(e)),
    };

    match plan {
        Some(plan) => match plan_with_shifts(persistence, &plan) {
            Err(ApiError::Unavailable { .. }) => Ok(empty()),
            other => other,
        },
        None => Ok(empty()),
    }
}

/// Creates the next draft version of a week's plan. Manager only.
///
/// # Errors
///
/// Returns an error if the actor is not a manager, the date is malformed,
/// or the version was taken concurrently.
pub fn create_plan(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreatePlanRequest,
    now: OffsetDateTime,
) -> Result<PlanWithShiftsResponse, ApiError> {
    AuthorizationService::require_manager(actor, "create_plan")?;
    let week: ShiftDate = parse_week(&request.week_start_date, "week_start_date")?;

    let max_version: Option<i32> = persistence
        .max_plan_version(week)
        .map_err(translate_persistence_error)?;
    let version: i32 = next_plan_version(max_version).map_err(translate_domain_error)?;

    let now_str: String = timestamp(now)?;
    let plan_id: i64 = persistence
        .insert_plan(
            &NewPlanData {
                week_start_date: week,
                version,
                created_by: actor.employee_id,
                copied_from_plan_id: None,
                notes: request.notes.clone(),
            },
            &now_str,
        )
        .map_err(translate_persistence_error)?;

    info!(plan_id, week = %week, version, created_by = actor.employee_id, "Created plan");
    let plan: SchedulePlan = require_plan(persistence, plan_id)?;
    Ok(PlanWithShiftsResponse {
        plan: Some(PlanResponse::from(&plan)),
        shifts: Vec::new(),
    })
}

/// Updates a plan's status or notes. Manager only.
///
/// Any status may follow any other, including published back to draft.
///
/// # Errors
///
/// Returns an error if the actor is not a manager, the plan does not exist,
/// or the status is not a known value.
pub fn update_plan(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    plan_id: i64,
    request: &UpdatePlanRequest,
    now: OffsetDateTime,
) -> Result<PlanOnlyResponse, ApiError> {
    AuthorizationService::require_manager(actor, "update_plan")?;
    require_plan(persistence, plan_id)?;

    let status: Option<PlanStatus> = request
        .status
        .as_deref()
        .map(PlanStatus::from_str)
        .transpose()
        .map_err(translate_domain_error)?;
    let changes: PlanChanges = PlanChanges {
        status,
        notes: request.notes.clone(),
    };

    let now_str: String = timestamp(now)?;
    persistence
        .update_plan(plan_id, &changes, &now_str)
        .map_err(translate_persistence_error)?;
    info!(
        plan_id,
        status = ?changes.status.as_ref().map(PlanStatus::as_str),
        updated_by = actor.employee_id,
        "Updated plan"
    );

    let plan: SchedulePlan = require_plan(persistence, plan_id)?;
    Ok(PlanOnlyResponse {
        plan: PlanResponse::from(&plan),
    })
}

/// Deletes a draft plan and its shifts. Manager only.
///
/// # Errors
///
/// Returns an error if the actor is not a manager, the plan does not exist,
/// or the plan is not a draft.
pub fn delete_plan(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    plan_id: i64,
) -> Result<SuccessResponse, ApiError> {
    AuthorizationService::require_manager(actor, "delete_plan")?;
    let plan: SchedulePlan = require_plan(persistence, plan_id)?;
    ensure_plan_deletable(&plan).map_err(translate_domain_error)?;

    let removed_shifts: usize = persistence
        .delete_plan(plan_id)
        .map_err(translate_persistence_error)?;
    info!(plan_id, removed_shifts, deleted_by = actor.employee_id, "Deleted plan");
    Ok(SuccessResponse::ok())
}

/// Copies a plan's shifts into an empty target week. Manager only.
///
/// The new plan is a draft that records its source and starts without notes.
/// Each shift moves by the distance between the two weeks and restarts as
/// scheduled. The plan is
/// written before its shifts; if the shift insert fails the empty plan
/// remains.
///
/// # Errors
///
/// Returns an error if the actor is not a manager, the source plan does not
/// exist, or any plan already exists for the target week.
pub fn copy_plan(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    source_plan_id: i64,
    request: &CopyPlanRequest,
    now: OffsetDateTime,
) -> Result<PlanWithShiftsResponse, ApiError> {
    AuthorizationService::require_manager(actor, "copy_plan")?;
    let source: SchedulePlan = require_plan(persistence, source_plan_id)?;
    let target_week: ShiftDate =
        parse_week(&request.target_week_start_date, "target_week_start_date")?;

    let existing: i64 = persistence
        .count_plans_for_week(target_week)
        .map_err(translate_persistence_error)?;
    ensure_copy_target_free(target_week, existing).map_err(translate_domain_error)?;

    let max_version: Option<i32> = persistence
        .max_plan_version(target_week)
        .map_err(translate_persistence_error)?;
    let version: i32 = next_plan_version(max_version).map_err(translate_domain_error)?;

    let now_str: String = timestamp(now)?;
    let plan_id: i64 = persistence
        .insert_plan(
            &NewPlanData {
                week_start_date: target_week,
                version,
                created_by: actor.employee_id,
                copied_from_plan_id: Some(source.plan_id),
                notes: None,
            },
            &now_str,
        )
        .map_err(translate_persistence_error)?;

    let day_offset: i64 = source.week_start_date.days_until(target_week);
    let drafts: Vec<ShiftDraft> = persistence
        .list_plan_shifts(source.plan_id)
        .map_err(translate_persistence_error)?
        .iter()
        .map(|shift| copy_shift_into_plan(shift, day_offset, plan_id))
        .collect::<Result<_, _>>()
        .map_err(translate_domain_error)?;

    if let Err(e) = persistence.insert_shifts(&drafts, &now_str) {
        warn!(plan_id, source_plan_id, error = %e, "Plan copied without its shifts");
        return Err(translate_persistence_error(e));
    }

    info!(
        plan_id,
        source_plan_id,
        day_offset,
        shifts = drafts.len(),
        "Copied plan"
    );
    let plan: SchedulePlan = require_plan(persistence, plan_id)?;
    plan_with_shifts(persistence, &plan)
}

/// Validates one grid update. Employee, date and status are not editable
/// from the grid.
fn grid_changes(input: &ShiftChangesInput<'_>) -> Result<ShiftChanges, ApiError> {
    let locked: Vec<&'static str> = input.fields_locked_in_grid();
    if !locked.is_empty() {
        return Err(ApiError::ValidationFailed {
            details: locked
                .into_iter()
                .map(|name| FieldViolation::new(name, "cannot be changed by a grid sync"))
                .collect(),
        });
    }
    ShiftChanges::validate(input, "").map_err(translate_domain_error)
}

/// Applies a batch of grid edits to a plan. Manager only.
///
/// Deletes run first, then creates, then each update in turn. A failing
/// group is reported in `errors` and does not undo earlier groups. The
/// response always carries the plan's shifts as they now stand.
///
/// # Errors
///
/// Returns an error only if the actor is not a manager or the plan does not
/// exist; per-item failures are reported in the results.
pub fn sync_plan(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    plan_id: i64,
    request: &SyncRequest,
    now: OffsetDateTime,
) -> Result<SyncResponse, ApiError> {
    AuthorizationService::require_manager(actor, "sync_plan")?;
    require_plan(persistence, plan_id)?;

    let now_str: String = timestamp(now)?;
    let mut results: SyncResults = SyncResults::default();

    if !request.shifts_to_delete.is_empty() {
        match persistence.delete_plan_shifts(plan_id, &request.shifts_to_delete) {
            Ok(deleted) => results.deleted = deleted,
            Err(e) => results
                .errors
                .push(format!("Delete error: {}", translate_persistence_error(e))),
        }
    }

    if !request.shifts_to_create.is_empty() {
        let drafts: Result<Vec<ShiftDraft>, ApiError> = request
            .shifts_to_create
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let mut draft: ShiftDraft =
                    ShiftDraft::validate(&item.as_input(), &format!("shifts_to_create[{index}]."))
                        .map_err(translate_domain_error)?;
                draft.schedule_plan_id = Some(plan_id);
                draft.status = ShiftStatus::Scheduled;
                Ok(draft)
            })
            .collect();

        match drafts.and_then(|drafts| {
            persistence
                .insert_shifts(&drafts, &now_str)
                .map_err(translate_persistence_error)
        }) {
            Ok(ids) => results.created = ids.len(),
            Err(e) => results.errors.push(format!("Create error: {e}")),
        }
    }

    for item in &request.shifts_to_update {
        let outcome: Result<(), ApiError> = grid_changes(&item.fields.as_input())
            .and_then(|changes| {
                persistence
                    .update_plan_shift(plan_id, item.id, &changes, &now_str)
                    .map_err(translate_persistence_error)
            });
        match outcome {
            Ok(()) => results.updated += 1,
            Err(e) => results
                .errors
                .push(format!("Update error for {}: {e}", item.id)),
        }
    }

    if let Err(e) = persistence.touch_plan(plan_id, &now_str) {
        warn!(plan_id, error = %e, "Failed to touch plan after sync");
    }

    info!(
        plan_id,
        created = results.created,
        updated = results.updated,
        deleted = results.deleted,
        errors = results.errors.len(),
        "Synced plan"
    );

    let shifts: Vec<Shift> = persistence
        .list_plan_shifts(plan_id)
        .map_err(translate_persistence_error)?;
    let directory: HashMap<i64, Employee> = employee_directory(persistence)?;
    Ok(SyncResponse {
        results,
        shifts: shift_responses(&shifts, &directory),
    })
}

/// Checks a plan's shifts against the labor constraints. Manager only.
///
/// # Errors
///
/// Returns an error if the actor is not a manager or the plan does not exist.
pub fn validate_plan(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    plan_id: i64,
    constraints: &LaborConstraints,
) -> Result<ScheduleValidation, ApiError> {
    AuthorizationService::require_manager(actor, "validate_plan")?;
    let plan: SchedulePlan = require_plan(persistence, plan_id)?;
    let shifts: Vec<Shift> = persistence
        .list_plan_shifts(plan_id)
        .map_err(translate_persistence_error)?;
    let names: HashMap<i64, String> = employee_directory(persistence)?
        .into_iter()
        .map(|(id, employee)| (id, employee.full_name))
        .collect();

    Ok(validate_schedule(
        &shifts,
        &names,
        plan.week_start_date,
        constraints,
    ))
}

/// Renders a plan's shifts as CSV. Manager only.
///
/// # Errors
///
/// Returns an error if the actor is not a manager, the plan does not exist,
/// or the CSV cannot be written.
pub fn export_plan_csv(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    plan_id: i64,
) -> Result<String, ApiError> {
    AuthorizationService::require_manager(actor, "export_plan")?;
    require_plan(persistence, plan_id)?;
    let shifts: Vec<Shift> = persistence
        .list_plan_shifts(plan_id)
        .map_err(translate_persistence_error)?;
    let directory: HashMap<i64, Employee> = employee_directory(persistence)?;

    let csv_error = |e: csv::Error| ApiError::Internal {
        message: format!("Failed to write CSV: {e}"),
    };
    let mut writer: csv::Writer<Vec<u8>> = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER).map_err(csv_error)?;

    for shift in &shifts {
        let paid_hours: f64 = shift.paid_minutes().to_f64().unwrap_or_default() / 60.0;
        let name: &str = directory
            .get(&shift.employee_id)
            .map_or("", |e| e.full_name.as_str());
        writer
            .write_record([
                shift.employee_id.to_string().as_str(),
                name,
                &shift.date.to_string(),
                shift.shift_type.as_str(),
                shift.start_time.as_str(),
                shift.end_time.as_str(),
                shift.second_start_time.as_ref().map_or("", |t| t.as_str()),
                shift.second_end_time.as_ref().map_or("", |t| t.as_str()),
                &shift.break_duration_minutes.to_string(),
                &format!("{paid_hours:.2}"),
                if shift.is_day_off { "true" } else { "false" },
                shift.status.as_str(),
                shift.notes.as_deref().unwrap_or(""),
            ])
            .map_err(csv_error)?;
    }

    let bytes: Vec<u8> = writer.into_inner().map_err(|e| ApiError::Internal {
        message: format!("Failed to flush CSV: {e}"),
    })?;
    String::from_utf8(bytes).map_err(|e| ApiError::Internal {
        message: format!("CSV is not valid UTF-8: {e}"),
    })
}
