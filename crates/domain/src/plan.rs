// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly schedule plans: versioning, deletion guard and week copy.

use crate::calendar::ShiftDate;
use crate::error::DomainError;
use crate::shift::{Shift, ShiftDraft};
use crate::types::{PlanStatus, ShiftStatus};

/// A versioned weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePlan {
    pub plan_id: i64,
    pub week_start_date: ShiftDate,
    pub status: PlanStatus,
    pub version: i32,
    pub created_by: i64,
    pub copied_from_plan_id: Option<i64>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Computes the version for a new plan given the highest existing version
/// for the same week.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the version space is exhausted.
pub fn next_plan_version(max_existing: Option<i32>) -> Result<i32, DomainError> {
    match max_existing {
        None => Ok(1),
        Some(version) => version
            .checked_add(1)
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("plan version {version} + 1"),
            }),
    }
}

/// Checks that a plan may be deleted.
///
/// # Errors
///
/// Returns `DomainError::PlanNotDraft` unless the plan is a draft.
pub fn ensure_plan_deletable(plan: &SchedulePlan) -> Result<(), DomainError> {
    if plan.status.is_deletable() {
        Ok(())
    } else {
        Err(DomainError::PlanNotDraft {
            plan_id: plan.plan_id,
            status: plan.status.to_string(),
        })
    }
}

/// Checks that no plan of any version exists for the copy target week.
///
/// # Errors
///
/// Returns `DomainError::TargetWeekOccupied` if `existing_plans` is non-zero.
pub fn ensure_copy_target_free(
    target_week: ShiftDate,
    existing_plans: i64,
) -> Result<(), DomainError> {
    if existing_plans > 0 {
        Err(DomainError::TargetWeekOccupied {
            week_start_date: target_week.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Projects a source-plan shift into the target plan.
///
/// The date moves by `day_offset`, the status resets to scheduled and the
/// per-shift notes stay behind with the source week.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the shifted date is out of range.
pub fn copy_shift_into_plan(
    shift: &Shift,
    day_offset: i64,
    target_plan_id: i64,
) -> Result<ShiftDraft, DomainError> {
    Ok(ShiftDraft {
        employee_id: shift.employee_id,
        date: shift.date.add_days(day_offset)?,
        shift_type: shift.shift_type,
        start_time: shift.start_time.clone(),
        end_time: shift.end_time.clone(),
        second_start_time: shift.second_start_time.clone(),
        second_end_time: shift.second_end_time.clone(),
        break_duration_minutes: shift.break_duration_minutes,
        is_day_off: shift.is_day_off,
        status: ShiftStatus::Scheduled,
        notes: None,
        schedule_plan_id: Some(target_plan_id),
    })
}
