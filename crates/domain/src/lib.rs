// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and scheduling rules for `ShiftDesk`.
//!
//! Everything here is pure: no storage, no clocks. Callers pass the current
//! instant in explicitly.

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

mod calendar;
mod catalog;
mod clock;
mod error;
mod labor;
mod plan;
mod shift;
mod types;

#[cfg(test)]
mod tests;

pub use calendar::{RestaurantTimezone, ShiftDate, WallTime, format_timestamp, parse_timestamp};
pub use catalog::{TimeWindow, catalog, lookup};
pub use clock::{
    BreakInterval, ClockRecord, ClockSummary, ShiftVariance, round_to_minutes, shift_variance,
    summarize_session,
};
pub use error::{DomainError, FieldViolation, ViolationCollector};
pub use labor::{
    LaborConstraints, ScheduleValidation, ScheduleViolation, Severity, ViolationKind,
    validate_schedule,
};
pub use plan::{
    SchedulePlan, copy_shift_into_plan, ensure_copy_target_free, ensure_plan_deletable,
    next_plan_version,
};
pub use shift::{
    Shift, ShiftChanges, ShiftChangesInput, ShiftDraft, ShiftInput, check_shift_conflict,
    find_weak_conflict, paid_minutes, span_minutes, validate_break_minutes,
};
pub use types::{Employee, EmployeeRole, EmploymentStatus, PlanStatus, ShiftStatus, ShiftType};
