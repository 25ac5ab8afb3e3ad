// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift records: validation of submitted fields and the conflict check.

use std::str::FromStr;

use crate::calendar::{ShiftDate, WallTime};
use crate::error::{DomainError, FieldViolation, ViolationCollector};
use crate::types::{ShiftStatus, ShiftType};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// A stored shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    pub shift_id: i64,
    pub employee_id: i64,
    pub date: ShiftDate,
    pub shift_type: ShiftType,
    pub start_time: WallTime,
    pub end_time: WallTime,
    pub second_start_time: Option<WallTime>,
    pub second_end_time: Option<WallTime>,
    pub break_duration_minutes: u32,
    pub is_day_off: bool,
    pub status: ShiftStatus,
    pub notes: Option<String>,
    pub schedule_plan_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl Shift {
    /// Paid minutes for this shift. See [`paid_minutes`].
    #[must_use]
    pub fn paid_minutes(&self) -> i64 {
        paid_minutes(
            &self.start_time,
            &self.end_time,
            self.second_start_time.as_ref().zip(self.second_end_time.as_ref()),
            self.break_duration_minutes,
        )
    }
}

/// A validated shift ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftDraft {
    pub employee_id: i64,
    pub date: ShiftDate,
    pub shift_type: ShiftType,
    pub start_time: WallTime,
    pub end_time: WallTime,
    pub second_start_time: Option<WallTime>,
    pub second_end_time: Option<WallTime>,
    pub break_duration_minutes: u32,
    pub is_day_off: bool,
    pub status: ShiftStatus,
    pub notes: Option<String>,
    pub schedule_plan_id: Option<i64>,
}

/// Raw shift fields as submitted by a client.
#[derive(Debug, Clone, Copy)]
pub struct ShiftInput<'a> {
    pub employee_id: i64,
    pub date: &'a str,
    pub shift_type: &'a str,
    pub start_time: &'a str,
    pub end_time: &'a str,
    pub second_start_time: Option<&'a str>,
    pub second_end_time: Option<&'a str>,
    pub break_duration_minutes: Option<i64>,
    pub is_day_off: bool,
    pub schedule_plan_id: Option<i64>,
    pub notes: Option<&'a str>,
}

impl ShiftDraft {
    /// Validates submitted shift fields, reporting every failing field.
    ///
    /// Field names in the report are prefixed with `prefix` so that batch
    /// callers can point at a specific item (e.g. `shifts_to_create[1].`).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationFailed` listing each invalid field.
    pub fn validate(input: &ShiftInput<'_>, prefix: &str) -> Result<Self, DomainError> {
        let field = |name: &str| format!("{prefix}{name}");
        let mut collector: ViolationCollector = ViolationCollector::new();

        if input.employee_id <= 0 {
            collector.push(field("employee_id"), "must be a positive employee id");
        }

        let date: Option<ShiftDate> =
            collector.check(&field("date"), ShiftDate::parse(input.date));
        let shift_type: Option<ShiftType> =
            collector.check(&field("shift_type"), ShiftType::from_str(input.shift_type));
        let start_time: Option<WallTime> =
            collector.check(&field("start_time"), WallTime::parse(input.start_time));
        let end_time: Option<WallTime> =
            collector.check(&field("end_time"), WallTime::parse(input.end_time));

        let second_start_time: Option<WallTime> = input
            .second_start_time
            .and_then(|v| collector.check(&field("second_start_time"), WallTime::parse(v)));
        let second_end_time: Option<WallTime> = input
            .second_end_time
            .and_then(|v| collector.check(&field("second_end_time"), WallTime::parse(v)));
        if input.second_start_time.is_some() != input.second_end_time.is_some() {
            collector.push(
                field("second_start_time"),
                "second_start_time and second_end_time must be given together",
            );
        }

        let break_duration_minutes: Option<u32> = collector.check(
            &field("break_duration_minutes"),
            validate_break_minutes(input.break_duration_minutes.unwrap_or(0)),
        );

        collector.finish()?;

        match (date, shift_type, start_time, end_time, break_duration_minutes) {
            (
                Some(date),
                Some(shift_type),
                Some(start_time),
                Some(end_time),
                Some(break_duration_minutes),
            ) => Ok(Self {
                employee_id: input.employee_id,
                date,
                shift_type,
                start_time,
                end_time,
                second_start_time,
                second_end_time,
                break_duration_minutes,
                is_day_off: input.is_day_off,
                status: ShiftStatus::Scheduled,
                notes: input.notes.map(ToString::to_string),
                schedule_plan_id: input.schedule_plan_id,
            }),
            _ => Err(DomainError::ValidationFailed(vec![FieldViolation::new(
                prefix.trim_end_matches('.'),
                "incomplete shift",
            )])),
        }
    }

    /// Paid minutes for this draft. See [`paid_minutes`].
    #[must_use]
    pub fn paid_minutes(&self) -> i64 {
        paid_minutes(
            &self.start_time,
            &self.end_time,
            self.second_start_time.as_ref().zip(self.second_end_time.as_ref()),
            self.break_duration_minutes,
        )
    }
}

/// Validated changes to an existing shift. `None` leaves a field unchanged.
///
/// Nullable columns use a nested option: `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftChanges {
    pub employee_id: Option<i64>,
    pub date: Option<ShiftDate>,
    pub shift_type: Option<ShiftType>,
    pub start_time: Option<WallTime>,
    pub end_time: Option<WallTime>,
    pub second_start_time: Option<Option<WallTime>>,
    pub second_end_time: Option<Option<WallTime>>,
    pub break_duration_minutes: Option<u32>,
    pub is_day_off: Option<bool>,
    pub status: Option<ShiftStatus>,
    pub notes: Option<Option<String>>,
}

/// Raw partial shift fields as submitted by a client.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftChangesInput<'a> {
    pub employee_id: Option<i64>,
    pub date: Option<&'a str>,
    pub shift_type: Option<&'a str>,
    pub start_time: Option<&'a str>,
    pub end_time: Option<&'a str>,
    pub second_start_time: Option<Option<&'a str>>,
    pub second_end_time: Option<Option<&'a str>>,
    pub break_duration_minutes: Option<i64>,
    pub is_day_off: Option<bool>,
    pub status: Option<&'a str>,
    pub notes: Option<Option<&'a str>>,
}

impl ShiftChangesInput<'_> {
    /// Names of every field present in the request other than `notes`.
    #[must_use]
    pub fn fields_other_than_notes(&self) -> Vec<&'static str> {
        let present: [(&'static str, bool); 10] = [
            ("employee_id", self.employee_id.is_some()),
            ("date", self.date.is_some()),
            ("shift_type", self.shift_type.is_some()),
            ("start_time", self.start_time.is_some()),
            ("end_time", self.end_time.is_some()),
            ("second_start_time", self.second_start_time.is_some()),
            ("second_end_time", self.second_end_time.is_some()),
            ("break_duration_minutes", self.break_duration_minutes.is_some()),
            ("is_day_off", self.is_day_off.is_some()),
            ("status", self.status.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(name, is_present)| is_present.then_some(name))
            .collect()
    }

    /// Names of present fields that a grid sync may not change.
    ///
    /// A grid cell belongs to one employee and one date, and its status is
    /// managed outside the grid.
    #[must_use]
    pub fn fields_locked_in_grid(&self) -> Vec<&'static str> {
        let present: [(&'static str, bool); 3] = [
            ("employee_id", self.employee_id.is_some()),
            ("date", self.date.is_some()),
            ("status", self.status.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(name, is_present)| is_present.then_some(name))
            .collect()
    }
}

impl ShiftChanges {
    /// Validates a partial update, reporting every failing field.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationFailed` listing each invalid field.
    pub fn validate(input: &ShiftChangesInput<'_>, prefix: &str) -> Result<Self, DomainError> {
        let field = |name: &str| format!("{prefix}{name}");
        let mut collector: ViolationCollector = ViolationCollector::new();
        let mut changes: Self = Self {
            employee_id: input.employee_id,
            is_day_off: input.is_day_off,
            notes: input.notes.map(|n| n.map(ToString::to_string)),
            ..Self::default()
        };

        if input.employee_id.is_some_and(|id| id <= 0) {
            collector.push(field("employee_id"), "must be a positive employee id");
        }
        if let Some(v) = input.date {
            changes.date = collector.check(&field("date"), ShiftDate::parse(v));
        }
        if let Some(v) = input.shift_type {
            changes.shift_type = collector.check(&field("shift_type"), ShiftType::from_str(v));
        }
        if let Some(v) = input.start_time {
            changes.start_time = collector.check(&field("start_time"), WallTime::parse(v));
        }
        if let Some(v) = input.end_time {
            changes.end_time = collector.check(&field("end_time"), WallTime::parse(v));
        }
        if let Some(v) = input.second_start_time {
            changes.second_start_time = match v {
                None => Some(None),
                Some(text) => collector
                    .check(&field("second_start_time"), WallTime::parse(text))
                    .map(Some),
            };
        }
        if let Some(v) = input.second_end_time {
            changes.second_end_time = match v {
                None => Some(None),
                Some(text) => collector
                    .check(&field("second_end_time"), WallTime::parse(text))
                    .map(Some),
            };
        }
        if let Some(v) = input.break_duration_minutes {
            changes.break_duration_minutes =
                collector.check(&field("break_duration_minutes"), validate_break_minutes(v));
        }
        if let Some(v) = input.status {
            changes.status = collector.check(&field("status"), ShiftStatus::from_str(v));
        }

        collector.finish()?;
        Ok(changes)
    }

    /// Returns `true` when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.employee_id.is_none()
            && self.date.is_none()
            && self.shift_type.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.second_start_time.is_none()
            && self.second_end_time.is_none()
            && self.break_duration_minutes.is_none()
            && self.is_day_off.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}

/// Validates a break length in minutes.
///
/// # Errors
///
/// Returns `DomainError::InvalidBreakMinutes` if the value is negative or too large.
pub fn validate_break_minutes(value: i64) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| DomainError::InvalidBreakMinutes(value))
}

/// Finds an existing shift that collides with a new one.
///
/// Two shifts collide only when they share the exact start time text or the
/// exact end time text. Partially overlapping intervals such as 09:00-12:00
/// and 10:00-14:00 do not collide.
#[must_use]
pub fn find_weak_conflict<'a>(
    existing: &'a [Shift],
    start_time: &WallTime,
    end_time: &WallTime,
) -> Option<&'a Shift> {
    existing.iter().find(|shift| {
        shift.start_time.as_str() == start_time.as_str()
            || shift.end_time.as_str() == end_time.as_str()
    })
}

/// Checks a draft against the employee's other shifts on the same date.
///
/// # Errors
///
/// Returns `DomainError::ShiftConflict` naming the first colliding shift.
pub fn check_shift_conflict(draft: &ShiftDraft, same_day: &[Shift]) -> Result<(), DomainError> {
    match find_weak_conflict(same_day, &draft.start_time, &draft.end_time) {
        Some(existing) => Err(DomainError::ShiftConflict {
            employee_id: draft.employee_id,
            date: draft.date.to_string(),
            existing_shift_id: existing.shift_id,
        }),
        None => Ok(()),
    }
}

/// Minutes from `start` to `end`, wrapping past midnight when `end` is earlier.
#[must_use]
pub fn span_minutes(start: &WallTime, end: &WallTime) -> i64 {
    let span: i64 = i64::from(end.minutes_of_day()) - i64::from(start.minutes_of_day());
    if span < 0 { span + MINUTES_PER_DAY } else { span }
}

/// Paid minutes: the main span plus the optional second span, minus the break.
#[must_use]
pub fn paid_minutes(
    start: &WallTime,
    end: &WallTime,
    second: Option<(&WallTime, &WallTime)>,
    break_minutes: u32,
) -> i64 {
    let second_span: i64 = second.map_or(0, |(s, e)| span_minutes(s, e));
    span_minutes(start, end) + second_span - i64::from(break_minutes)
}
