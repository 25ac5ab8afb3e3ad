// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Labor constraint checks over a week of shifts.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use time::Weekday;

use crate::calendar::ShiftDate;
use crate::shift::Shift;

const MINUTES_PER_DAY: i64 = 24 * 60;
const DAYS_PER_WEEK: i64 = 7;

/// Limits a weekly schedule is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaborConstraints {
    pub max_weekly_hours: u32,
    pub min_rest_hours: u32,
    pub min_days_off: u32,
    pub overtime_warning_hours: u32,
}

impl Default for LaborConstraints {
    fn default() -> Self {
        Self {
            max_weekly_hours: 40,
            min_rest_hours: 12,
            min_days_off: 2,
            overtime_warning_hours: 35,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MaxHours,
    MinRest,
    DaysOff,
    Coverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// One finding from [`validate_schedule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleViolation {
    pub employee_id: Option<i64>,
    pub employee_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub message: String,
    pub severity: Severity,
}

/// The outcome of checking a week of shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleValidation {
    pub valid: bool,
    pub errors: Vec<ScheduleViolation>,
    pub warnings: Vec<ScheduleViolation>,
}

/// Checks a week of shifts against the labor constraints.
///
/// Day-off shifts never count as work. Per employee the weekly paid hours,
/// the rest between consecutive shifts and the number of days off are
/// checked; across the week a Sunday with nobody working is a warning.
///
/// # Arguments
///
/// * `shifts` - The week's shifts, in any order
/// * `employee_names` - Display names by employee id
/// * `week_start` - The first day of the week
/// * `constraints` - The limits to apply
#[must_use]
pub fn validate_schedule(
    shifts: &[Shift],
    employee_names: &HashMap<i64, String>,
    week_start: ShiftDate,
    constraints: &LaborConstraints,
) -> ScheduleValidation {
    let mut errors: Vec<ScheduleViolation> = Vec::new();
    let mut warnings: Vec<ScheduleViolation> = Vec::new();

    let mut by_employee: BTreeMap<i64, Vec<&Shift>> = BTreeMap::new();
    for shift in shifts.iter().filter(|s| !s.is_day_off) {
        by_employee.entry(shift.employee_id).or_default().push(shift);
    }

    for (employee_id, mut work) in by_employee {
        let name: String = employee_names
            .get(&employee_id)
            .cloned()
            .unwrap_or_else(|| format!("Employee {employee_id}"));
        let violation = |kind: ViolationKind, severity: Severity, message: String| {
            ScheduleViolation {
                employee_id: Some(employee_id),
                employee_name: Some(name.clone()),
                kind,
                message,
                severity,
            }
        };

        let paid: i64 = work.iter().map(|s| s.paid_minutes()).sum();
        let hours: String = format_hours(paid);
        if paid > i64::from(constraints.max_weekly_hours) * 60 {
            errors.push(violation(
                ViolationKind::MaxHours,
                Severity::Error,
                format!(
                    "{name} has {hours}h scheduled (max {}h)",
                    constraints.max_weekly_hours
                ),
            ));
        } else if paid > i64::from(constraints.overtime_warning_hours) * 60 {
            warnings.push(violation(
                ViolationKind::MaxHours,
                Severity::Warning,
                format!("{name} is approaching overtime: {hours}h"),
            ));
        }

        work.sort_by_key(|s| shift_start_minute(s));
        for pair in work.windows(2) {
            let rest_minutes: i64 = shift_start_minute(pair[1]) - shift_end_minute(pair[0]);
            let rest_hours: i64 = rest_minutes.div_euclid(60);
            if rest_minutes >= 0 && rest_hours < i64::from(constraints.min_rest_hours) {
                errors.push(violation(
                    ViolationKind::MinRest,
                    Severity::Error,
                    format!(
                        "{name} has only {rest_hours}h rest between {} and {} (min {}h)",
                        weekday_abbrev(pair[0].date.weekday()),
                        weekday_abbrev(pair[1].date.weekday()),
                        constraints.min_rest_hours
                    ),
                ));
            }
        }

        let working_days: BTreeSet<ShiftDate> = work.iter().map(|s| s.date).collect();
        let working_day_count: i64 = i64::try_from(working_days.len()).unwrap_or(DAYS_PER_WEEK);
        let days_off: i64 = DAYS_PER_WEEK - working_day_count;
        if days_off < i64::from(constraints.min_days_off) {
            errors.push(violation(
                ViolationKind::DaysOff,
                Severity::Error,
                format!(
                    "{name} has only {days_off} day(s) off (min {})",
                    constraints.min_days_off
                ),
            ));
        }
    }

    if let Some(sunday) = week_sunday(week_start) {
        let covered: bool = shifts.iter().any(|s| !s.is_day_off && s.date == sunday);
        if !covered {
            warnings.push(ScheduleViolation {
                employee_id: None,
                employee_name: None,
                kind: ViolationKind::Coverage,
                message: format!("No staff scheduled on Sunday {sunday}"),
                severity: Severity::Warning,
            });
        }
    }

    ScheduleValidation {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Absolute minute, counted from Julian day zero, at which the shift starts.
fn shift_start_minute(shift: &Shift) -> i64 {
    day_minute(shift.date) + i64::from(shift.start_time.minutes_of_day())
}

/// The shift's last segment end; a segment that ends before the shift
/// started finishes on the following day.
fn shift_end_minute(shift: &Shift) -> i64 {
    let end = shift.second_end_time.as_ref().unwrap_or(&shift.end_time);
    let mut minute: i64 = day_minute(shift.date) + i64::from(end.minutes_of_day());
    if end.minutes_of_day() < shift.start_time.minutes_of_day() {
        minute += MINUTES_PER_DAY;
    }
    minute
}

fn day_minute(date: ShiftDate) -> i64 {
    i64::from(date.date().to_julian_day()) * MINUTES_PER_DAY
}

fn week_sunday(week_start: ShiftDate) -> Option<ShiftDate> {
    (0..DAYS_PER_WEEK)
        .filter_map(|offset| week_start.add_days(offset).ok())
        .find(|d| d.weekday() == Weekday::Sunday)
}

fn format_hours(minutes: i64) -> String {
    let tenths: i64 = (minutes * 10 + 30).div_euclid(60);
    format!("{}.{}", tenths.div_euclid(10), tenths.rem_euclid(10))
}

const fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}
