// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and their conversions into domain values.

use std::str::FromStr;

use diesel::prelude::*;
use shiftdesk_domain::{
    BreakInterval, ClockRecord, Employee, EmployeeRole, EmploymentStatus, PlanStatus,
    SchedulePlan, Shift, ShiftChanges, ShiftDate, ShiftDraft, ShiftStatus, ShiftType, WallTime,
    parse_timestamp,
};

use crate::diesel_schema::{
    clock_breaks, clock_in_out, employees, schedule_plans, shift_survey_responses, shifts,
    staff_sessions,
};
use crate::error::PersistenceError;

/// A staff login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub employee_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// Fields for a new employee row.
#[derive(Debug, Clone, Copy)]
pub struct NewEmployeeData<'a> {
    pub full_name: &'a str,
    pub role: EmployeeRole,
    pub login_name: Option<&'a str>,
    /// Plain text; hashed before it is stored.
    pub password: Option<&'a str>,
    pub kiosk_pin: Option<&'a str>,
    pub created_at: &'a str,
}

/// Filters for listing shifts. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftFilter {
    pub employee_id: Option<i64>,
    pub start_date: Option<ShiftDate>,
    pub end_date: Option<ShiftDate>,
    pub status: Option<ShiftStatus>,
    pub schedule_plan_id: Option<i64>,
}

/// Filters for listing clock records by clock-in date. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockRecordFilter {
    pub employee_id: Option<i64>,
    pub start_date: Option<ShiftDate>,
    pub end_date: Option<ShiftDate>,
}

/// Changes to a plan row. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanChanges {
    pub status: Option<PlanStatus>,
    pub notes: Option<Option<String>>,
}

/// Fields for a new plan row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlanData {
    pub week_start_date: ShiftDate,
    pub version: i32,
    pub created_by: i64,
    pub copied_from_plan_id: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct EmployeeRow {
    pub employee_id: i64,
    pub full_name: String,
    pub role: String,
    pub employment_status: String,
    pub kiosk_pin: Option<String>,
    pub login_name: Option<String>,
    pub password_hash: Option<String>,
    pub created_at: String,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = PersistenceError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_id: row.employee_id,
            full_name: row.full_name,
            role: EmployeeRole::from_str(&row.role)?,
            employment_status: EmploymentStatus::from_str(&row.employment_status)?,
            kiosk_pin: row.kiosk_pin,
            login_name: row.login_name,
            created_at: row.created_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = employees)]
pub(crate) struct NewEmployeeRow<'a> {
    pub full_name: &'a str,
    pub role: &'a str,
    pub employment_status: &'a str,
    pub kiosk_pin: Option<&'a str>,
    pub login_name: Option<String>,
    pub password_hash: Option<String>,
    pub created_at: &'a str,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = staff_sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct SessionRow {
    pub session_id: i64,
    pub session_token: String,
    pub employee_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

impl From<SessionRow> for SessionData {
    fn from(row: SessionRow) -> Self {
        Self {
            session_id: row.session_id,
            session_token: row.session_token,
            employee_id: row.employee_id,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = shifts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ShiftRow {
    pub shift_id: i64,
    pub employee_id: i64,
    pub date: String,
    pub shift_type: String,
    pub start_time: String,
    pub end_time: String,
    pub second_start_time: Option<String>,
    pub second_end_time: Option<String>,
    pub break_duration_minutes: i32,
    pub is_day_off: bool,
    pub status: String,
    pub notes: Option<String>,
    pub schedule_plan_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ShiftRow> for Shift {
    type Error = PersistenceError;

    fn try_from(row: ShiftRow) -> Result<Self, Self::Error> {
        let break_duration_minutes: u32 =
            u32::try_from(row.break_duration_minutes).map_err(|_| {
                PersistenceError::ReconstructionError(format!(
                    "shift {} has negative break length {}",
                    row.shift_id, row.break_duration_minutes
                ))
            })?;

        Ok(Self {
            shift_id: row.shift_id,
            employee_id: row.employee_id,
            date: ShiftDate::parse(&row.date)?,
            shift_type: ShiftType::from_str(&row.shift_type)?,
            start_time: WallTime::parse(&row.start_time)?,
            end_time: WallTime::parse(&row.end_time)?,
            second_start_time: row
                .second_start_time
                .as_deref()
                .map(WallTime::parse)
                .transpose()?,
            second_end_time: row
                .second_end_time
                .as_deref()
                .map(WallTime::parse)
                .transpose()?,
            break_duration_minutes,
            is_day_off: row.is_day_off,
            status: ShiftStatus::from_str(&row.status)?,
            notes: row.notes,
            schedule_plan_id: row.schedule_plan_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = shifts)]
pub(crate) struct NewShiftRow<'a> {
    pub employee_id: i64,
    pub date: String,
    pub shift_type: &'static str,
    pub start_time: &'a str,
    pub end_time: &'a str,
    pub second_start_time: Option<&'a str>,
    pub second_end_time: Option<&'a str>,
    pub break_duration_minutes: i32,
    pub is_day_off: bool,
    pub status: &'static str,
    pub notes: Option<&'a str>,
    pub schedule_plan_id: Option<i64>,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

impl<'a> NewShiftRow<'a> {
    pub(crate) fn from_draft(draft: &'a ShiftDraft, now: &'a str) -> Result<Self, PersistenceError> {
        Ok(Self {
            employee_id: draft.employee_id,
            date: draft.date.to_string(),
            shift_type: draft.shift_type.as_str(),
            start_time: draft.start_time.as_str(),
            end_time: draft.end_time.as_str(),
            second_start_time: draft.second_start_time.as_ref().map(WallTime::as_str),
            second_end_time: draft.second_end_time.as_ref().map(WallTime::as_str),
            break_duration_minutes: minutes_column(draft.break_duration_minutes)?,
            is_day_off: draft.is_day_off,
            status: draft.status.as_str(),
            notes: draft.notes.as_deref(),
            schedule_plan_id: draft.schedule_plan_id,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = shifts)]
pub(crate) struct ShiftChangeset<'a> {
    pub employee_id: Option<i64>,
    pub date: Option<String>,
    pub shift_type: Option<&'static str>,
    pub start_time: Option<&'a str>,
    pub end_time: Option<&'a str>,
    pub second_start_time: Option<Option<&'a str>>,
    pub second_end_time: Option<Option<&'a str>>,
    pub break_duration_minutes: Option<i32>,
    pub is_day_off: Option<bool>,
    pub status: Option<&'static str>,
    pub notes: Option<Option<&'a str>>,
    pub updated_at: &'a str,
}

impl<'a> ShiftChangeset<'a> {
    pub(crate) fn from_changes(
        changes: &'a ShiftChanges,
        now: &'a str,
    ) -> Result<Self, PersistenceError> {
        Ok(Self {
            employee_id: changes.employee_id,
            date: changes.date.map(|d| d.to_string()),
            shift_type: changes.shift_type.map(|t| t.as_str()),
            start_time: changes.start_time.as_ref().map(WallTime::as_str),
            end_time: changes.end_time.as_ref().map(WallTime::as_str),
            second_start_time: changes
                .second_start_time
                .as_ref()
                .map(|v| v.as_ref().map(WallTime::as_str)),
            second_end_time: changes
                .second_end_time
                .as_ref()
                .map(|v| v.as_ref().map(WallTime::as_str)),
            break_duration_minutes: changes
                .break_duration_minutes
                .map(minutes_column)
                .transpose()?,
            is_day_off: changes.is_day_off,
            status: changes.status.map(|s| s.as_str()),
            notes: changes.notes.as_ref().map(Option::as_deref),
            updated_at: now,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = schedule_plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct PlanRow {
    pub plan_id: i64,
    pub week_start_date: String,
    pub status: String,
    pub version: i32,
    pub created_by: i64,
    pub copied_from_plan_id: Option<i64>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<PlanRow> for SchedulePlan {
    type Error = PersistenceError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        Ok(Self {
            plan_id: row.plan_id,
            week_start_date: ShiftDate::parse(&row.week_start_date)?,
            status: PlanStatus::from_str(&row.status)?,
            version: row.version,
            created_by: row.created_by,
            copied_from_plan_id: row.copied_from_plan_id,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = schedule_plans)]
pub(crate) struct NewPlanRow<'a> {
    pub week_start_date: String,
    pub status: &'static str,
    pub version: i32,
    pub created_by: i64,
    pub copied_from_plan_id: Option<i64>,
    pub notes: Option<&'a str>,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = schedule_plans)]
pub(crate) struct PlanChangeset<'a> {
    pub status: Option<&'static str>,
    pub notes: Option<Option<&'a str>>,
    pub updated_at: &'a str,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = clock_in_out)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ClockRecordRow {
    pub clock_record_id: i64,
    pub employee_id: i64,
    pub shift_id: Option<i64>,
    pub clock_in_time: String,
    pub clock_out_time: Option<String>,
}

impl TryFrom<ClockRecordRow> for ClockRecord {
    type Error = PersistenceError;

    fn try_from(row: ClockRecordRow) -> Result<Self, Self::Error> {
        Ok(Self {
            clock_record_id: row.clock_record_id,
            employee_id: row.employee_id,
            clock_in_time: parse_timestamp(&row.clock_in_time)?,
            clock_out_time: row
                .clock_out_time
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            shift_id: row.shift_id,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = clock_in_out)]
pub(crate) struct NewClockRecordRow<'a> {
    pub employee_id: i64,
    pub shift_id: Option<i64>,
    pub clock_in_time: &'a str,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = clock_breaks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct BreakRow {
    pub break_id: i64,
    pub clock_record_id: i64,
    pub start_time: String,
    pub end_time: Option<String>,
}

impl TryFrom<BreakRow> for BreakInterval {
    type Error = PersistenceError;

    fn try_from(row: BreakRow) -> Result<Self, Self::Error> {
        Ok(Self {
            break_id: row.break_id,
            clock_record_id: row.clock_record_id,
            start_time: parse_timestamp(&row.start_time)?,
            end_time: row.end_time.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = clock_breaks)]
pub(crate) struct NewBreakRow<'a> {
    pub clock_record_id: i64,
    pub start_time: &'a str,
}

/// A stored post-clock-out survey.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = shift_survey_responses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SurveyData {
    pub survey_id: i64,
    pub clock_record_id: i64,
    pub employee_id: i64,
    pub rating: i32,
    pub feedback: Option<String>,
    pub shift_type: Option<String>,
    pub worked_minutes: i64,
    pub scheduled_minutes: Option<i64>,
    pub variance_minutes: Option<i64>,
    pub break_variance_minutes: i64,
    pub anomaly_type: Option<String>,
    pub anomaly_reason: Option<String>,
    pub anomaly_comment: Option<String>,
    pub created_at: String,
}

/// Fields for a new survey row.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = shift_survey_responses)]
pub struct NewSurveyData<'a> {
    pub clock_record_id: i64,
    pub employee_id: i64,
    pub rating: i32,
    pub feedback: Option<&'a str>,
    pub shift_type: Option<&'a str>,
    pub worked_minutes: i64,
    pub scheduled_minutes: Option<i64>,
    pub variance_minutes: Option<i64>,
    pub break_variance_minutes: i64,
    pub anomaly_type: Option<&'a str>,
    pub anomaly_reason: Option<&'a str>,
    pub anomaly_comment: Option<&'a str>,
    pub created_at: &'a str,
}

/// Converts a minute count to the `INTEGER` column type.
fn minutes_column(minutes: u32) -> Result<i32, PersistenceError> {
    i32::try_from(minutes)
        .map_err(|_| PersistenceError::Other(format!("break length {minutes} is too large")))
}
