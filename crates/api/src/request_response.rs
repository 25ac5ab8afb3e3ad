// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use serde::{Deserialize, Deserializer, Serialize};
use shiftdesk_domain::{
    BreakInterval, ClockRecord, DomainError, Employee, SchedulePlan, Shift, ShiftChangesInput,
    ShiftInput, format_timestamp,
};

/// Keeps `null` distinct from an absent field: absent is `None`, `null` is
/// `Some(None)`. Use with `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Staff identity
// ============================================================================

/// Creates the first admin on an empty database.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BootstrapRequest {
    pub login_name: String,
    pub full_name: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub login_name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    pub session_token: String,
    pub employee: EmployeeInfo,
}

/// An employee as shown to staff. The PIN itself is never returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeInfo {
    pub employee_id: i64,
    pub full_name: String,
    pub role: String,
    pub employment_status: String,
    pub login_name: Option<String>,
    pub has_kiosk_pin: bool,
}

impl From<&Employee> for EmployeeInfo {
    fn from(employee: &Employee) -> Self {
        Self {
            employee_id: employee.employee_id,
            full_name: employee.full_name.clone(),
            role: employee.role.as_str().to_string(),
            employment_status: employee.employment_status.as_str().to_string(),
            login_name: employee.login_name.clone(),
            has_kiosk_pin: employee.kiosk_pin.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateEmployeeRequest {
    pub full_name: String,
    pub role: String,
    #[serde(default)]
    pub login_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_confirmation: Option<String>,
    #[serde(default)]
    pub kiosk_pin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetKioskPinRequest {
    pub pin: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true }
    }
}

// ============================================================================
// Shifts
// ============================================================================

/// Query string for listing shifts. Dates are inclusive bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShiftListQuery {
    pub employee_id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateShiftRequest {
    pub employee_id: i64,
    pub date: String,
    pub shift_type: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub second_start_time: Option<String>,
    #[serde(default)]
    pub second_end_time: Option<String>,
    #[serde(default)]
    pub break_duration_minutes: Option<i64>,
    #[serde(default)]
    pub is_day_off: Option<bool>,
    #[serde(default)]
    pub schedule_plan_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateShiftRequest {
    /// Borrows the request as raw shift input.
    #[must_use]
    pub fn as_input(&self) -> ShiftInput<'_> {
        ShiftInput {
            employee_id: self.employee_id,
            date: &self.date,
            shift_type: &self.shift_type,
            start_time: &self.start_time,
            end_time: &self.end_time,
            second_start_time: self.second_start_time.as_deref(),
            second_end_time: self.second_end_time.as_deref(),
            break_duration_minutes: self.break_duration_minutes,
            is_day_off: self.is_day_off.unwrap_or(false),
            schedule_plan_id: self.schedule_plan_id,
            notes: self.notes.as_deref(),
        }
    }
}

/// Partial shift update. Nullable fields accept `null` to clear them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateShiftRequest {
    #[serde(default)]
    pub employee_id: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub shift_type: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub second_start_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub second_end_time: Option<Option<String>>,
    #[serde(default)]
    pub break_duration_minutes: Option<i64>,
    #[serde(default)]
    pub is_day_off: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl UpdateShiftRequest {
    /// Borrows the request as raw partial input.
    #[must_use]
    pub fn as_input(&self) -> ShiftChangesInput<'_> {
        ShiftChangesInput {
            employee_id: self.employee_id,
            date: self.date.as_deref(),
            shift_type: self.shift_type.as_deref(),
            start_time: self.start_time.as_deref(),
            end_time: self.end_time.as_deref(),
            second_start_time: self.second_start_time.as_ref().map(Option::as_deref),
            second_end_time: self.second_end_time.as_ref().map(Option::as_deref),
            break_duration_minutes: self.break_duration_minutes,
            is_day_off: self.is_day_off,
            status: self.status.as_deref(),
            notes: self.notes.as_ref().map(Option::as_deref),
        }
    }
}

/// Employee fields embedded in shift listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeSummary {
    pub employee_id: i64,
    pub full_name: String,
    pub role: String,
}

impl From<&Employee> for EmployeeSummary {
    fn from(employee: &Employee) -> Self {
        Self {
            employee_id: employee.employee_id,
            full_name: employee.full_name.clone(),
            role: employee.role.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftResponse {
    pub shift_id: i64,
    pub employee_id: i64,
    pub date: String,
    pub shift_type: String,
    pub start_time: String,
    pub end_time: String,
    pub second_start_time: Option<String>,
    pub second_end_time: Option<String>,
    pub break_duration_minutes: u32,
    pub is_day_off: bool,
    pub status: String,
    pub notes: Option<String>,
    pub schedule_plan_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
    pub employee: Option<EmployeeSummary>,
}

impl ShiftResponse {
    #[must_use]
    pub fn new(shift: &Shift, employee: Option<EmployeeSummary>) -> Self {
        Self {
            shift_id: shift.shift_id,
            employee_id: shift.employee_id,
            date: shift.date.to_string(),
            shift_type: shift.shift_type.as_str().to_string(),
            start_time: shift.start_time.as_str().to_string(),
            end_time: shift.end_time.as_str().to_string(),
            second_start_time: shift.second_start_time.as_ref().map(ToString::to_string),
            second_end_time: shift.second_end_time.as_ref().map(ToString::to_string),
            break_duration_minutes: shift.break_duration_minutes,
            is_day_off: shift.is_day_off,
            status: shift.status.as_str().to_string(),
            notes: shift.notes.clone(),
            schedule_plan_id: shift.schedule_plan_id,
            created_at: shift.created_at.clone(),
            updated_at: shift.updated_at.clone(),
            employee,
        }
    }
}

// ============================================================================
// Schedule plans
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WeekQuery {
    pub week_start_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatePlanRequest {
    pub week_start_date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdatePlanRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CopyPlanRequest {
    pub target_week_start_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanResponse {
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

impl From<&SchedulePlan> for PlanResponse {
    fn from(plan: &SchedulePlan) -> Self {
        Self {
            plan_id: plan.plan_id,
            week_start_date: plan.week_start_date.to_string(),
            status: plan.status.as_str().to_string(),
            version: plan.version,
            created_by: plan.created_by,
            copied_from_plan_id: plan.copied_from_plan_id,
            notes: plan.notes.clone(),
            created_at: plan.created_at.clone(),
            updated_at: plan.updated_at.clone(),
        }
    }
}

/// A plan (or none) with its shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanWithShiftsResponse {
    pub plan: Option<PlanResponse>,
    pub shifts: Vec<ShiftResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanOnlyResponse {
    pub plan: PlanResponse,
}

/// One shift update inside a sync request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncUpdateItem {
    pub id: i64,
    #[serde(flatten)]
    pub fields: UpdateShiftRequest,
}

/// A batch of grid edits for one plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SyncRequest {
    #[serde(default, alias = "toCreate")]
    pub shifts_to_create: Vec<CreateShiftRequest>,
    #[serde(default, alias = "toUpdate")]
    pub shifts_to_update: Vec<SyncUpdateItem>,
    #[serde(default, alias = "toDelete")]
    pub shifts_to_delete: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncResults {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResponse {
    pub results: SyncResults,
    pub shifts: Vec<ShiftResponse>,
}

// ============================================================================
// Kiosk and clock records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyPinRequest {
    pub pin: String,
}

/// Today's scheduled shift as shown on the kiosk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodayShift {
    pub shift_id: i64,
    pub shift_type: String,
    pub start_time: String,
    pub end_time: String,
}

impl From<&Shift> for TodayShift {
    fn from(shift: &Shift) -> Self {
        Self {
            shift_id: shift.shift_id,
            shift_type: shift.shift_type.as_str().to_string(),
            start_time: shift.start_time.as_str().to_string(),
            end_time: shift.end_time.as_str().to_string(),
        }
    }
}

/// An employee's clock state snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KioskStatusResponse {
    pub employee_id: i64,
    pub full_name: String,
    pub role: String,
    pub status: String,
    pub clock_record_id: Option<i64>,
    pub clock_in_time: Option<String>,
    pub active_break_id: Option<i64>,
    pub break_start_time: Option<String>,
    pub today_shift: Option<TodayShift>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyPinResponse {
    #[serde(flatten)]
    pub status: KioskStatusResponse,
    pub session_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct KioskClockInRequest {
    pub employee_id: i64,
    #[serde(default)]
    pub shift_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct KioskClockOutRequest {
    pub employee_id: i64,
    pub clock_record_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KioskBreakRequest {
    pub employee_id: i64,
    pub clock_record_id: i64,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakResponse {
    pub break_id: i64,
    pub clock_record_id: i64,
    pub start_time: String,
    pub end_time: Option<String>,
}

impl TryFrom<&BreakInterval> for BreakResponse {
    type Error = DomainError;

    fn try_from(interval: &BreakInterval) -> Result<Self, Self::Error> {
        Ok(Self {
            break_id: interval.break_id,
            clock_record_id: interval.clock_record_id,
            start_time: format_timestamp(interval.start_time)?,
            end_time: interval.end_time.map(format_timestamp).transpose()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockRecordResponse {
    pub clock_record_id: i64,
    pub employee_id: i64,
    pub shift_id: Option<i64>,
    pub clock_in_time: String,
    pub clock_out_time: Option<String>,
    pub breaks: Vec<BreakResponse>,
}

impl ClockRecordResponse {
    /// Builds the response for a record and its breaks.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn new(record: &ClockRecord, breaks: &[BreakInterval]) -> Result<Self, DomainError> {
        Ok(Self {
            clock_record_id: record.clock_record_id,
            employee_id: record.employee_id,
            shift_id: record.shift_id,
            clock_in_time: format_timestamp(record.clock_in_time)?,
            clock_out_time: record.clock_out_time.map(format_timestamp).transpose()?,
            breaks: breaks
                .iter()
                .map(BreakResponse::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockInResponse {
    pub clock_record: ClockRecordResponse,
    pub shift: Option<TodayShift>,
}

/// The scheduled shift a session was linked to, for variance display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledShift {
    pub start_time: String,
    pub end_time: String,
    pub shift_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockOutSummary {
    pub clock_record_id: i64,
    pub clock_in_time: String,
    pub clock_out_time: String,
    pub total_minutes: i64,
    pub break_minutes: i64,
    pub net_minutes: i64,
    pub scheduled_shift: Option<ScheduledShift>,
}

/// Feedback on a finished shift, submitted from the kiosk after clock-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShiftSurveyRequest {
    pub employee_id: i64,
    pub clock_record_id: i64,
    pub rating: i64,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub anomaly_type: Option<String>,
    #[serde(default)]
    pub anomaly_reason: Option<String>,
    #[serde(default)]
    pub anomaly_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftSurveyResponse {
    pub success: bool,
    pub survey_id: i64,
    pub worked_minutes: i64,
    pub scheduled_minutes: Option<i64>,
    pub variance_minutes: Option<i64>,
    pub break_variance_minutes: i64,
}

/// Query string for listing clock records by clock-in date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClockRecordQuery {
    pub employee_id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
