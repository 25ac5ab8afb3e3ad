// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Kiosk handlers: PIN verification, clock in and out, breaks, status and
//! the post-clock-out shift survey.
//!
//! Clock changes go through the state machine in the core crate. The current
//! [`ClockState`] is derived from the open record and open break, the command
//! is applied, and the resulting effects are written in one transaction.

use shiftdesk::{ClockCommand, ClockState, Transition, apply};
use shiftdesk_domain::{
    BreakInterval, ClockRecord, ClockSummary, Employee, FieldViolation, RestaurantTimezone,
    Shift, ShiftDate, ShiftVariance, ViolationCollector, format_timestamp, shift_variance,
    summarize_session,
};
use shiftdesk_persistence::{NewSurveyData, Persistence};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::credential_policy::validate_pin;
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::kiosk_session::{KioskClaims, KioskSessionError, KioskSessionSigner};
use crate::rate_limiter::PinAttemptLimiter;
use crate::request_response::{
    BreakResponse, ClockInResponse, ClockOutSummary, ClockRecordResponse, KioskBreakRequest,
    KioskClockInRequest, KioskClockOutRequest, KioskStatusResponse, ScheduledShift,
    ShiftSurveyRequest, ShiftSurveyResponse, TodayShift, VerifyPinRequest, VerifyPinResponse,
};

/// Verifies a kiosk token.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` for a missing, invalid or
/// expired token, or `Unavailable` if no secret is configured.
pub fn authenticate_kiosk(
    signer: &KioskSessionSigner,
    token: Option<&str>,
    now: OffsetDateTime,
) -> Result<KioskClaims, ApiError> {
    signer
        .verify(token.unwrap_or_default(), now)
        .map_err(|e| {
            let event: &str = match e {
                KioskSessionError::Expired => "expired_session_token",
                KioskSessionError::Missing => "missing_session_token",
                _ => "invalid_session_token",
            };
            warn!(security_event = event, error = %e, "Kiosk session rejected");
            ApiError::from(e)
        })
}

/// Rejects a request whose body names a different employee than its token.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` on mismatch.
pub fn ensure_same_employee(claims: &KioskClaims, employee_id: i64) -> Result<(), ApiError> {
    if claims.employee_id == employee_id {
        return Ok(());
    }
    warn!(
        security_event = "employee_id_mismatch",
        token_employee_id = claims.employee_id,
        body_employee_id = employee_id,
        "Kiosk request for another employee"
    );
    Err(ApiError::Unauthorized {
        action: String::from("kiosk"),
        reason: String::from("Session does not match employee"),
    })
}

fn current_state(persistence: &mut Persistence, employee_id: i64) -> Result<ClockState, ApiError> {
    let record: Option<ClockRecord> = persistence
        .open_clock_record(employee_id)
        .map_err(translate_persistence_error)?;
    let open_break: Option<BreakInterval> = match &record {
        Some(record) => persistence
            .open_break(record.clock_record_id)
            .map_err(translate_persistence_error)?,
        None => None,
    };
    Ok(ClockState::derive(record.as_ref(), open_break.as_ref()))
}

/// Runs one command against the employee's clock and stores its effects.
///
/// Returns the state the command started from and the record it touched.
fn run_command(
    persistence: &mut Persistence,
    employee_id: i64,
    command: ClockCommand,
    now: OffsetDateTime,
) -> Result<(ClockState, Option<i64>), ApiError> {
    let state: ClockState = current_state(persistence, employee_id)?;
    let transition: Transition = apply(&state, command, now).map_err(translate_core_error)?;
    let touched: Option<i64> = persistence
        .apply_clock_effects(employee_id, &transition.effects)
        .map_err(translate_persistence_error)?;

    info!(
        employee_id,
        action = command.name(),
        from = state.as_str(),
        to = transition.next_state.as_str(),
        "Clock transition"
    );
    Ok((state, touched))
}

fn require_employee(persistence: &mut Persistence, employee_id: i64) -> Result<Employee, ApiError> {
    persistence
        .get_employee(employee_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::not_found("Employee", format!("Employee {employee_id} not found")))
}

/// Finds the employee's first working shift on the restaurant's current day.
fn today_shift(
    persistence: &mut Persistence,
    employee_id: i64,
    timezone: &RestaurantTimezone,
    now: OffsetDateTime,
) -> Result<Option<Shift>, ApiError> {
    let today: ShiftDate = timezone.local_date(now).map_err(translate_domain_error)?;
    match persistence.list_employee_shifts_on(employee_id, today) {
        Ok(shifts) => Ok(shifts.into_iter().find(|s| !s.is_day_off)),
        Err(e) if e.is_storage_unavailable() => Ok(None),
        Err(e) => Err(translate_persistence_error(e)),
    }
}

fn optional_timestamp(instant: Option<OffsetDateTime>) -> Result<Option<String>, ApiError> {
    instant
        .map(format_timestamp)
        .transpose()
        .map_err(translate_domain_error)
}

fn build_status(
    persistence: &mut Persistence,
    employee: &Employee,
    timezone: &RestaurantTimezone,
    now: OffsetDateTime,
) -> Result<KioskStatusResponse, ApiError> {
    let state: ClockState = current_state(persistence, employee.employee_id)?;
    let shift: Option<Shift> = today_shift(persistence, employee.employee_id, timezone, now)?;

    Ok(KioskStatusResponse {
        employee_id: employee.employee_id,
        full_name: employee.full_name.clone(),
        role: employee.role.as_str().to_string(),
        status: state.as_str().to_string(),
        clock_record_id: state.clock_record_id(),
        clock_in_time: optional_timestamp(state.clock_in_time())?,
        active_break_id: state.active_break().map(|(id, _)| id),
        break_start_time: optional_timestamp(state.active_break().map(|(_, at)| at))?,
        today_shift: shift.as_ref().map(TodayShift::from),
    })
}

/// Looks up an employee by kiosk PIN and opens a kiosk session.
///
/// Failed matches count against `client_ip`; once the limit is reached the
/// address is refused until its oldest failure leaves the window. Malformed
/// PINs are refused without counting. A match clears the address's count.
///
/// # Errors
///
/// Returns `Unavailable` without a signing secret, a validation error for a
/// malformed PIN, `RateLimited` when blocked, or `AuthenticationFailed` for
/// an unknown PIN.
pub fn verify_pin(
    persistence: &mut Persistence,
    limiter: &mut PinAttemptLimiter,
    signer: &KioskSessionSigner,
    request: &VerifyPinRequest,
    client_ip: &str,
    timezone: &RestaurantTimezone,
    now: OffsetDateTime,
) -> Result<VerifyPinResponse, ApiError> {
    if !signer.is_configured() {
        return Err(ApiError::from(KioskSessionError::MissingSecret));
    }
    validate_pin(&request.pin)?;

    if let Err(minutes_remaining) = limiter.check(client_ip, now) {
        warn!(
            security_event = "rate_limit_exceeded",
            client_ip,
            minutes_remaining,
            "PIN attempts blocked"
        );
        return Err(ApiError::RateLimited { minutes_remaining });
    }

    let Some(employee) = persistence
        .find_active_employee_by_pin(&request.pin)
        .map_err(translate_persistence_error)?
    else {
        limiter.record_failure(client_ip, now);
        warn!(
            security_event = "invalid_pin",
            client_ip,
            failures = limiter.failures(client_ip, now),
            "Invalid PIN"
        );
        return Err(ApiError::AuthenticationFailed {
            reason: String::from("Invalid PIN"),
        });
    };

    limiter.reset(client_ip);
    let session_token: String = signer.issue(employee.employee_id, employee.role.as_str(), now)?;
    let status: KioskStatusResponse = build_status(persistence, &employee, timezone, now)?;
    info!(employee_id = employee.employee_id, "Kiosk PIN verified");

    Ok(VerifyPinResponse {
        status,
        session_token,
    })
}

/// Returns an employee's clock snapshot.
///
/// # Errors
///
/// Returns an error if the token belongs to someone else or the employee
/// does not exist.
pub fn kiosk_status(
    persistence: &mut Persistence,
    claims: &KioskClaims,
    employee_id: i64,
    timezone: &RestaurantTimezone,
    now: OffsetDateTime,
) -> Result<KioskStatusResponse, ApiError> {
    ensure_same_employee(claims, employee_id)?;
    let employee: Employee = require_employee(persistence, employee_id)?;
    build_status(persistence, &employee, timezone, now)
}

/// Opens a clock record.
///
/// Without an explicit shift the record is linked to the employee's shift
/// for today in the restaurant's timezone, when there is one.
///
/// # Errors
///
/// Returns `Conflict` if the employee is already clocked in, or not-found
/// for an unknown employee or a shift that is not theirs.
pub fn clock_in(
    persistence: &mut Persistence,
    claims: &KioskClaims,
    request: &KioskClockInRequest,
    timezone: &RestaurantTimezone,
    now: OffsetDateTime,
) -> Result<ClockInResponse, ApiError> {
    ensure_same_employee(claims, request.employee_id)?;
    require_employee(persistence, request.employee_id)?;

    let shift: Option<Shift> = match request.shift_id {
        Some(shift_id) => {
            let shift: Shift = persistence
                .get_shift(shift_id)
                .map_err(translate_persistence_error)?
                .filter(|s| s.employee_id == request.employee_id)
                .ok_or_else(|| {
                    ApiError::not_found("Shift", format!("Shift {shift_id} not found"))
                })?;
            Some(shift)
        }
        None => today_shift(persistence, request.employee_id, timezone, now)?,
    };

    let (_, touched) = run_command(
        persistence,
        request.employee_id,
        ClockCommand::ClockIn {
            shift_id: shift.as_ref().map(|s| s.shift_id),
        },
        now,
    )?;
    let record: ClockRecord = load_record(persistence, touched)?;

    Ok(ClockInResponse {
        clock_record: ClockRecordResponse::new(&record, &[]).map_err(translate_domain_error)?,
        shift: shift.as_ref().map(TodayShift::from),
    })
}

fn load_record(
    persistence: &mut Persistence,
    clock_record_id: Option<i64>,
) -> Result<ClockRecord, ApiError> {
    let missing = || ApiError::Internal {
        message: String::from("Clock record missing after write"),
    };
    let id: i64 = clock_record_id.ok_or_else(missing)?;
    persistence
        .get_clock_record(id)
        .map_err(translate_persistence_error)?
        .ok_or_else(missing)
}

/// Closes a clock record and reports the worked time.
///
/// A running break is closed at the same instant first. Total, break and
/// net minutes are each rounded to the nearest minute.
///
/// # Errors
///
/// Returns not-found if the record is not the employee's open record.
pub fn clock_out(
    persistence: &mut Persistence,
    claims: &KioskClaims,
    request: &KioskClockOutRequest,
    now: OffsetDateTime,
) -> Result<ClockOutSummary, ApiError> {
    ensure_same_employee(claims, request.employee_id)?;

    let (_, touched) = run_command(
        persistence,
        request.employee_id,
        ClockCommand::ClockOut {
            clock_record_id: request.clock_record_id,
        },
        now,
    )?;
    let record: ClockRecord = load_record(persistence, touched)?;
    let breaks: Vec<BreakInterval> = persistence
        .list_breaks(record.clock_record_id)
        .map_err(translate_persistence_error)?;

    let clock_out_time: OffsetDateTime = record.clock_out_time.unwrap_or(now);
    let summary: ClockSummary =
        summarize_session(record.clock_in_time, clock_out_time, &breaks, now);

    let scheduled_shift: Option<ScheduledShift> = match record.shift_id {
        Some(shift_id) => persistence
            .get_shift(shift_id)
            .map_err(translate_persistence_error)?
            .map(|s| ScheduledShift {
                start_time: s.start_time.as_str().to_string(),
                end_time: s.end_time.as_str().to_string(),
                shift_type: s.shift_type.as_str().to_string(),
            }),
        None => None,
    };

    Ok(ClockOutSummary {
        clock_record_id: record.clock_record_id,
        clock_in_time: format_timestamp(record.clock_in_time).map_err(translate_domain_error)?,
        clock_out_time: format_timestamp(clock_out_time).map_err(translate_domain_error)?,
        total_minutes: summary.total_minutes,
        break_minutes: summary.break_minutes,
        net_minutes: summary.net_minutes,
        scheduled_shift,
    })
}

/// Starts or ends a break on the employee's open record.
///
/// # Errors
///
/// Returns a validation error for an unknown action, `Conflict` when a
/// break is already running, or not-found when there is no running break to
/// end or the record is not the employee's open record.
pub fn break_action(
    persistence: &mut Persistence,
    claims: &KioskClaims,
    request: &KioskBreakRequest,
    now: OffsetDateTime,
) -> Result<BreakResponse, ApiError> {
    ensure_same_employee(claims, request.employee_id)?;

    let command: ClockCommand = match request.action.as_str() {
        "start" => ClockCommand::StartBreak {
            clock_record_id: request.clock_record_id,
        },
        "end" => ClockCommand::EndBreak {
            clock_record_id: request.clock_record_id,
        },
        other => {
            return Err(ApiError::ValidationFailed {
                details: vec![FieldViolation::new(
                    "action",
                    format!("Invalid action '{other}'; expected 'start' or 'end'"),
                )],
            });
        }
    };

    let (before, _) = run_command(persistence, request.employee_id, command, now)?;
    let interval: Option<BreakInterval> = match before.active_break() {
        Some((break_id, _)) => persistence
            .list_breaks(request.clock_record_id)
            .map_err(translate_persistence_error)?
            .into_iter()
            .find(|b| b.break_id == break_id),
        None => persistence
            .open_break(request.clock_record_id)
            .map_err(translate_persistence_error)?,
    };

    let interval: BreakInterval = interval.ok_or_else(|| ApiError::Internal {
        message: String::from("Break missing after write"),
    })?;
    BreakResponse::try_from(&interval).map_err(translate_domain_error)
}

/// Longest accepted free-text answers, in characters.
const SURVEY_TEXT_LIMITS: [(&str, usize); 4] = [
    ("feedback", 500),
    ("anomaly_type", 50),
    ("anomaly_reason", 100),
    ("anomaly_comment", 500),
];

/// Checks the rating scale and text lengths, returning the rating.
fn validate_survey(request: &ShiftSurveyRequest) -> Result<i32, ApiError> {
    let mut collector: ViolationCollector = ViolationCollector::new();
    let rating: Option<i32> = i32::try_from(request.rating)
        .ok()
        .filter(|rating| (1..=5).contains(rating));
    if rating.is_none() {
        collector.push("rating", "must be a whole number from 1 to 5");
    }

    let answers: [Option<&str>; 4] = [
        request.feedback.as_deref(),
        request.anomaly_type.as_deref(),
        request.anomaly_reason.as_deref(),
        request.anomaly_comment.as_deref(),
    ];
    for ((field, limit), answer) in SURVEY_TEXT_LIMITS.iter().zip(answers) {
        if answer.is_some_and(|text| text.chars().count() > *limit) {
            collector.push(*field, format!("must be at most {limit} characters"));
        }
    }

    collector.finish().map_err(translate_domain_error)?;
    rating.ok_or_else(|| ApiError::Internal {
        message: String::from("Rating missing after validation"),
    })
}

/// Stores the employee's feedback on a finished shift.
///
/// Worked time is set against the linked shift's scheduled window, which
/// wraps past midnight for overnight shifts. The variance is stored with
/// the answers.
///
/// # Errors
///
/// Returns a validation error for a rating outside 1..=5 or over-long
/// text, not-found if the record is not the employee's, `InvalidInput`
/// while the record is still open, or `Conflict` if a survey was already
/// submitted for it.
pub fn submit_survey(
    persistence: &mut Persistence,
    claims: &KioskClaims,
    request: &ShiftSurveyRequest,
    now: OffsetDateTime,
) -> Result<ShiftSurveyResponse, ApiError> {
    ensure_same_employee(claims, request.employee_id)?;
    let rating: i32 = validate_survey(request)?;

    let record: ClockRecord = persistence
        .get_clock_record(request.clock_record_id)
        .map_err(translate_persistence_error)?
        .filter(|r| r.employee_id == request.employee_id)
        .ok_or_else(|| ApiError::not_found("Clock record", "Clock record not found"))?;
    let Some(clock_out_time) = record.clock_out_time else {
        return Err(ApiError::InvalidInput {
            field: String::from("clock_record_id"),
            message: String::from("Clock record must be closed before submitting survey"),
        });
    };

    if persistence
        .survey_for_clock_record(record.clock_record_id)
        .map_err(translate_persistence_error)?
        .is_some()
    {
        return Err(ApiError::Conflict {
            message: String::from("Survey already submitted for this shift"),
        });
    }

    let shift: Option<Shift> = match record.shift_id {
        Some(shift_id) => persistence
            .get_shift(shift_id)
            .map_err(translate_persistence_error)?,
        None => None,
    };
    let breaks: Vec<BreakInterval> = persistence
        .list_breaks(record.clock_record_id)
        .map_err(translate_persistence_error)?;
    let variance: ShiftVariance = shift_variance(
        record.clock_in_time,
        clock_out_time,
        shift.as_ref().map(|s| (&s.start_time, &s.end_time)),
        &breaks,
    );

    let created_at: String = format_timestamp(now).map_err(translate_domain_error)?;
    let survey_id: i64 = persistence
        .insert_survey(&NewSurveyData {
            clock_record_id: record.clock_record_id,
            employee_id: record.employee_id,
            rating,
            feedback: request.feedback.as_deref(),
            shift_type: shift.as_ref().map(|s| s.shift_type.as_str()),
            worked_minutes: variance.worked_minutes,
            scheduled_minutes: variance.scheduled_minutes,
            variance_minutes: variance.variance_minutes,
            break_variance_minutes: variance.break_minutes,
            anomaly_type: request.anomaly_type.as_deref(),
            anomaly_reason: request.anomaly_reason.as_deref(),
            anomaly_comment: request.anomaly_comment.as_deref(),
            created_at: &created_at,
        })
        .map_err(translate_persistence_error)?;

    if rating <= 2 || request.anomaly_type.is_some() {
        warn!(
            survey_id,
            employee_id = record.employee_id,
            rating,
            anomaly_type = request.anomaly_type.as_deref(),
            "Shift feedback needs review"
        );
    } else {
        info!(survey_id, employee_id = record.employee_id, rating, "Shift survey submitted");
    }

    Ok(ShiftSurveyResponse {
        success: true,
        survey_id,
        worked_minutes: variance.worked_minutes,
        scheduled_minutes: variance.scheduled_minutes,
        variance_minutes: variance.variance_minutes,
        break_variance_minutes: variance.break_minutes,
    })
}
