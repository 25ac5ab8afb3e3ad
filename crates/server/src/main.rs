// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
};
use clap::Parser;
use serde::Serialize;
use shiftdesk_api::{
    ApiError, BootstrapRequest, BreakResponse, ClockInResponse, ClockOutSummary, ClockRecordQuery,
    ClockRecordResponse, CopyPlanRequest, CreateEmployeeRequest, CreatePlanRequest,
    CreateShiftRequest, EmployeeInfo, KioskBreakRequest, KioskClockInRequest,
    KioskClockOutRequest, KioskSessionSigner, KioskStatusResponse, LoginRequest, LoginResponse,
    PinAttemptLimiter, PlanOnlyResponse, PlanWithShiftsResponse, SetKioskPinRequest,
    ShiftListQuery, ShiftResponse, ShiftSurveyRequest, ShiftSurveyResponse, SuccessResponse,
    SyncRequest, SyncResponse, UpdatePlanRequest, UpdateShiftRequest, VerifyPinRequest,
    VerifyPinResponse, WeekQuery,
};
use shiftdesk_domain::{
    FieldViolation, LaborConstraints, RestaurantTimezone, ScheduleValidation, TimeWindow,
};
use shiftdesk_persistence::Persistence;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::{BearerToken, KioskSession, SessionEmployee, client_ip};

/// `ShiftDesk` Server - staff scheduling and time clock service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "SHIFTDESK_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Secret used to sign kiosk session tokens. PIN verification is
    /// disabled without it.
    #[arg(long, env = "KIOSK_SESSION_SECRET", hide_env_values = true)]
    kiosk_secret: Option<String>,

    /// IANA timezone the restaurant operates in
    #[arg(long, env = "SHIFTDESK_TIMEZONE", default_value = "UTC")]
    timezone: String,

    /// Weekly paid hours above which a schedule is rejected
    #[arg(long, default_value_t = 40)]
    max_weekly_hours: u32,

    /// Minimum hours between consecutive shifts
    #[arg(long, default_value_t = 12)]
    min_rest_hours: u32,

    /// Minimum days off per week
    #[arg(long, default_value_t = 2)]
    min_days_off: u32,

    /// Weekly paid hours above which a schedule is flagged
    #[arg(long, default_value_t = 35)]
    overtime_warning_hours: u32,

    /// Failed PIN attempts allowed per client within the window
    #[arg(long, default_value_t = 5)]
    pin_max_attempts: usize,

    /// Length of the PIN attempt window in minutes
    #[arg(long, default_value_t = 15)]
    pin_window_minutes: i64,
}

impl Args {
    const fn labor_constraints(&self) -> LaborConstraints {
        LaborConstraints {
            max_weekly_hours: self.max_weekly_hours,
            min_rest_hours: self.min_rest_hours,
            min_days_off: self.min_days_off,
            overtime_warning_hours: self.overtime_warning_hours,
        }
    }
}

/// Application state shared across handlers.
///
/// The single `SQLite` connection sits behind an async mutex so every
/// check-then-write sequence runs without interleaving.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Failed PIN attempts keyed by client address. In-process only.
    pin_limiter: Arc<Mutex<PinAttemptLimiter>>,
    /// Issues and verifies kiosk session tokens.
    kiosk_signer: KioskSessionSigner,
    /// Timezone used to decide what "today" is at the kiosk.
    timezone: RestaurantTimezone,
    /// Limits used by plan validation.
    labor: LaborConstraints,
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
    /// Field-level failures for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldViolation>>,
    /// Minutes until another PIN attempt is allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    minutes: Option<u64>,
}

/// HTTP error wrapper that implements `IntoResponse`.
pub struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
    details: Option<Vec<FieldViolation>>,
    minutes: Option<u64>,
}

impl HttpError {
    const fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            details: None,
            minutes: None,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
            details: self.details,
            minutes: self.minutes,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let message: String = err.to_string();
        match err {
            ApiError::AuthenticationFailed { .. } => Self::new(StatusCode::UNAUTHORIZED, message),
            ApiError::Unauthorized { .. } => Self::new(StatusCode::FORBIDDEN, message),
            ApiError::ValidationFailed { details } => Self {
                details: Some(details),
                ..Self::new(StatusCode::BAD_REQUEST, message)
            },
            ApiError::InvalidInput { .. } => Self::new(StatusCode::BAD_REQUEST, message),
            ApiError::ResourceNotFound { .. } => Self::new(StatusCode::NOT_FOUND, message),
            ApiError::Conflict { .. } => Self::new(StatusCode::CONFLICT, message),
            ApiError::RateLimited { minutes_remaining } => Self {
                minutes: Some(minutes_remaining),
                ..Self::new(StatusCode::TOO_MANY_REQUESTS, message)
            },
            ApiError::Unavailable { .. } => Self::new(StatusCode::SERVICE_UNAVAILABLE, message),
            ApiError::Internal { .. } => {
                error!(error = %message, "Internal error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

// ============================================================================
// Staff identity
// ============================================================================

/// Handler for POST `/auth/bootstrap`.
///
/// Creates the first admin. Refused once any employee exists.
async fn handle_bootstrap(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BootstrapRequest>,
) -> Result<Json<EmployeeInfo>, HttpError> {
    info!(login_name = %req.login_name, "Handling bootstrap request");

    let mut persistence = app_state.persistence.lock().await;
    let response: EmployeeInfo =
        shiftdesk_api::bootstrap(&mut persistence, &req, OffsetDateTime::now_utc())?;
    drop(persistence);

    info!(employee_id = response.employee_id, "System bootstrapped");
    Ok(Json(response))
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(login_name = %req.login_name, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse =
        shiftdesk_api::login(&mut persistence, &req, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<SuccessResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: SuccessResponse = shiftdesk_api::logout(&mut persistence, &token)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/auth/whoami`.
#[allow(clippy::unused_async)]
async fn handle_whoami(SessionEmployee(_, employee): SessionEmployee) -> Json<EmployeeInfo> {
    Json(shiftdesk_api::whoami(&employee))
}

/// Handler for GET `/employees`.
async fn handle_list_employees(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
) -> Result<Json<Vec<EmployeeInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<EmployeeInfo> = shiftdesk_api::list_employees(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/employees`.
async fn handle_create_employee(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<Json<EmployeeInfo>, HttpError> {
    info!(
        actor_id = actor.employee_id,
        role = %req.role,
        "Handling create_employee request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: EmployeeInfo = shiftdesk_api::create_employee(
        &mut persistence,
        &actor,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/employees/{employee_id}/kiosk_pin`.
async fn handle_set_kiosk_pin(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Path(employee_id): Path<i64>,
    Json(req): Json<SetKioskPinRequest>,
) -> Result<Json<SuccessResponse>, HttpError> {
    info!(
        actor_id = actor.employee_id,
        employee_id, "Handling set_kiosk_pin request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SuccessResponse =
        shiftdesk_api::set_kiosk_pin(&mut persistence, &actor, employee_id, &req)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Shifts
// ============================================================================

/// Handler for GET `/shift_types`.
#[allow(clippy::unused_async)]
async fn handle_shift_types() -> Json<Vec<TimeWindow>> {
    Json(shiftdesk_api::shift_types())
}

/// Handler for GET `/shifts`.
async fn handle_list_shifts(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Query(query): Query<ShiftListQuery>,
) -> Result<Json<Vec<ShiftResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<ShiftResponse> =
        shiftdesk_api::list_shifts(&mut persistence, &actor, &query)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/shifts`.
async fn handle_create_shift(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Json(req): Json<CreateShiftRequest>,
) -> Result<Json<ShiftResponse>, HttpError> {
    info!(
        actor_id = actor.employee_id,
        employee_id = req.employee_id,
        date = %req.date,
        "Handling create_shift request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ShiftResponse =
        shiftdesk_api::create_shift(&mut persistence, &actor, &req, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/shifts/{shift_id}`.
async fn handle_get_shift(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Path(shift_id): Path<i64>,
) -> Result<Json<ShiftResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ShiftResponse = shiftdesk_api::get_shift(&mut persistence, &actor, shift_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PATCH `/shifts/{shift_id}`.
async fn handle_update_shift(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Path(shift_id): Path<i64>,
    Json(req): Json<UpdateShiftRequest>,
) -> Result<Json<ShiftResponse>, HttpError> {
    info!(
        actor_id = actor.employee_id,
        shift_id, "Handling update_shift request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ShiftResponse = shiftdesk_api::update_shift(
        &mut persistence,
        &actor,
        shift_id,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/shifts/{shift_id}`.
async fn handle_delete_shift(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Path(shift_id): Path<i64>,
) -> Result<Json<SuccessResponse>, HttpError> {
    info!(
        actor_id = actor.employee_id,
        shift_id, "Handling delete_shift request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SuccessResponse =
        shiftdesk_api::delete_shift(&mut persistence, &actor, shift_id)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Schedule plans
// ============================================================================

/// Handler for GET `/schedule_plans?week_start_date=YYYY-MM-DD`.
async fn handle_get_plan_for_week(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(_, _): SessionEmployee,
    Query(query): Query<WeekQuery>,
) -> Result<Json<PlanWithShiftsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: PlanWithShiftsResponse =
        shiftdesk_api::get_plan_for_week(&mut persistence, &query)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/schedule_plans`.
async fn handle_create_plan(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Json(req): Json<CreatePlanRequest>,
) -> Result<Json<PlanWithShiftsResponse>, HttpError> {
    info!(
        actor_id = actor.employee_id,
        week_start_date = %req.week_start_date,
        "Handling create_plan request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: PlanWithShiftsResponse =
        shiftdesk_api::create_plan(&mut persistence, &actor, &req, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PATCH `/schedule_plans/{plan_id}`.
async fn handle_update_plan(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Path(plan_id): Path<i64>,
    Json(req): Json<UpdatePlanRequest>,
) -> Result<Json<PlanOnlyResponse>, HttpError> {
    info!(
        actor_id = actor.employee_id,
        plan_id, "Handling update_plan request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: PlanOnlyResponse = shiftdesk_api::update_plan(
        &mut persistence,
        &actor,
        plan_id,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/schedule_plans/{plan_id}`.
async fn handle_delete_plan(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Path(plan_id): Path<i64>,
) -> Result<Json<SuccessResponse>, HttpError> {
    info!(
        actor_id = actor.employee_id,
        plan_id, "Handling delete_plan request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SuccessResponse = shiftdesk_api::delete_plan(&mut persistence, &actor, plan_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/schedule_plans/{plan_id}/copy`.
async fn handle_copy_plan(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Path(plan_id): Path<i64>,
    Json(req): Json<CopyPlanRequest>,
) -> Result<Json<PlanWithShiftsResponse>, HttpError> {
    info!(
        actor_id = actor.employee_id,
        plan_id,
        target_week_start_date = %req.target_week_start_date,
        "Handling copy_plan request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: PlanWithShiftsResponse = shiftdesk_api::copy_plan(
        &mut persistence,
        &actor,
        plan_id,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/schedule_plans/{plan_id}/sync`.
///
/// Partial failures still answer 200; the caller reconciles against the
/// returned shift list.
async fn handle_sync_plan(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Path(plan_id): Path<i64>,
    Json(req): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, HttpError> {
    info!(
        actor_id = actor.employee_id,
        plan_id,
        creates = req.shifts_to_create.len(),
        updates = req.shifts_to_update.len(),
        deletes = req.shifts_to_delete.len(),
        "Handling sync_plan request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SyncResponse = shiftdesk_api::sync_plan(
        &mut persistence,
        &actor,
        plan_id,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/schedule_plans/{plan_id}/validate`.
async fn handle_validate_plan(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Path(plan_id): Path<i64>,
) -> Result<Json<ScheduleValidation>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ScheduleValidation =
        shiftdesk_api::validate_plan(&mut persistence, &actor, plan_id, &app_state.labor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/schedule_plans/{plan_id}/export`.
async fn handle_export_plan(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Path(plan_id): Path<i64>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let csv: String = shiftdesk_api::export_plan_csv(&mut persistence, &actor, plan_id)?;
    drop(persistence);

    let disposition: String = format!("attachment; filename=\"schedule-plan-{plan_id}.csv\"");
    Ok((
        [
            (header::CONTENT_TYPE, String::from("text/csv; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

// ============================================================================
// Kiosk
// ============================================================================

/// Handler for POST `/kiosk/verify_pin`.
///
/// Public, rate limited per client address.
async fn handle_verify_pin(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<VerifyPinRequest>,
) -> Result<Json<VerifyPinResponse>, HttpError> {
    let ip: String = client_ip(&headers);

    let mut persistence = app_state.persistence.lock().await;
    let mut limiter = app_state.pin_limiter.lock().await;
    let response: VerifyPinResponse = shiftdesk_api::verify_pin(
        &mut persistence,
        &mut limiter,
        &app_state.kiosk_signer,
        &req,
        &ip,
        &app_state.timezone,
        OffsetDateTime::now_utc(),
    )?;
    drop(limiter);
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/kiosk/status/{employee_id}`.
async fn handle_kiosk_status(
    AxumState(app_state): AxumState<AppState>,
    KioskSession(claims): KioskSession,
    Path(employee_id): Path<i64>,
) -> Result<Json<KioskStatusResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: KioskStatusResponse = shiftdesk_api::kiosk_status(
        &mut persistence,
        &claims,
        employee_id,
        &app_state.timezone,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/kiosk/clock_in`.
async fn handle_clock_in(
    AxumState(app_state): AxumState<AppState>,
    KioskSession(claims): KioskSession,
    Json(req): Json<KioskClockInRequest>,
) -> Result<Json<ClockInResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ClockInResponse = shiftdesk_api::clock_in(
        &mut persistence,
        &claims,
        &req,
        &app_state.timezone,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/kiosk/clock_out`.
async fn handle_clock_out(
    AxumState(app_state): AxumState<AppState>,
    KioskSession(claims): KioskSession,
    Json(req): Json<KioskClockOutRequest>,
) -> Result<Json<ClockOutSummary>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ClockOutSummary =
        shiftdesk_api::clock_out(&mut persistence, &claims, &req, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/kiosk/break`.
async fn handle_break(
    AxumState(app_state): AxumState<AppState>,
    KioskSession(claims): KioskSession,
    Json(req): Json<KioskBreakRequest>,
) -> Result<Json<BreakResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: BreakResponse =
        shiftdesk_api::break_action(&mut persistence, &claims, &req, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/kiosk/survey`.
async fn handle_submit_survey(
    AxumState(app_state): AxumState<AppState>,
    KioskSession(claims): KioskSession,
    Json(req): Json<ShiftSurveyRequest>,
) -> Result<Json<ShiftSurveyResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ShiftSurveyResponse =
        shiftdesk_api::submit_survey(&mut persistence, &claims, &req, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/clock_records`.
async fn handle_list_clock_records(
    AxumState(app_state): AxumState<AppState>,
    SessionEmployee(actor, _): SessionEmployee,
    Query(query): Query<ClockRecordQuery>,
) -> Result<Json<Vec<ClockRecordResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<ClockRecordResponse> =
        shiftdesk_api::list_clock_records(&mut persistence, &actor, &query)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/bootstrap", post(handle_bootstrap))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/whoami", get(handle_whoami))
        .route(
            "/employees",
            get(handle_list_employees).post(handle_create_employee),
        )
        .route(
            "/employees/{employee_id}/kiosk_pin",
            put(handle_set_kiosk_pin),
        )
        .route("/shift_types", get(handle_shift_types))
        .route("/shifts", get(handle_list_shifts).post(handle_create_shift))
        .route(
            "/shifts/{shift_id}",
            get(handle_get_shift)
                .patch(handle_update_shift)
                .delete(handle_delete_shift),
        )
        .route(
            "/schedule_plans",
            get(handle_get_plan_for_week).post(handle_create_plan),
        )
        .route(
            "/schedule_plans/{plan_id}",
            patch(handle_update_plan).delete(handle_delete_plan),
        )
        .route("/schedule_plans/{plan_id}/copy", post(handle_copy_plan))
        .route("/schedule_plans/{plan_id}/sync", post(handle_sync_plan))
        .route(
            "/schedule_plans/{plan_id}/validate",
            get(handle_validate_plan),
        )
        .route("/schedule_plans/{plan_id}/export", get(handle_export_plan))
        .route("/kiosk/verify_pin", post(handle_verify_pin))
        .route("/kiosk/status/{employee_id}", get(handle_kiosk_status))
        .route("/kiosk/clock_in", post(handle_clock_in))
        .route("/kiosk/clock_out", post(handle_clock_out))
        .route("/kiosk/break", post(handle_break))
        .route("/kiosk/survey", post(handle_submit_survey))
        .route("/clock_records", get(handle_list_clock_records))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing ShiftDesk Server");

    let timezone: RestaurantTimezone = RestaurantTimezone::parse(&args.timezone)?;
    let kiosk_signer: KioskSessionSigner = KioskSessionSigner::new(args.kiosk_secret.as_deref());
    if !kiosk_signer.is_configured() {
        warn!("KIOSK_SESSION_SECRET is not set; PIN verification is disabled");
    }

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        pin_limiter: Arc::new(Mutex::new(PinAttemptLimiter::new(
            args.pin_max_attempts,
            Duration::minutes(args.pin_window_minutes),
        ))),
        kiosk_signer,
        timezone,
        labor: args.labor_constraints(),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(timezone = timezone.name(), "Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
