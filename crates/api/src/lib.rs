// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the `ShiftDesk` scheduling service.
//!
//! Handlers here are free of any HTTP framework. Each takes the persistence
//! layer, the authenticated caller and an injected `now`, and returns a
//! response DTO or an [`ApiError`].

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

mod auth;
mod credential_policy;
mod error;
mod handlers;
mod kiosk;
mod kiosk_session;
mod plans;
mod rate_limiter;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use credential_policy::{CredentialPolicyError, PasswordPolicy, validate_pin};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    bootstrap, create_employee, create_shift, delete_shift, get_shift, list_clock_records,
    list_employees, list_shifts, login, logout, set_kiosk_pin, shift_types, update_shift, whoami,
};
pub use kiosk::{
    authenticate_kiosk, break_action, clock_in, clock_out, ensure_same_employee, kiosk_status,
    submit_survey, verify_pin,
};
pub use kiosk_session::{
    KIOSK_SESSION_TTL, KIOSK_TOKEN_TYPE, KioskClaims, KioskSessionError, KioskSessionSigner,
};
pub use plans::{
    EXPORT_HEADER, copy_plan, create_plan, delete_plan, export_plan_csv, get_plan_for_week,
    sync_plan, update_plan, validate_plan,
};
pub use rate_limiter::PinAttemptLimiter;
pub use request_response::{
    BootstrapRequest, BreakResponse, ClockInResponse, ClockOutSummary, ClockRecordQuery,
    ClockRecordResponse, CopyPlanRequest, CreateEmployeeRequest, CreatePlanRequest,
    CreateShiftRequest, EmployeeInfo, EmployeeSummary, KioskBreakRequest, KioskClockInRequest,
    KioskClockOutRequest, KioskStatusResponse, LoginRequest, LoginResponse, PlanOnlyResponse,
    PlanResponse, PlanWithShiftsResponse, ScheduledShift, SetKioskPinRequest, ShiftListQuery,
    ShiftResponse, ShiftSurveyRequest, ShiftSurveyResponse, SuccessResponse, SyncRequest,
    SyncResponse, SyncResults, SyncUpdateItem, TodayShift, UpdatePlanRequest, UpdateShiftRequest,
    VerifyPinRequest, VerifyPinResponse, WeekQuery,
};
