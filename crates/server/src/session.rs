// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for staff and kiosk requests.
//!
//! Staff requests carry an opaque session token, kiosk requests carry a
//! signed kiosk token. Both arrive as `Authorization: Bearer <token>`.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
    response::{IntoResponse, Response},
};
use shiftdesk_api::{
    ApiError, AuthError, AuthenticatedActor, AuthenticationService, KioskClaims,
    authenticate_kiosk,
};
use shiftdesk_domain::Employee;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Returns the bearer token from the `Authorization` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Best-effort client address used to key PIN attempt limits.
///
/// Takes the first `x-forwarded-for` entry, then `x-real-ip`, else
/// `"unknown"`.
pub fn client_ip(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .map_or_else(|| String::from("unknown"), str::to_string)
}

/// Extractor for authenticated staff.
///
/// ```ignore
/// async fn my_handler(
///     SessionEmployee(actor, employee): SessionEmployee,
/// ) -> Result<Json<Response>, HttpError> {
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Errors
///
/// Rejects with 401 when the header is missing or malformed, or when the
/// session is unknown, expired, or belongs to an inactive employee.
pub struct SessionEmployee(pub AuthenticatedActor, pub Employee);

impl FromRequestParts<AppState> for SessionEmployee {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if parts.headers.get("Authorization").is_none() {
            debug!("Missing Authorization header");
            return Err(SessionError::MissingAuthorizationHeader);
        }
        let token: &str = bearer_token(&parts.headers).ok_or_else(|| {
            warn!("Authorization header is not a bearer token");
            SessionError::InvalidAuthorizationHeader
        })?;

        let mut persistence = state.persistence.lock().await;
        let (actor, employee) = AuthenticationService::validate_session(
            &mut persistence,
            token,
            OffsetDateTime::now_utc(),
        )
        .map_err(|e| {
            warn!(error = %e, "Session validation failed");
            SessionError::InvalidSession(e)
        })?;

        debug!(
            employee_id = employee.employee_id,
            role = ?actor.role,
            "Session validated"
        );

        Ok(Self(actor, employee))
    }
}

/// Raw bearer token of the current request, used by logout.
pub struct BearerToken(pub String);

impl FromRequestParts<AppState> for BearerToken {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        bearer_token(&parts.headers)
            .map(|token| Self(token.to_string()))
            .ok_or(SessionError::MissingAuthorizationHeader)
    }
}

/// Extractor for verified kiosk tokens.
pub struct KioskSession(pub KioskClaims);

impl FromRequestParts<AppState> for KioskSession {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims: KioskClaims = authenticate_kiosk(
            &state.kiosk_signer,
            bearer_token(&parts.headers),
            OffsetDateTime::now_utc(),
        )?;
        Ok(Self(claims))
    }
}

/// Staff session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(AuthError),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let reason: String = match self {
            Self::MissingAuthorizationHeader => String::from("Missing Authorization header"),
            Self::InvalidAuthorizationHeader => String::from(
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            ),
            Self::InvalidSession(err) => {
                return HttpError::from(ApiError::from(err)).into_response();
            }
        };

        HttpError::from(ApiError::AuthenticationFailed { reason }).into_response()
    }
}
