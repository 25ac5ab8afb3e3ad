// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization for staff requests.

use shiftdesk_domain::{Employee, EmployeeRole, format_timestamp, parse_timestamp};
use shiftdesk_persistence::{Persistence, PersistenceError, SessionData};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use crate::error::AuthError;

/// An authenticated staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The employee behind the session.
    pub employee_id: i64,
    /// The employee's role.
    pub role: EmployeeRole,
}

impl AuthenticatedActor {
    #[must_use]
    pub const fn new(employee_id: i64, role: EmployeeRole) -> Self {
        Self { employee_id, role }
    }

    /// Whether the actor may manage schedules and staff.
    #[must_use]
    pub const fn is_manager(&self) -> bool {
        self.role.is_manager()
    }
}

/// Role-based access checks.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Requires an admin or manager.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` naming `action` otherwise.
    pub fn require_manager(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        if actor.is_manager() {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                reason: format!("'{action}' requires the admin or manager role"),
            })
        }
    }

    /// Requires a manager, or the employee who owns the resource.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` otherwise.
    pub fn require_manager_or_owner(
        actor: &AuthenticatedActor,
        owner_employee_id: i64,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.is_manager() || actor.employee_id == owner_employee_id {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                reason: format!("'{action}' is limited to managers and the owning employee"),
            })
        }
    }
}

/// Staff login, session validation and logout.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Lifetime of a staff session.
    pub const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Authenticates a staff member and creates a session.
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `employee`)
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong or the employee is
    /// inactive.
    pub fn login(
        persistence: &mut Persistence,
        login_name: &str,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<(String, AuthenticatedActor, Employee), AuthError> {
        let invalid = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid login name or password"),
        };

        let (employee, password_hash): (Employee, Option<String>) = persistence
            .get_employee_by_login(login_name)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(invalid)?;

        let password_hash: String = password_hash.ok_or_else(invalid)?;
        let verified: bool = Persistence::verify_password(password, &password_hash)
            .map_err(Self::map_persistence_error)?;
        if !verified {
            return Err(invalid());
        }

        if !employee.is_active() {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Employee is inactive"),
            });
        }

        let session_token: String = Self::generate_session_token(now);
        let now_str: String = format_timestamp(now).map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to format timestamp: {e}"),
        })?;
        let expires_at: String = format_timestamp(now + Self::DEFAULT_SESSION_EXPIRATION)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format expiration time: {e}"),
            })?;

        persistence
            .create_session(&session_token, employee.employee_id, &now_str, &expires_at)
            .map_err(Self::map_persistence_error)?;

        info!(employee_id = employee.employee_id, "Staff login");
        let actor: AuthenticatedActor = AuthenticatedActor::new(employee.employee_id, employee.role);
        Ok((session_token, actor, employee))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown, expired, or its employee
    /// is gone or inactive.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
        now: OffsetDateTime,
    ) -> Result<(AuthenticatedActor, Employee), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            parse_timestamp(&session.expires_at).map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;
        if now > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let employee: Employee = persistence
            .get_employee(session.employee_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Employee not found"),
            })?;
        if !employee.is_active() {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Employee is inactive"),
            });
        }

        if let Ok(now_str) = format_timestamp(now) {
            persistence
                .update_session_activity(session.session_id, &now_str)
                .map_err(Self::map_persistence_error)?;
        }

        debug!(employee_id = employee.employee_id, "Session validated");
        Ok((
            AuthenticatedActor::new(employee.employee_id, employee.role),
            employee,
        ))
    }

    /// Deletes the session behind `session_token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })
    }

    fn generate_session_token(now: OffsetDateTime) -> String {
        format!(
            "session_{}_{}",
            now.unix_timestamp_nanos(),
            rand::random::<u64>()
        )
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}
