// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use shiftdesk::CoreError;
use shiftdesk_domain::{DomainError, FieldViolation};
use shiftdesk_persistence::PersistenceError;
use tracing::error;

use crate::credential_policy::CredentialPolicyError;
use crate::kiosk_session::KioskSessionError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor may not perform the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// A human-readable explanation.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { reason, .. } => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// Every handler returns one of these; the HTTP layer maps each variant to
/// a status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Credentials or session token are missing, invalid or expired.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor's role or ownership does not allow the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// A human-readable explanation.
        reason: String,
    },
    /// One or more submitted fields are invalid.
    ValidationFailed {
        /// Every failing field.
        details: Vec<FieldViolation>,
    },
    /// A single input value is invalid.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request collides with existing state.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// Too many failed PIN attempts from one source.
    RateLimited {
        /// Whole minutes until another attempt is allowed.
        minutes_remaining: u64,
    },
    /// Backing storage or configuration is not available.
    Unavailable {
        /// A human-readable description.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Builds a `ResourceNotFound` error.
    #[must_use]
    pub fn not_found(resource_type: &str, message: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { reason, .. } => write!(f, "{reason}"),
            Self::ValidationFailed { details } => {
                write!(f, "Validation failed")?;
                for (index, detail) in details.iter().enumerate() {
                    let separator: &str = if index == 0 { ": " } else { "; " };
                    write!(f, "{separator}{detail}")?;
                }
                Ok(())
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound { message, .. }
            | Self::Conflict { message }
            | Self::Unavailable { message } => write!(f, "{message}"),
            Self::RateLimited { .. } => write!(f, "Too many attempts. Please try again later."),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized { action, reason } => Self::Unauthorized { action, reason },
        }
    }
}

impl From<CredentialPolicyError> for ApiError {
    fn from(err: CredentialPolicyError) -> Self {
        let field: &str = match err {
            CredentialPolicyError::InvalidPin => "pin",
            CredentialPolicyError::ConfirmationMismatch => "password_confirmation",
            CredentialPolicyError::TooShort { .. } | CredentialPolicyError::MatchesLoginName => {
                "password"
            }
        };
        Self::ValidationFailed {
            details: vec![FieldViolation::new(field, err.to_string())],
        }
    }
}

impl From<KioskSessionError> for ApiError {
    fn from(err: KioskSessionError) -> Self {
        match err {
            KioskSessionError::MissingSecret => Self::Unavailable {
                message: String::from("Kiosk sessions are not configured"),
            },
            KioskSessionError::Signing(message) => Self::Internal { message },
            KioskSessionError::Missing
            | KioskSessionError::Malformed
            | KioskSessionError::Invalid
            | KioskSessionError::Expired
            | KioskSessionError::WrongType => Self::AuthenticationFailed {
                reason: err.to_string(),
            },
        }
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::ValidationFailed(details) => ApiError::ValidationFailed { details },
        DomainError::InvalidDate(_) => single_field("date", &err),
        DomainError::InvalidTime(_) => single_field("time", &err),
        DomainError::InvalidTimestamp(_) => single_field("timestamp", &err),
        DomainError::InvalidBreakMinutes(_) => single_field("break_duration_minutes", &err),
        DomainError::InvalidShiftType(_) => single_field("shift_type", &err),
        DomainError::InvalidShiftStatus(_) | DomainError::InvalidPlanStatus(_) => {
            single_field("status", &err)
        }
        DomainError::InvalidRole(_) => single_field("role", &err),
        DomainError::InvalidEmploymentStatus(_) => single_field("employment_status", &err),
        DomainError::InvalidTimezone(_) => single_field("timezone", &err),
        DomainError::ShiftConflict { .. } | DomainError::TargetWeekOccupied { .. } => {
            ApiError::Conflict {
                message: err.to_string(),
            }
        }
        DomainError::PlanNotDraft { .. } => ApiError::InvalidInput {
            field: String::from("status"),
            message: err.to_string(),
        },
        DomainError::DateArithmeticOverflow { .. } => ApiError::InvalidInput {
            field: String::from("date"),
            message: err.to_string(),
        },
    }
}

fn single_field(field: &str, err: &DomainError) -> ApiError {
    ApiError::ValidationFailed {
        details: vec![FieldViolation::new(field, err.to_string())],
    }
}

/// Translates a clock state machine error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain) => translate_domain_error(domain),
        CoreError::AlreadyClockedIn { .. } | CoreError::BreakAlreadyOpen { .. } => {
            ApiError::Conflict {
                message: err.to_string(),
            }
        }
        CoreError::ClockRecordNotOpen { .. } => ApiError::not_found("Clock record", err.to_string()),
        CoreError::NoOpenBreak { .. } => ApiError::not_found("Break", err.to_string()),
    }
}

/// Translates a storage error into an API error.
///
/// Internal details are logged, not returned.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::not_found("Record", message),
        PersistenceError::UniqueViolation(_) => ApiError::Conflict {
            message: String::from("The change conflicts with an existing record"),
        },
        PersistenceError::ForeignKeyViolation(_) => ApiError::InvalidInput {
            field: String::from("reference"),
            message: String::from("A referenced record does not exist"),
        },
        PersistenceError::StorageUnavailable(message) => {
            error!(%message, "Storage is not provisioned");
            ApiError::Unavailable {
                message: String::from("Schedule storage is not configured"),
            }
        }
        other => {
            error!(error = %other, "Persistence operation failed");
            ApiError::Internal {
                message: String::from("Database operation failed"),
            }
        }
    }
}
