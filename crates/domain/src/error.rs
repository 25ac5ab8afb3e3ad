// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::Serialize;

/// A single failing field reported by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// The field path, e.g. `start_time` or `shifts_to_create[2].date`.
    pub field: String,
    /// What is wrong with the value.
    pub message: String,
}

impl FieldViolation {
    /// Creates a new field violation.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more input fields failed validation. Never empty.
    ValidationFailed(Vec<FieldViolation>),
    /// A calendar date is not a valid `YYYY-MM-DD` value.
    InvalidDate(String),
    /// A wall-clock time is not a valid `HH:MM` or `HH:MM:SS` value.
    InvalidTime(String),
    /// A stored or submitted timestamp is not RFC 3339.
    InvalidTimestamp(String),
    /// Break length is negative or out of range.
    InvalidBreakMinutes(i64),
    /// Shift type is not one of the catalog tags.
    InvalidShiftType(String),
    /// Shift status is not recognized.
    InvalidShiftStatus(String),
    /// Plan status is not recognized.
    InvalidPlanStatus(String),
    /// Employee role is not recognized.
    InvalidRole(String),
    /// Employment status is not recognized.
    InvalidEmploymentStatus(String),
    /// Timezone name is not a known IANA zone.
    InvalidTimezone(String),
    /// An existing shift for the same employee and date shares a start or end time.
    ShiftConflict {
        /// The employee both shifts belong to.
        employee_id: i64,
        /// The calendar date of both shifts.
        date: String,
        /// The already stored shift.
        existing_shift_id: i64,
    },
    /// Only draft plans may be deleted.
    PlanNotDraft {
        /// The plan that was targeted.
        plan_id: i64,
        /// The plan's current status.
        status: String,
    },
    /// The copy target week already has a plan.
    TargetWeekOccupied {
        /// The occupied week.
        week_start_date: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidationFailed(violations) => {
                let joined: Vec<String> = violations.iter().map(ToString::to_string).collect();
                write!(f, "Validation failed: {}", joined.join("; "))
            }
            Self::InvalidDate(value) => write!(f, "Invalid date '{value}': expected YYYY-MM-DD"),
            Self::InvalidTime(value) => {
                write!(f, "Invalid time '{value}': expected HH:MM or HH:MM:SS")
            }
            Self::InvalidTimestamp(msg) => write!(f, "Invalid timestamp: {msg}"),
            Self::InvalidBreakMinutes(value) => write!(
                f,
                "Invalid break length {value}: must be a non-negative whole number of minutes"
            ),
            Self::InvalidShiftType(value) => write!(
                f,
                "Invalid shift type '{value}': expected morning, afternoon, night or split"
            ),
            Self::InvalidShiftStatus(value) => write!(f, "Invalid shift status '{value}'"),
            Self::InvalidPlanStatus(value) => write!(
                f,
                "Invalid plan status '{value}': expected draft, published or archived"
            ),
            Self::InvalidRole(value) => write!(f, "Invalid role '{value}'"),
            Self::InvalidEmploymentStatus(value) => {
                write!(f, "Invalid employment status '{value}'")
            }
            Self::InvalidTimezone(value) => write!(f, "Invalid timezone '{value}'"),
            Self::ShiftConflict {
                employee_id,
                date,
                existing_shift_id,
            } => write!(
                f,
                "Shift conflicts with shift {existing_shift_id} for employee {employee_id} on {date}"
            ),
            Self::PlanNotDraft { plan_id, status } => write!(
                f,
                "Schedule plan {plan_id} is {status}; only draft plans can be deleted"
            ),
            Self::TargetWeekOccupied { week_start_date } => write!(
                f,
                "A schedule plan already exists for week {week_start_date}"
            ),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow: {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}

/// Accumulates field violations so that validation reports every failure at once.
#[derive(Debug, Default)]
pub struct ViolationCollector {
    violations: Vec<FieldViolation>,
}

impl ViolationCollector {
    /// Creates an empty collector.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Records a violation for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }

    /// Keeps the value of a successful parse, or records its error under `field`.
    pub fn check<T>(&mut self, field: &str, result: Result<T, DomainError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(DomainError::ValidationFailed(nested)) => {
                self.violations.extend(nested);
                None
            }
            Err(err) => {
                self.push(field, err.to_string());
                None
            }
        }
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Converts the collected violations into a result.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationFailed` if any violation was recorded.
    pub fn finish(self) -> Result<(), DomainError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::ValidationFailed(self.violations))
        }
    }
}
