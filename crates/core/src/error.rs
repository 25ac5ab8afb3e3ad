// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftdesk_domain::DomainError;

/// Errors that can occur during clock state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The employee already has an open clock record.
    AlreadyClockedIn {
        /// The open record.
        clock_record_id: i64,
    },
    /// The referenced clock record is not the employee's open record.
    ClockRecordNotOpen {
        /// The record named by the caller.
        clock_record_id: i64,
    },
    /// A break is already running on the record.
    BreakAlreadyOpen {
        /// The running break.
        break_id: i64,
    },
    /// There is no running break to end.
    NoOpenBreak {
        /// The record named by the caller.
        clock_record_id: i64,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::AlreadyClockedIn { clock_record_id } => {
                write!(f, "Already clocked in (clock record {clock_record_id})")
            }
            Self::ClockRecordNotOpen { .. } => {
                write!(f, "Clock record not found or already clocked out")
            }
            Self::BreakAlreadyOpen { break_id } => {
                write!(f, "A break is already in progress (break {break_id})")
            }
            Self::NoOpenBreak { .. } => write!(f, "No active break found"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
