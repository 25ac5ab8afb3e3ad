// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftdesk_domain::{BreakInterval, ClockRecord};
use time::OffsetDateTime;

/// Where an employee stands in the clock-in / break / clock-out cycle.
///
/// Never stored. It is derived from the employee's open clock record and
/// that record's open break, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    NotClockedIn,
    Working {
        clock_record_id: i64,
        clock_in_time: OffsetDateTime,
    },
    OnBreak {
        clock_record_id: i64,
        clock_in_time: OffsetDateTime,
        break_id: i64,
        break_start_time: OffsetDateTime,
    },
}

impl ClockState {
    /// Derives the state from the persisted facts.
    ///
    /// A closed record counts as no record, and a break is only considered
    /// when it is open and belongs to the open record.
    #[must_use]
    pub fn derive(open_record: Option<&ClockRecord>, open_break: Option<&BreakInterval>) -> Self {
        let Some(record) = open_record.filter(|r| r.is_open()) else {
            return Self::NotClockedIn;
        };

        match open_break.filter(|b| b.is_open() && b.clock_record_id == record.clock_record_id) {
            Some(running) => Self::OnBreak {
                clock_record_id: record.clock_record_id,
                clock_in_time: record.clock_in_time,
                break_id: running.break_id,
                break_start_time: running.start_time,
            },
            None => Self::Working {
                clock_record_id: record.clock_record_id,
                clock_in_time: record.clock_in_time,
            },
        }
    }

    /// The wire name of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotClockedIn => "not_clocked_in",
            Self::Working { .. } => "working",
            Self::OnBreak { .. } => "on_break",
        }
    }

    /// The open clock record, if clocked in.
    #[must_use]
    pub const fn clock_record_id(&self) -> Option<i64> {
        match self {
            Self::NotClockedIn => None,
            Self::Working {
                clock_record_id, ..
            }
            | Self::OnBreak {
                clock_record_id, ..
            } => Some(*clock_record_id),
        }
    }

    /// When the open clock record started, if clocked in.
    #[must_use]
    pub const fn clock_in_time(&self) -> Option<OffsetDateTime> {
        match self {
            Self::NotClockedIn => None,
            Self::Working { clock_in_time, .. } | Self::OnBreak { clock_in_time, .. } => {
                Some(*clock_in_time)
            }
        }
    }

    /// The running break, if on break.
    #[must_use]
    pub const fn active_break(&self) -> Option<(i64, OffsetDateTime)> {
        match self {
            Self::OnBreak {
                break_id,
                break_start_time,
                ..
            } => Some((*break_id, *break_start_time)),
            _ => None,
        }
    }
}

/// A write the caller must perform to realize a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEffect {
    /// Insert a new open clock record.
    OpenRecord {
        shift_id: Option<i64>,
        at: OffsetDateTime,
    },
    /// Insert a new open break on the record.
    OpenBreak {
        clock_record_id: i64,
        at: OffsetDateTime,
    },
    /// Set the break's end time.
    CloseBreak { break_id: i64, at: OffsetDateTime },
    /// Set the record's clock-out time.
    CloseRecord {
        clock_record_id: i64,
        at: OffsetDateTime,
    },
}

/// The result of applying a clock command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Writes to perform, in order.
    pub effects: Vec<ClockEffect>,
    /// The state once the effects are applied. Ids of rows the effects
    /// create are not known yet and appear as zero.
    pub next_state: ClockState,
}
