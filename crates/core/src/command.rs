// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// A kiosk request to change an employee's clock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockCommand {
    /// Start a session, optionally linked to today's scheduled shift.
    ClockIn { shift_id: Option<i64> },
    /// Start a break on the named record.
    StartBreak { clock_record_id: i64 },
    /// End the running break on the named record.
    EndBreak { clock_record_id: i64 },
    /// End the named session, closing any running break first.
    ClockOut { clock_record_id: i64 },
}

impl ClockCommand {
    /// A short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ClockIn { .. } => "clock_in",
            Self::StartBreak { .. } => "break_start",
            Self::EndBreak { .. } => "break_end",
            Self::ClockOut { .. } => "clock_out",
        }
    }
}
