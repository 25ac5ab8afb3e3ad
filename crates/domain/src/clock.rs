// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance sessions and the minute totals reported at clock-out.

use num_traits::ToPrimitive;
use time::{Duration, OffsetDateTime};

use crate::calendar::WallTime;
use crate::shift::span_minutes;

/// One attendance session. Open while `clock_out_time` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockRecord {
    pub clock_record_id: i64,
    pub employee_id: i64,
    pub clock_in_time: OffsetDateTime,
    pub clock_out_time: Option<OffsetDateTime>,
    pub shift_id: Option<i64>,
}

impl ClockRecord {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.clock_out_time.is_none()
    }
}

/// A rest interval inside a clock record. Open while `end_time` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakInterval {
    pub break_id: i64,
    pub clock_record_id: i64,
    pub start_time: OffsetDateTime,
    pub end_time: Option<OffsetDateTime>,
}

impl BreakInterval {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Length of the break, measuring open breaks up to `now`.
    #[must_use]
    pub fn duration_until(&self, now: OffsetDateTime) -> Duration {
        self.end_time.unwrap_or(now) - self.start_time
    }
}

/// Minute totals for a closed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSummary {
    pub total_minutes: i64,
    pub break_minutes: i64,
    pub net_minutes: i64,
}

/// Rounds a duration to the nearest whole minute, halves away from zero.
#[must_use]
pub fn round_to_minutes(duration: Duration) -> i64 {
    let millis: i128 = duration.whole_milliseconds();
    let half: i128 = if millis < 0 { -30_000 } else { 30_000 };
    ((millis + half) / 60_000).to_i64().unwrap_or(if millis < 0 { i64::MIN } else { i64::MAX })
}

/// Computes worked, break and net minutes for a session.
///
/// Total and break time are each rounded to the nearest minute first; net
/// time is their difference so the three figures always agree.
#[must_use]
pub fn summarize_session(
    clock_in: OffsetDateTime,
    clock_out: OffsetDateTime,
    breaks: &[BreakInterval],
    now: OffsetDateTime,
) -> ClockSummary {
    let total_minutes: i64 = round_to_minutes(clock_out - clock_in);
    let break_time: Duration = breaks
        .iter()
        .map(|b| b.duration_until(now))
        .fold(Duration::ZERO, |acc, d| acc + d);
    let break_minutes: i64 = round_to_minutes(break_time);

    ClockSummary {
        total_minutes,
        break_minutes,
        net_minutes: total_minutes - break_minutes,
    }
}

/// Actual time of a closed session set against its scheduled window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftVariance {
    /// Clock-in to clock-out, breaks included.
    pub worked_minutes: i64,
    pub scheduled_minutes: Option<i64>,
    /// Worked minus scheduled; positive when the employee stayed longer.
    pub variance_minutes: Option<i64>,
    /// Time spent on closed breaks.
    pub break_minutes: i64,
}

/// Compares a session with the shift it was linked to.
///
/// The scheduled window wraps past midnight when it ends before it starts.
/// Without a window, or with a zero-length one, there is no variance.
#[must_use]
pub fn shift_variance(
    clock_in: OffsetDateTime,
    clock_out: OffsetDateTime,
    scheduled: Option<(&WallTime, &WallTime)>,
    breaks: &[BreakInterval],
) -> ShiftVariance {
    let worked_minutes: i64 = round_to_minutes(clock_out - clock_in);
    let scheduled_minutes: Option<i64> = scheduled.map(|(start, end)| span_minutes(start, end));
    let variance_minutes: Option<i64> = scheduled_minutes
        .filter(|minutes| *minutes != 0)
        .map(|minutes| worked_minutes - minutes);
    let break_time: Duration = breaks
        .iter()
        .filter_map(|b| b.end_time.map(|end| end - b.start_time))
        .fold(Duration::ZERO, |acc, d| acc + d);

    ShiftVariance {
        worked_minutes,
        scheduled_minutes,
        variance_minutes,
        break_minutes: round_to_minutes(break_time),
    }
}
