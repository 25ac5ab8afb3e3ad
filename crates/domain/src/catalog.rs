// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The time window catalog.
//!
//! Canonical hours per shift type. Clients use these to pre-fill forms; the
//! server never checks a shift's explicit times against them.

use serde::Serialize;

use crate::types::ShiftType;

/// Canonical hours for one shift type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeWindow {
    pub shift_type: ShiftType,
    pub start: &'static str,
    pub end: &'static str,
    pub break_minutes: u32,
    pub paid_hours: f64,
    pub second_start: Option<&'static str>,
    pub second_end: Option<&'static str>,
}

const MORNING: TimeWindow = TimeWindow {
    shift_type: ShiftType::Morning,
    start: "10:30",
    end: "17:00",
    break_minutes: 30,
    paid_hours: 6.0,
    second_start: None,
    second_end: None,
};

const AFTERNOON: TimeWindow = TimeWindow {
    shift_type: ShiftType::Afternoon,
    start: "17:00",
    end: "23:00",
    break_minutes: 30,
    paid_hours: 5.5,
    second_start: None,
    second_end: None,
};

// Ends after midnight.
const NIGHT: TimeWindow = TimeWindow {
    shift_type: ShiftType::Night,
    start: "23:00",
    end: "03:00",
    break_minutes: 0,
    paid_hours: 4.0,
    second_start: None,
    second_end: None,
};

const SPLIT: TimeWindow = TimeWindow {
    shift_type: ShiftType::Split,
    start: "12:00",
    end: "16:00",
    break_minutes: 0,
    paid_hours: 7.5,
    second_start: Some("20:00"),
    second_end: Some("23:30"),
};

/// Returns the canonical window for a shift type.
#[must_use]
pub const fn lookup(shift_type: ShiftType) -> TimeWindow {
    match shift_type {
        ShiftType::Morning => MORNING,
        ShiftType::Afternoon => AFTERNOON,
        ShiftType::Night => NIGHT,
        ShiftType::Split => SPLIT,
    }
}

/// Returns every catalog entry in tag order.
#[must_use]
pub fn catalog() -> Vec<TimeWindow> {
    ShiftType::ALL.iter().map(|t| lookup(*t)).collect()
}
