// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Shift, ShiftDate, ShiftStatus, ShiftType, WallTime};

/// Builds a stored shift for `employee_id` on `date` from `start` to `end`.
pub fn create_test_shift(shift_id: i64, employee_id: i64, date: &str, start: &str, end: &str) -> Shift {
    Shift {
        shift_id,
        employee_id,
        date: ShiftDate::parse(date).unwrap(),
        shift_type: ShiftType::Morning,
        start_time: WallTime::parse(start).unwrap(),
        end_time: WallTime::parse(end).unwrap(),
        second_start_time: None,
        second_end_time: None,
        break_duration_minutes: 0,
        is_day_off: false,
        status: ShiftStatus::Scheduled,
        notes: None,
        schedule_plan_id: None,
        created_at: String::from("2024-06-28T10:00:00Z"),
        updated_at: String::from("2024-06-28T10:00:00Z"),
    }
}
