// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod shift_tests;

use shiftdesk_domain::{EmployeeRole, ShiftDraft, ShiftInput};

use crate::{NewEmployeeData, Persistence};

pub const NOW: &str = "2026-01-05T09:00:00Z";

/// Creates an employee with no login or PIN and returns the id.
pub fn create_test_employee(persistence: &mut Persistence, full_name: &str) -> i64 {
    persistence
        .create_employee(&NewEmployeeData {
            full_name,
            role: EmployeeRole::Waiter,
            login_name: None,
            password: None,
            kiosk_pin: None,
            created_at: NOW,
        })
        .expect("employee insert")
}

/// Builds a plain morning-type shift draft.
pub fn create_test_draft(employee_id: i64, date: &str, start: &str, end: &str) -> ShiftDraft {
    ShiftDraft::validate(
        &ShiftInput {
            employee_id,
            date,
            shift_type: "morning",
            start_time: start,
            end_time: end,
            second_start_time: None,
            second_end_time: None,
            break_duration_minutes: Some(30),
            is_day_off: false,
            schedule_plan_id: None,
            notes: None,
        },
        "",
    )
    .expect("valid draft")
}
