// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftdesk_domain::{BreakInterval, ClockRecord};
use time::OffsetDateTime;
use time::macros::datetime;

pub const RECORD_ID: i64 = 11;
pub const BREAK_ID: i64 = 21;

pub fn clock_in_instant() -> OffsetDateTime {
    datetime!(2024-07-01 09:00:00 UTC)
}

pub fn create_test_record(clock_out: Option<OffsetDateTime>) -> ClockRecord {
    ClockRecord {
        clock_record_id: RECORD_ID,
        employee_id: 7,
        clock_in_time: clock_in_instant(),
        clock_out_time: clock_out,
        shift_id: None,
    }
}

pub fn create_test_break(end: Option<OffsetDateTime>) -> BreakInterval {
    BreakInterval {
        break_id: BREAK_ID,
        clock_record_id: RECORD_ID,
        start_time: datetime!(2024-07-01 12:00:00 UTC),
        end_time: end,
    }
}
