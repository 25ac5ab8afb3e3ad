// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftdesk_domain::{BreakInterval, ClockRecord, ClockSummary, summarize_session};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{ClockCommand, ClockEffect, ClockState, Transition, apply};

/// Plays effects onto in-memory rows the way storage would.
#[derive(Default)]
struct Ledger {
    records: Vec<ClockRecord>,
    breaks: Vec<BreakInterval>,
}

impl Ledger {
    fn state(&self) -> ClockState {
        let record: Option<&ClockRecord> = self.records.iter().find(|r| r.is_open());
        let running: Option<&BreakInterval> = self.breaks.iter().find(|b| b.is_open());
        ClockState::derive(record, running)
    }

    fn run(&mut self, command: ClockCommand, now: OffsetDateTime) {
        let transition: Transition = apply(&self.state(), command, now).unwrap();
        for effect in transition.effects {
            match effect {
                ClockEffect::OpenRecord { shift_id, at } => self.records.push(ClockRecord {
                    clock_record_id: i64::try_from(self.records.len()).unwrap() + 1,
                    employee_id: 7,
                    clock_in_time: at,
                    clock_out_time: None,
                    shift_id,
                }),
                ClockEffect::OpenBreak {
                    clock_record_id,
                    at,
                } => self.breaks.push(BreakInterval {
                    break_id: i64::try_from(self.breaks.len()).unwrap() + 1,
                    clock_record_id,
                    start_time: at,
                    end_time: None,
                }),
                ClockEffect::CloseBreak { break_id, at } => {
                    let row = self.breaks.iter_mut().find(|b| b.break_id == break_id).unwrap();
                    row.end_time = Some(at);
                }
                ClockEffect::CloseRecord {
                    clock_record_id,
                    at,
                } => {
                    let row = self
                        .records
                        .iter_mut()
                        .find(|r| r.clock_record_id == clock_record_id)
                        .unwrap();
                    row.clock_out_time = Some(at);
                }
            }
        }
    }
}

#[test]
fn test_full_day_lifecycle_totals() {
    let mut ledger: Ledger = Ledger::default();
    ledger.run(ClockCommand::ClockIn { shift_id: None }, datetime!(2024-07-01 09:00:00 UTC));
    ledger.run(
        ClockCommand::StartBreak { clock_record_id: 1 },
        datetime!(2024-07-01 12:00:00 UTC),
    );
    ledger.run(
        ClockCommand::EndBreak { clock_record_id: 1 },
        datetime!(2024-07-01 12:15:00 UTC),
    );
    let out: OffsetDateTime = datetime!(2024-07-01 17:00:00 UTC);
    ledger.run(ClockCommand::ClockOut { clock_record_id: 1 }, out);

    assert_eq!(ledger.state(), ClockState::NotClockedIn);
    let record: &ClockRecord = &ledger.records[0];
    let summary: ClockSummary =
        summarize_session(record.clock_in_time, out, &ledger.breaks, out);
    assert_eq!(summary.total_minutes, 480);
    assert_eq!(summary.break_minutes, 15);
    assert_eq!(summary.net_minutes, 465);
}

#[test]
fn test_clock_out_auto_closes_break_at_clock_out_instant() {
    let mut ledger: Ledger = Ledger::default();
    ledger.run(ClockCommand::ClockIn { shift_id: None }, datetime!(2024-07-01 09:00:00 UTC));
    ledger.run(
        ClockCommand::StartBreak { clock_record_id: 1 },
        datetime!(2024-07-01 16:30:00 UTC),
    );
    let out: OffsetDateTime = datetime!(2024-07-01 17:00:00 UTC);
    ledger.run(ClockCommand::ClockOut { clock_record_id: 1 }, out);

    assert_eq!(ledger.breaks[0].end_time, Some(out));
    assert_eq!(ledger.records[0].clock_out_time, Some(out));
}

#[test]
fn test_second_session_after_clock_out() {
    let mut ledger: Ledger = Ledger::default();
    ledger.run(ClockCommand::ClockIn { shift_id: None }, datetime!(2024-07-01 09:00:00 UTC));
    ledger.run(ClockCommand::ClockOut { clock_record_id: 1 }, datetime!(2024-07-01 13:00:00 UTC));
    ledger.run(ClockCommand::ClockIn { shift_id: None }, datetime!(2024-07-01 18:00:00 UTC));
    assert_eq!(ledger.state().clock_record_id(), Some(2));
}
