// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use time::macros::datetime;

use super::helpers::{BREAK_ID, RECORD_ID, create_test_break, create_test_record};
use crate::{ClockCommand, ClockEffect, ClockState, CoreError, Transition, apply};

fn now() -> OffsetDateTime {
    datetime!(2024-07-01 17:00:00 UTC)
}

fn working() -> ClockState {
    ClockState::derive(Some(&create_test_record(None)), None)
}

fn on_break() -> ClockState {
    ClockState::derive(Some(&create_test_record(None)), Some(&create_test_break(None)))
}

#[test]
fn test_clock_in_opens_record_with_shift_link() {
    let result: Transition =
        apply(&ClockState::NotClockedIn, ClockCommand::ClockIn { shift_id: Some(5) }, now()).unwrap();
    assert_eq!(
        result.effects,
        vec![ClockEffect::OpenRecord {
            shift_id: Some(5),
            at: now()
        }]
    );
    assert_eq!(result.next_state.as_str(), "working");
}

#[test]
fn test_clock_in_twice_is_rejected() {
    let result: Result<Transition, CoreError> =
        apply(&working(), ClockCommand::ClockIn { shift_id: None }, now());
    assert_eq!(
        result.unwrap_err(),
        CoreError::AlreadyClockedIn {
            clock_record_id: RECORD_ID
        }
    );
}

#[test]
fn test_start_break_while_working() {
    let result: Transition = apply(
        &working(),
        ClockCommand::StartBreak {
            clock_record_id: RECORD_ID,
        },
        now(),
    )
    .unwrap();
    assert_eq!(
        result.effects,
        vec![ClockEffect::OpenBreak {
            clock_record_id: RECORD_ID,
            at: now()
        }]
    );
    assert_eq!(result.next_state.as_str(), "on_break");
}

#[test]
fn test_start_break_while_on_break_conflicts() {
    let result: Result<Transition, CoreError> = apply(
        &on_break(),
        ClockCommand::StartBreak {
            clock_record_id: RECORD_ID,
        },
        now(),
    );
    assert_eq!(result.unwrap_err(), CoreError::BreakAlreadyOpen { break_id: BREAK_ID });
}

#[test]
fn test_start_break_needs_open_record() {
    let result: Result<Transition, CoreError> = apply(
        &ClockState::NotClockedIn,
        ClockCommand::StartBreak {
            clock_record_id: RECORD_ID,
        },
        now(),
    );
    assert!(matches!(result, Err(CoreError::ClockRecordNotOpen { .. })));
}

#[test]
fn test_end_break_without_break_is_rejected() {
    let result: Result<Transition, CoreError> = apply(
        &working(),
        ClockCommand::EndBreak {
            clock_record_id: RECORD_ID,
        },
        now(),
    );
    assert_eq!(
        result.unwrap_err(),
        CoreError::NoOpenBreak {
            clock_record_id: RECORD_ID
        }
    );
}

#[test]
fn test_end_break_closes_running_break() {
    let result: Transition = apply(
        &on_break(),
        ClockCommand::EndBreak {
            clock_record_id: RECORD_ID,
        },
        now(),
    )
    .unwrap();
    assert_eq!(
        result.effects,
        vec![ClockEffect::CloseBreak {
            break_id: BREAK_ID,
            at: now()
        }]
    );
    assert_eq!(result.next_state.as_str(), "working");
}

#[test]
fn test_clock_out_on_break_closes_break_first() {
    let result: Transition = apply(
        &on_break(),
        ClockCommand::ClockOut {
            clock_record_id: RECORD_ID,
        },
        now(),
    )
    .unwrap();
    assert_eq!(
        result.effects,
        vec![
            ClockEffect::CloseBreak {
                break_id: BREAK_ID,
                at: now()
            },
            ClockEffect::CloseRecord {
                clock_record_id: RECORD_ID,
                at: now()
            },
        ]
    );
    assert_eq!(result.next_state, ClockState::NotClockedIn);
}

#[test]
fn test_clock_out_of_wrong_record_is_rejected() {
    let result: Result<Transition, CoreError> = apply(
        &working(),
        ClockCommand::ClockOut {
            clock_record_id: RECORD_ID + 5,
        },
        now(),
    );
    assert_eq!(
        result.unwrap_err(),
        CoreError::ClockRecordNotOpen {
            clock_record_id: RECORD_ID + 5
        }
    );
}

#[test]
fn test_clock_out_when_not_clocked_in_is_rejected() {
    let result: Result<Transition, CoreError> = apply(
        &ClockState::NotClockedIn,
        ClockCommand::ClockOut {
            clock_record_id: RECORD_ID,
        },
        now(),
    );
    assert!(matches!(result, Err(CoreError::ClockRecordNotOpen { .. })));
}
