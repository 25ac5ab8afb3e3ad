// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;

use crate::command::ClockCommand;
use crate::error::CoreError;
use crate::state::{ClockEffect, ClockState, Transition};

/// Applies a clock command to the current state.
///
/// Pure: nothing is written. The returned effects describe the rows to
/// insert or update, all stamped with `now`.
///
/// # Arguments
///
/// * `state` - The employee's current derived state
/// * `command` - The requested change
/// * `now` - The instant of the request
///
/// # Errors
///
/// Returns an error if:
/// - Clocking in while a record is already open
/// - The named record is not the employee's open record
/// - Starting a break while one is running
/// - Ending a break when none is running
pub fn apply(
    state: &ClockState,
    command: ClockCommand,
    now: OffsetDateTime,
) -> Result<Transition, CoreError> {
    match (command, *state) {
        (ClockCommand::ClockIn { shift_id }, ClockState::NotClockedIn) => Ok(Transition {
            effects: vec![ClockEffect::OpenRecord { shift_id, at: now }],
            next_state: ClockState::Working {
                clock_record_id: 0,
                clock_in_time: now,
            },
        }),
        (ClockCommand::ClockIn { .. }, open) => Err(CoreError::AlreadyClockedIn {
            clock_record_id: open.clock_record_id().unwrap_or_default(),
        }),

        (ClockCommand::StartBreak { clock_record_id }, current) => {
            let clock_in_time: OffsetDateTime = require_open(&current, clock_record_id)?;
            if let Some((break_id, _)) = current.active_break() {
                return Err(CoreError::BreakAlreadyOpen { break_id });
            }
            Ok(Transition {
                effects: vec![ClockEffect::OpenBreak {
                    clock_record_id,
                    at: now,
                }],
                next_state: ClockState::OnBreak {
                    clock_record_id,
                    clock_in_time,
                    break_id: 0,
                    break_start_time: now,
                },
            })
        }

        (ClockCommand::EndBreak { clock_record_id }, current) => {
            let clock_in_time: OffsetDateTime = require_open(&current, clock_record_id)?;
            let Some((break_id, _)) = current.active_break() else {
                return Err(CoreError::NoOpenBreak { clock_record_id });
            };
            Ok(Transition {
                effects: vec![ClockEffect::CloseBreak { break_id, at: now }],
                next_state: ClockState::Working {
                    clock_record_id,
                    clock_in_time,
                },
            })
        }

        (ClockCommand::ClockOut { clock_record_id }, current) => {
            require_open(&current, clock_record_id)?;
            let mut effects: Vec<ClockEffect> = Vec::with_capacity(2);
            if let Some((break_id, _)) = current.active_break() {
                effects.push(ClockEffect::CloseBreak { break_id, at: now });
            }
            effects.push(ClockEffect::CloseRecord {
                clock_record_id,
                at: now,
            });
            Ok(Transition {
                effects,
                next_state: ClockState::NotClockedIn,
            })
        }
    }
}

/// Checks that `clock_record_id` is the open record and returns its clock-in time.
fn require_open(state: &ClockState, clock_record_id: i64) -> Result<OffsetDateTime, CoreError> {
    match (state.clock_record_id(), state.clock_in_time()) {
        (Some(open_id), Some(clock_in_time)) if open_id == clock_record_id => Ok(clock_in_time),
        _ => Err(CoreError::ClockRecordNotOpen { clock_record_id }),
    }
}
