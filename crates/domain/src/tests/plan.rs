// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::create_test_shift;
use crate::{
    DomainError, PlanStatus, SchedulePlan, Shift, ShiftDate, ShiftDraft, ShiftStatus,
    copy_shift_into_plan, ensure_copy_target_free, ensure_plan_deletable, next_plan_version,
};

fn create_test_plan(status: PlanStatus) -> SchedulePlan {
    SchedulePlan {
        plan_id: 4,
        week_start_date: ShiftDate::parse("2024-07-01").unwrap(),
        status,
        version: 1,
        created_by: 1,
        copied_from_plan_id: None,
        notes: None,
        created_at: String::from("2024-06-28T10:00:00Z"),
        updated_at: String::from("2024-06-28T10:00:00Z"),
    }
}

#[test]
fn test_first_plan_for_week_is_version_one() {
    assert_eq!(next_plan_version(None).unwrap(), 1);
}

#[test]
fn test_next_version_follows_maximum() {
    assert_eq!(next_plan_version(Some(3)).unwrap(), 4);
    assert!(next_plan_version(Some(i32::MAX)).is_err());
}

#[test]
fn test_only_drafts_are_deletable() {
    assert!(ensure_plan_deletable(&create_test_plan(PlanStatus::Draft)).is_ok());

    for status in [PlanStatus::Published, PlanStatus::Archived] {
        let result: Result<(), DomainError> = ensure_plan_deletable(&create_test_plan(status));
        assert!(matches!(result, Err(DomainError::PlanNotDraft { plan_id: 4, .. })));
    }
}

#[test]
fn test_copy_target_must_be_empty() {
    let week: ShiftDate = ShiftDate::parse("2024-07-08").unwrap();
    assert!(ensure_copy_target_free(week, 0).is_ok());
    let result: Result<(), DomainError> = ensure_copy_target_free(week, 2);
    assert!(matches!(result, Err(DomainError::TargetWeekOccupied { .. })));
}

#[test]
fn test_copy_moves_date_and_resets_status() {
    let mut source: Shift = create_test_shift(10, 7, "2024-07-03", "17:00", "23:00");
    source.status = ShiftStatus::Completed;
    source.notes = Some(String::from("covered for Luis"));
    source.schedule_plan_id = Some(4);
    source.break_duration_minutes = 30;

    let draft: ShiftDraft = copy_shift_into_plan(&source, 7, 9).unwrap();
    assert_eq!(draft.date.to_string(), "2024-07-10");
    assert_eq!(draft.status, ShiftStatus::Scheduled);
    assert_eq!(draft.schedule_plan_id, Some(9));
    assert_eq!(draft.notes, None);
    assert_eq!(draft.start_time.as_str(), "17:00");
    assert_eq!(draft.break_duration_minutes, 30);
}

#[test]
fn test_copy_supports_negative_offsets() {
    let source: Shift = create_test_shift(10, 7, "2024-07-03", "17:00", "23:00");
    let draft: ShiftDraft = copy_shift_into_plan(&source, -14, 9).unwrap();
    assert_eq!(draft.date.to_string(), "2024-06-19");
}
