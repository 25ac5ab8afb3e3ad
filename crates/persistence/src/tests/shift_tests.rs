// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftdesk_domain::{
    Shift, ShiftChanges, ShiftChangesInput, ShiftDate, ShiftDraft, ShiftStatus, ShiftType,
};

use super::{NOW, create_test_draft, create_test_employee};
use crate::{Persistence, PersistenceError, ShiftFilter};

fn date(value: &str) -> ShiftDate {
    ShiftDate::parse(value).unwrap()
}

#[test]
fn test_insert_and_get_shift_round_trip() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let employee_id: i64 = create_test_employee(&mut persistence, "Ana Lopez");
    let mut draft: ShiftDraft = create_test_draft(employee_id, "2026-01-05", "10:30", "17:00");
    draft.notes = Some("Opening".to_string());

    let shift_id: i64 = persistence.insert_shift(&draft, NOW).unwrap();
    let shift: Shift = persistence.get_shift(shift_id).unwrap().unwrap();

    assert_eq!(shift.employee_id, employee_id);
    assert_eq!(shift.date, date("2026-01-05"));
    assert_eq!(shift.shift_type, ShiftType::Morning);
    assert_eq!(shift.start_time.as_str(), "10:30");
    assert_eq!(shift.break_duration_minutes, 30);
    assert_eq!(shift.status, ShiftStatus::Scheduled);
    assert_eq!(shift.notes.as_deref(), Some("Opening"));
    assert_eq!(shift.created_at, NOW);
    assert_eq!(shift.updated_at, NOW);
}

#[test]
fn test_shift_for_unknown_employee_is_a_foreign_key_violation() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let draft: ShiftDraft = create_test_draft(999, "2026-01-05", "10:30", "17:00");

    let result: Result<i64, PersistenceError> = persistence.insert_shift(&draft, NOW);
    assert!(matches!(result, Err(PersistenceError::ForeignKeyViolation(_))));
}

#[test]
fn test_list_shifts_orders_by_date_then_start_time() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let employee_id: i64 = create_test_employee(&mut persistence, "Ana Lopez");
    for (day, start, end) in [
        ("2026-01-06", "17:00", "23:00"),
        ("2026-01-05", "17:00", "23:00"),
        ("2026-01-05", "10:30", "16:00"),
    ] {
        persistence
            .insert_shift(&create_test_draft(employee_id, day, start, end), NOW)
            .unwrap();
    }

    let listed: Vec<(String, String)> = persistence
        .list_shifts(&ShiftFilter::default())
        .unwrap()
        .into_iter()
        .map(|s| (s.date.to_string(), s.start_time.as_str().to_string()))
        .collect();

    assert_eq!(
        listed,
        vec![
            ("2026-01-05".to_string(), "10:30".to_string()),
            ("2026-01-05".to_string(), "17:00".to_string()),
            ("2026-01-06".to_string(), "17:00".to_string()),
        ]
    );
}

#[test]
fn test_list_shifts_applies_every_filter() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let ana: i64 = create_test_employee(&mut persistence, "Ana Lopez");
    let ben: i64 = create_test_employee(&mut persistence, "Ben Ortiz");
    persistence
        .insert_shift(&create_test_draft(ana, "2026-01-04", "10:30", "17:00"), NOW)
        .unwrap();
    let kept: i64 = persistence
        .insert_shift(&create_test_draft(ana, "2026-01-05", "10:30", "17:00"), NOW)
        .unwrap();
    persistence
        .insert_shift(&create_test_draft(ben, "2026-01-05", "10:30", "17:00"), NOW)
        .unwrap();

    let filter: ShiftFilter = ShiftFilter {
        employee_id: Some(ana),
        start_date: Some(date("2026-01-05")),
        end_date: Some(date("2026-01-11")),
        status: Some(ShiftStatus::Scheduled),
        schedule_plan_id: None,
    };
    let found: Vec<i64> = persistence
        .list_shifts(&filter)
        .unwrap()
        .into_iter()
        .map(|s| s.shift_id)
        .collect();
    assert_eq!(found, vec![kept]);

    let cancelled: Vec<Shift> = persistence
        .list_shifts(&ShiftFilter {
            status: Some(ShiftStatus::Cancelled),
            ..ShiftFilter::default()
        })
        .unwrap();
    assert!(cancelled.is_empty());
}

#[test]
fn test_update_shift_clears_notes_and_refreshes_updated_at() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let employee_id: i64 = create_test_employee(&mut persistence, "Ana Lopez");
    let mut draft: ShiftDraft = create_test_draft(employee_id, "2026-01-05", "10:30", "17:00");
    draft.notes = Some("Opening".to_string());
    let shift_id: i64 = persistence.insert_shift(&draft, NOW).unwrap();

    let changes: ShiftChanges = ShiftChanges::validate(
        &ShiftChangesInput {
            status: Some("confirmed"),
            notes: Some(None),
            ..ShiftChangesInput::default()
        },
        "",
    )
    .unwrap();
    persistence
        .update_shift(shift_id, &changes, "2026-01-05T10:00:00Z")
        .unwrap();

    let shift: Shift = persistence.get_shift(shift_id).unwrap().unwrap();
    assert_eq!(shift.status, ShiftStatus::Confirmed);
    assert_eq!(shift.notes, None);
    assert_eq!(shift.start_time.as_str(), "10:30");
    assert_eq!(shift.created_at, NOW);
    assert_eq!(shift.updated_at, "2026-01-05T10:00:00Z");
}

#[test]
fn test_update_missing_shift_is_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let changes: ShiftChanges = ShiftChanges {
        is_day_off: Some(true),
        ..ShiftChanges::default()
    };

    let result: Result<(), PersistenceError> = persistence.update_shift(77, &changes, NOW);
    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_delete_shift() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let employee_id: i64 = create_test_employee(&mut persistence, "Ana Lopez");
    let shift_id: i64 = persistence
        .insert_shift(
            &create_test_draft(employee_id, "2026-01-05", "10:30", "17:00"),
            NOW,
        )
        .unwrap();

    persistence.delete_shift(shift_id).unwrap();
    assert!(persistence.get_shift(shift_id).unwrap().is_none());
    assert!(matches!(
        persistence.delete_shift(shift_id),
        Err(PersistenceError::NotFound(_))
    ));
}

#[test]
fn test_insert_shifts_is_all_or_nothing() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let employee_id: i64 = create_test_employee(&mut persistence, "Ana Lopez");
    let drafts: Vec<ShiftDraft> = vec![
        create_test_draft(employee_id, "2026-01-05", "10:30", "17:00"),
        create_test_draft(999, "2026-01-06", "10:30", "17:00"),
    ];

    let result: Result<Vec<i64>, PersistenceError> = persistence.insert_shifts(&drafts, NOW);
    assert!(result.is_err());
    assert!(persistence.list_shifts(&ShiftFilter::default()).unwrap().is_empty());
}

#[test]
fn test_employee_shifts_on_a_date() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let employee_id: i64 = create_test_employee(&mut persistence, "Ana Lopez");
    persistence
        .insert_shift(
            &create_test_draft(employee_id, "2026-01-05", "17:00", "23:00"),
            NOW,
        )
        .unwrap();
    persistence
        .insert_shift(
            &create_test_draft(employee_id, "2026-01-06", "10:30", "17:00"),
            NOW,
        )
        .unwrap();

    let shifts: Vec<Shift> = persistence
        .list_employee_shifts_on(employee_id, date("2026-01-05"))
        .unwrap();
    assert_eq!(shifts.len(), 1);
    assert_eq!(shifts[0].start_time.as_str(), "17:00");
}
