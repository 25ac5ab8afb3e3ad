// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftdesk_domain::{ShiftType, TimeWindow};
use shiftdesk_persistence::Persistence;

use crate::tests::helpers::{
    NOW, create_test_manager, create_test_owner, create_test_persistence, create_test_waiter,
    shift_request,
};
use crate::{
    ApiError, AuthenticatedActor, CreateShiftRequest, ShiftListQuery, ShiftResponse,
    UpdateShiftRequest, create_shift, delete_shift, get_shift, list_shifts, shift_types,
    update_shift,
};

#[test]
fn test_created_shift_keeps_submitted_date_and_times() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let waiter: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);

    let mut request: CreateShiftRequest =
        shift_request(waiter.employee_id, "2024-07-03", "10:30:15", "17:00");
    request.notes = Some(String::from("Terrace section"));

    let created: ShiftResponse = create_shift(&mut persistence, &manager, &request, NOW).unwrap();

    assert_eq!(created.date, "2024-07-03");
    assert_eq!(created.start_time, "10:30:15");
    assert_eq!(created.end_time, "17:00");
    assert_eq!(created.break_duration_minutes, 30);
    assert_eq!(created.status, "scheduled");
    assert_eq!(created.notes.as_deref(), Some("Terrace section"));
    assert_eq!(created.employee.as_ref().unwrap().full_name, "Walt");

    let fetched: ShiftResponse = get_shift(&mut persistence, &manager, created.shift_id).unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn test_identical_start_time_is_a_conflict() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let waiter: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);

    create_shift(
        &mut persistence,
        &manager,
        &shift_request(waiter.employee_id, "2024-07-03", "09:00", "12:00"),
        NOW,
    )
    .unwrap();

    let same_start = create_shift(
        &mut persistence,
        &manager,
        &shift_request(waiter.employee_id, "2024-07-03", "09:00", "15:00"),
        NOW,
    );
    assert!(matches!(same_start, Err(ApiError::Conflict { .. })));

    let same_end = create_shift(
        &mut persistence,
        &manager,
        &shift_request(waiter.employee_id, "2024-07-03", "08:00", "12:00"),
        NOW,
    );
    assert!(matches!(same_end, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_overlapping_shifts_with_distinct_times_are_accepted() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let waiter: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);

    create_shift(
        &mut persistence,
        &manager,
        &shift_request(waiter.employee_id, "2024-07-03", "09:00", "12:00"),
        NOW,
    )
    .unwrap();
    create_shift(
        &mut persistence,
        &manager,
        &shift_request(waiter.employee_id, "2024-07-03", "10:00", "14:00"),
        NOW,
    )
    .unwrap();

    let shifts: Vec<ShiftResponse> =
        list_shifts(&mut persistence, &manager, &ShiftListQuery::default()).unwrap();
    assert_eq!(shifts.len(), 2);
}

#[test]
fn test_create_shift_reports_every_invalid_field() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);

    let mut request: CreateShiftRequest = shift_request(manager.employee_id, "2024-02-30", "25:00", "9am");
    request.shift_type = String::from("brunch");
    request.break_duration_minutes = Some(-5);

    let result = create_shift(&mut persistence, &manager, &request, NOW);

    let Err(ApiError::ValidationFailed { details }) = result else {
        panic!("expected validation failure, got {result:?}");
    };
    let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(
        fields,
        vec![
            "date",
            "shift_type",
            "start_time",
            "end_time",
            "break_duration_minutes"
        ]
    );
}

#[test]
fn test_create_shift_for_unknown_employee_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);

    let result = create_shift(
        &mut persistence,
        &manager,
        &shift_request(4242, "2024-07-03", "09:00", "12:00"),
        NOW,
    );
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_only_managers_create_and_delete_shifts() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let owner: AuthenticatedActor = create_test_owner(&mut persistence);

    let created: ShiftResponse = create_shift(
        &mut persistence,
        &manager,
        &shift_request(owner.employee_id, "2024-07-03", "09:00", "12:00"),
        NOW,
    )
    .unwrap();

    let by_owner = create_shift(
        &mut persistence,
        &owner,
        &shift_request(owner.employee_id, "2024-07-04", "09:00", "12:00"),
        NOW,
    );
    assert!(matches!(by_owner, Err(ApiError::Unauthorized { .. })));
    assert!(matches!(
        delete_shift(&mut persistence, &owner, created.shift_id),
        Err(ApiError::Unauthorized { .. })
    ));

    delete_shift(&mut persistence, &manager, created.shift_id).unwrap();
    assert!(matches!(
        delete_shift(&mut persistence, &manager, created.shift_id),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_staff_list_is_limited_to_own_shifts() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let walt: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);
    let wendy: AuthenticatedActor = create_test_waiter(&mut persistence, "Wendy", None);

    for (employee_id, date) in [
        (walt.employee_id, "2024-07-02"),
        (wendy.employee_id, "2024-07-02"),
        (walt.employee_id, "2024-07-01"),
    ] {
        create_shift(
            &mut persistence,
            &manager,
            &shift_request(employee_id, date, "09:00", "12:00"),
            NOW,
        )
        .unwrap();
    }

    // An explicit filter for another employee is ignored for staff.
    let query: ShiftListQuery = ShiftListQuery {
        employee_id: Some(wendy.employee_id),
        ..ShiftListQuery::default()
    };
    let own: Vec<ShiftResponse> = list_shifts(&mut persistence, &walt, &query).unwrap();
    assert_eq!(own.len(), 2);
    assert!(own.iter().all(|s| s.employee_id == walt.employee_id));
    assert_eq!(own[0].date, "2024-07-01");

    let managed: Vec<ShiftResponse> = list_shifts(&mut persistence, &manager, &query).unwrap();
    assert_eq!(managed.len(), 1);
    assert_eq!(managed[0].employee_id, wendy.employee_id);

    let ranged: Vec<ShiftResponse> = list_shifts(
        &mut persistence,
        &manager,
        &ShiftListQuery {
            start_date: Some(String::from("2024-07-02")),
            end_date: Some(String::from("2024-07-02")),
            ..ShiftListQuery::default()
        },
    )
    .unwrap();
    assert_eq!(ranged.len(), 2);
}

#[test]
fn test_staff_cannot_see_another_employees_shift() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let walt: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);
    let wendy: AuthenticatedActor = create_test_waiter(&mut persistence, "Wendy", None);

    let created: ShiftResponse = create_shift(
        &mut persistence,
        &manager,
        &shift_request(wendy.employee_id, "2024-07-02", "09:00", "12:00"),
        NOW,
    )
    .unwrap();

    assert!(matches!(
        get_shift(&mut persistence, &walt, created.shift_id),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_staff_may_update_only_notes_on_own_shift() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let walt: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);

    let created: ShiftResponse = create_shift(
        &mut persistence,
        &manager,
        &shift_request(walt.employee_id, "2024-07-02", "09:00", "12:00"),
        NOW,
    )
    .unwrap();

    let notes_only: UpdateShiftRequest = UpdateShiftRequest {
        notes: Some(Some(String::from("Swapped with Wendy"))),
        ..UpdateShiftRequest::default()
    };
    let updated: ShiftResponse =
        update_shift(&mut persistence, &walt, created.shift_id, &notes_only, NOW).unwrap();
    assert_eq!(updated.notes.as_deref(), Some("Swapped with Wendy"));

    let with_time: UpdateShiftRequest = UpdateShiftRequest {
        start_time: Some(String::from("08:00")),
        notes: Some(None),
        ..UpdateShiftRequest::default()
    };
    let result = update_shift(&mut persistence, &walt, created.shift_id, &with_time, NOW);
    let Err(ApiError::Unauthorized { reason, .. }) = result else {
        panic!("expected authorization failure, got {result:?}");
    };
    assert_eq!(reason, "You can only update notes on your shifts");

    let unchanged: ShiftResponse = get_shift(&mut persistence, &walt, created.shift_id).unwrap();
    assert_eq!(unchanged.start_time, "09:00");
}

#[test]
fn test_manager_update_can_clear_nullable_fields() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let walt: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);

    let mut request: CreateShiftRequest =
        shift_request(walt.employee_id, "2024-07-02", "12:00", "16:00");
    request.shift_type = String::from("split");
    request.second_start_time = Some(String::from("20:00"));
    request.second_end_time = Some(String::from("23:30"));
    request.notes = Some(String::from("Double"));
    let created: ShiftResponse = create_shift(&mut persistence, &manager, &request, NOW).unwrap();

    let changes: UpdateShiftRequest = serde_json::from_str(
        r#"{"shift_type":"morning","second_start_time":null,"second_end_time":null,"notes":null,"status":"confirmed"}"#,
    )
    .unwrap();
    let updated: ShiftResponse =
        update_shift(&mut persistence, &manager, created.shift_id, &changes, NOW).unwrap();

    assert_eq!(updated.shift_type, "morning");
    assert_eq!(updated.second_start_time, None);
    assert_eq!(updated.second_end_time, None);
    assert_eq!(updated.notes, None);
    assert_eq!(updated.status, "confirmed");
}

#[test]
fn test_shift_types_lists_catalog() {
    let windows: Vec<TimeWindow> = shift_types();

    assert_eq!(windows.len(), 4);
    let night: &TimeWindow = windows
        .iter()
        .find(|w| w.shift_type == ShiftType::Night)
        .unwrap();
    assert_eq!((night.start, night.end), ("23:00", "03:00"));
    assert_eq!(night.break_minutes, 0);
}
