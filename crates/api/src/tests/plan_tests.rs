// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftdesk_domain::{LaborConstraints, ScheduleValidation, ViolationKind};
use shiftdesk_persistence::Persistence;

use crate::tests::helpers::{
    NOW, create_test_manager, create_test_persistence, create_test_waiter, shift_request,
};
use crate::{
    ApiError, AuthenticatedActor, CopyPlanRequest, CreatePlanRequest, CreateShiftRequest,
    PlanOnlyResponse, PlanWithShiftsResponse, ShiftResponse, SyncRequest, SyncResponse,
    SyncUpdateItem, UpdatePlanRequest, UpdateShiftRequest, WeekQuery, copy_plan, create_plan,
    create_shift, delete_plan, export_plan_csv, get_plan_for_week, sync_plan, update_plan,
    update_shift, validate_plan,
};

fn week(date: &str) -> WeekQuery {
    WeekQuery {
        week_start_date: date.to_string(),
    }
}

fn new_plan(persistence: &mut Persistence, manager: &AuthenticatedActor, date: &str) -> i64 {
    create_plan(
        persistence,
        manager,
        &CreatePlanRequest {
            week_start_date: date.to_string(),
            notes: None,
        },
        NOW,
    )
    .unwrap()
    .plan
    .unwrap()
    .plan_id
}

fn plan_shift(
    persistence: &mut Persistence,
    manager: &AuthenticatedActor,
    plan_id: i64,
    employee_id: i64,
    date: &str,
) -> ShiftResponse {
    let mut request: CreateShiftRequest = shift_request(employee_id, date, "10:00", "17:00");
    request.schedule_plan_id = Some(plan_id);
    create_shift(persistence, manager, &request, NOW).unwrap()
}

#[test]
fn test_plan_versions_increase_and_latest_wins() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);

    let ids: Vec<i64> = (0..3)
        .map(|_| new_plan(&mut persistence, &manager, "2024-07-01"))
        .collect();

    let response: PlanWithShiftsResponse =
        get_plan_for_week(&mut persistence, &week("2024-07-01")).unwrap();
    let plan = response.plan.unwrap();
    assert_eq!(plan.version, 3);
    assert_eq!(plan.plan_id, ids[2]);
    assert_eq!(plan.status, "draft");
    assert_eq!(plan.created_by, manager.employee_id);
}

#[test]
fn test_week_without_plan_is_empty() {
    let mut persistence: Persistence = create_test_persistence();

    let response: PlanWithShiftsResponse =
        get_plan_for_week(&mut persistence, &week("2024-07-01")).unwrap();

    assert!(response.plan.is_none());
    assert!(response.shifts.is_empty());
}

#[test]
fn test_plan_week_date_is_validated() {
    let mut persistence: Persistence = create_test_persistence();

    let result = get_plan_for_week(&mut persistence, &week("07/01/2024"));
    assert!(matches!(result, Err(ApiError::ValidationFailed { .. })));
}

#[test]
fn test_create_plan_requires_manager() {
    let mut persistence: Persistence = create_test_persistence();
    let waiter: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);

    let result = create_plan(
        &mut persistence,
        &waiter,
        &CreatePlanRequest {
            week_start_date: String::from("2024-07-01"),
            notes: None,
        },
        NOW,
    );
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_plan_status_changes_are_unrestricted() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let plan_id: i64 = new_plan(&mut persistence, &manager, "2024-07-01");

    let published: PlanOnlyResponse = update_plan(
        &mut persistence,
        &manager,
        plan_id,
        &UpdatePlanRequest {
            status: Some(String::from("published")),
            notes: Some(Some(String::from("Final"))),
        },
        NOW,
    )
    .unwrap();
    assert_eq!(published.plan.status, "published");
    assert_eq!(published.plan.notes.as_deref(), Some("Final"));

    let reverted: PlanOnlyResponse = update_plan(
        &mut persistence,
        &manager,
        plan_id,
        &UpdatePlanRequest {
            status: Some(String::from("draft")),
            notes: None,
        },
        NOW,
    )
    .unwrap();
    assert_eq!(reverted.plan.status, "draft");
    assert_eq!(reverted.plan.notes.as_deref(), Some("Final"));

    let invalid = update_plan(
        &mut persistence,
        &manager,
        plan_id,
        &UpdatePlanRequest {
            status: Some(String::from("shredded")),
            notes: None,
        },
        NOW,
    );
    assert!(matches!(invalid, Err(ApiError::ValidationFailed { .. })));
}

#[test]
fn test_only_draft_plans_can_be_deleted() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let waiter: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);
    let plan_id: i64 = new_plan(&mut persistence, &manager, "2024-07-01");
    let shift: ShiftResponse =
        plan_shift(&mut persistence, &manager, plan_id, waiter.employee_id, "2024-07-02");

    update_plan(
        &mut persistence,
        &manager,
        plan_id,
        &UpdatePlanRequest {
            status: Some(String::from("published")),
            notes: None,
        },
        NOW,
    )
    .unwrap();
    let refused = delete_plan(&mut persistence, &manager, plan_id);
    assert!(matches!(refused, Err(ApiError::InvalidInput { .. })));

    update_plan(
        &mut persistence,
        &manager,
        plan_id,
        &UpdatePlanRequest {
            status: Some(String::from("draft")),
            notes: None,
        },
        NOW,
    )
    .unwrap();
    delete_plan(&mut persistence, &manager, plan_id).unwrap();

    assert!(persistence.get_plan(plan_id).unwrap().is_none());
    assert!(persistence.get_shift(shift.shift_id).unwrap().is_none());
    assert!(matches!(
        delete_plan(&mut persistence, &manager, plan_id),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_copy_moves_dates_and_resets_status() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let waiter: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);
    let source_id: i64 = new_plan(&mut persistence, &manager, "2024-07-01");

    let monday: ShiftResponse =
        plan_shift(&mut persistence, &manager, source_id, waiter.employee_id, "2024-07-01");
    plan_shift(&mut persistence, &manager, source_id, waiter.employee_id, "2024-07-06");
    update_shift(
        &mut persistence,
        &manager,
        monday.shift_id,
        &UpdateShiftRequest {
            status: Some(String::from("completed")),
            notes: Some(Some(String::from("Covered the bar"))),
            ..UpdateShiftRequest::default()
        },
        NOW,
    )
    .unwrap();

    let copied: PlanWithShiftsResponse = copy_plan(
        &mut persistence,
        &manager,
        source_id,
        &CopyPlanRequest {
            target_week_start_date: String::from("2024-07-15"),
        },
        NOW,
    )
    .unwrap();

    let plan = copied.plan.unwrap();
    assert_eq!(plan.week_start_date, "2024-07-15");
    assert_eq!(plan.version, 1);
    assert_eq!(plan.status, "draft");
    assert_eq!(plan.copied_from_plan_id, Some(source_id));

    let target: PlanWithShiftsResponse =
        get_plan_for_week(&mut persistence, &week("2024-07-15")).unwrap();
    let dates: Vec<&str> = target.shifts.iter().map(|s| s.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-07-15", "2024-07-20"]);
    assert!(target.shifts.iter().all(|s| s.status == "scheduled"));
    assert!(target.shifts.iter().all(|s| s.notes.is_none()));
    assert!(
        target
            .shifts
            .iter()
            .all(|s| s.schedule_plan_id == Some(plan.plan_id))
    );
}

#[test]
fn test_copy_into_occupied_week_is_a_conflict() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let source_id: i64 = new_plan(&mut persistence, &manager, "2024-07-01");
    new_plan(&mut persistence, &manager, "2024-07-08");

    let result = copy_plan(
        &mut persistence,
        &manager,
        source_id,
        &CopyPlanRequest {
            target_week_start_date: String::from("2024-07-08"),
        },
        NOW,
    );
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_sync_then_copy_end_to_end() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let e1: AuthenticatedActor = create_test_waiter(&mut persistence, "E1", None);

    let plan_id: i64 = new_plan(&mut persistence, &manager, "2024-07-01");
    let synced: SyncResponse = sync_plan(
        &mut persistence,
        &manager,
        plan_id,
        &SyncRequest {
            shifts_to_create: vec![shift_request(e1.employee_id, "2024-07-01", "10:00", "17:00")],
            shifts_to_update: Vec::new(),
            shifts_to_delete: Vec::new(),
        },
        NOW,
    )
    .unwrap();
    assert_eq!(synced.results.created, 1);
    assert!(synced.results.errors.is_empty());
    assert_eq!(synced.shifts.len(), 1);
    assert_eq!(synced.shifts[0].schedule_plan_id, Some(plan_id));

    let copied: PlanWithShiftsResponse = copy_plan(
        &mut persistence,
        &manager,
        plan_id,
        &CopyPlanRequest {
            target_week_start_date: String::from("2024-07-08"),
        },
        NOW,
    )
    .unwrap();
    let copy_plan_id: i64 = copied.plan.as_ref().unwrap().plan_id;
    assert_ne!(copy_plan_id, plan_id);
    assert_eq!(copied.plan.unwrap().version, 1);
    assert_eq!(copied.shifts.len(), 1);
    assert_eq!(copied.shifts[0].date, "2024-07-08");
}

#[test]
fn test_sync_reports_failures_without_undoing_other_groups() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let waiter: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);
    let plan_id: i64 = new_plan(&mut persistence, &manager, "2024-07-01");
    let doomed: ShiftResponse =
        plan_shift(&mut persistence, &manager, plan_id, waiter.employee_id, "2024-07-01");
    let kept: ShiftResponse =
        plan_shift(&mut persistence, &manager, plan_id, waiter.employee_id, "2024-07-02");

    let mut bad_create: CreateShiftRequest =
        shift_request(waiter.employee_id, "2024-07-32", "10:00", "17:00");
    bad_create.shift_type = String::from("graveyard");

    let response: SyncResponse = sync_plan(
        &mut persistence,
        &manager,
        plan_id,
        &SyncRequest {
            shifts_to_create: vec![
                shift_request(waiter.employee_id, "2024-07-03", "10:00", "17:00"),
                bad_create,
            ],
            shifts_to_update: vec![
                SyncUpdateItem {
                    id: kept.shift_id,
                    fields: UpdateShiftRequest {
                        notes: Some(Some(String::from("Opens"))),
                        ..UpdateShiftRequest::default()
                    },
                },
                SyncUpdateItem {
                    id: 999,
                    fields: UpdateShiftRequest {
                        notes: Some(Some(String::from("Ghost"))),
                        ..UpdateShiftRequest::default()
                    },
                },
            ],
            shifts_to_delete: vec![doomed.shift_id, 12_345],
        },
        NOW,
    )
    .unwrap();

    assert_eq!(response.results.deleted, 1);
    assert_eq!(response.results.created, 0);
    assert_eq!(response.results.updated, 1);
    assert_eq!(response.results.errors.len(), 2);
    assert!(response.results.errors[0].starts_with("Create error: "));
    assert!(response.results.errors[0].contains("shifts_to_create[1].date"));
    assert!(response.results.errors[0].contains("shifts_to_create[1].shift_type"));
    assert!(response.results.errors[1].starts_with("Update error for 999: "));

    assert_eq!(response.shifts.len(), 1);
    assert_eq!(response.shifts[0].shift_id, kept.shift_id);
    assert_eq!(response.shifts[0].notes.as_deref(), Some("Opens"));
}

#[test]
fn test_sync_of_unknown_plan_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);

    let result = sync_plan(&mut persistence, &manager, 77, &SyncRequest::default(), NOW);
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_sync_request_accepts_short_keys() {
    let request: SyncRequest = serde_json::from_str(
        r#"{"toCreate": [], "toUpdate": [{"id": 4, "notes": null}], "toDelete": [3]}"#,
    )
    .unwrap();

    assert!(request.shifts_to_create.is_empty());
    assert_eq!(request.shifts_to_delete, vec![3]);
    assert_eq!(request.shifts_to_update[0].id, 4);
    assert_eq!(request.shifts_to_update[0].fields.notes, Some(None));
    assert_eq!(request.shifts_to_update[0].fields.start_time, None);
}

#[test]
fn test_validate_plan_flags_overwork() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let waiter: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);
    let plan_id: i64 = new_plan(&mut persistence, &manager, "2024-07-01");

    for day in 1..=6 {
        let mut request: CreateShiftRequest = shift_request(
            waiter.employee_id,
            &format!("2024-07-0{day}"),
            "10:00",
            "22:00",
        );
        request.break_duration_minutes = Some(0);
        request.schedule_plan_id = Some(plan_id);
        create_shift(&mut persistence, &manager, &request, NOW).unwrap();
    }

    let report: ScheduleValidation = validate_plan(
        &mut persistence,
        &manager,
        plan_id,
        &LaborConstraints::default(),
    )
    .unwrap();

    assert!(!report.valid);
    let error_kinds: Vec<ViolationKind> = report.errors.iter().map(|v| v.kind).collect();
    assert_eq!(error_kinds, vec![ViolationKind::MaxHours, ViolationKind::DaysOff]);
    assert_eq!(report.errors[0].employee_name.as_deref(), Some("Walt"));
    let warning_kinds: Vec<ViolationKind> = report.warnings.iter().map(|v| v.kind).collect();
    assert_eq!(warning_kinds, vec![ViolationKind::Coverage]);
}

#[test]
fn test_export_plan_as_csv() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let waiter: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);
    let plan_id: i64 = new_plan(&mut persistence, &manager, "2024-07-01");
    let shift: ShiftResponse =
        plan_shift(&mut persistence, &manager, plan_id, waiter.employee_id, "2024-07-01");

    let csv: String = export_plan_csv(&mut persistence, &manager, plan_id).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(
        lines[0],
        "employee_id,employee_name,date,shift_type,start_time,end_time,second_start_time,second_end_time,break_minutes,paid_hours,is_day_off,status,notes"
    );
    assert_eq!(
        lines[1],
        format!(
            "{},Walt,2024-07-01,morning,10:00,17:00,,,30,6.50,false,scheduled,",
            shift.employee_id
        )
    );
    assert_eq!(lines.len(), 2);
}

#[test]
fn test_sync_update_cannot_move_shift_to_other_cell() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    let walt: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);
    let vera: AuthenticatedActor = create_test_waiter(&mut persistence, "Vera", None);
    let plan_id: i64 = new_plan(&mut persistence, &manager, "2024-07-01");
    let shift: ShiftResponse =
        plan_shift(&mut persistence, &manager, plan_id, walt.employee_id, "2024-07-01");

    let response: SyncResponse = sync_plan(
        &mut persistence,
        &manager,
        plan_id,
        &SyncRequest {
            shifts_to_update: vec![SyncUpdateItem {
                id: shift.shift_id,
                fields: UpdateShiftRequest {
                    employee_id: Some(vera.employee_id),
                    date: Some(String::from("2024-07-02")),
                    status: Some(String::from("confirmed")),
                    start_time: Some(String::from("11:00")),
                    ..UpdateShiftRequest::default()
                },
            }],
            ..SyncRequest::default()
        },
        NOW,
    )
    .unwrap();

    assert_eq!(response.results.updated, 0);
    assert_eq!(response.results.errors.len(), 1);
    let error: &str = &response.results.errors[0];
    assert!(error.starts_with(&format!("Update error for {}: ", shift.shift_id)));
    assert!(error.contains("employee_id: cannot be changed by a grid sync"));
    assert!(error.contains("date: cannot be changed by a grid sync"));
    assert!(error.contains("status: cannot be changed by a grid sync"));

    assert_eq!(response.shifts.len(), 1);
    assert_eq!(response.shifts[0].employee_id, walt.employee_id);
    assert_eq!(response.shifts[0].date, "2024-07-01");
    assert_eq!(response.shifts[0].start_time, "10:00");
}
