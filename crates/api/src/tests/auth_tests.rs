// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftdesk_domain::{Employee, EmployeeRole};
use shiftdesk_persistence::Persistence;
use time::Duration;

use crate::tests::helpers::{
    NOW, TEST_PASSWORD, create_test_manager, create_test_owner, create_test_persistence,
    create_test_waiter,
};
use crate::{
    ApiError, AuthenticatedActor, AuthenticationService, BootstrapRequest, CreateEmployeeRequest,
    EmployeeInfo, LoginRequest, LoginResponse, SetKioskPinRequest, bootstrap, create_employee,
    list_employees, login, logout, set_kiosk_pin, validate_pin,
};

fn bootstrap_request(password: &str) -> BootstrapRequest {
    BootstrapRequest {
        login_name: String::from("boss"),
        full_name: String::from("Bea Boss"),
        password: password.to_string(),
        password_confirmation: password.to_string(),
    }
}

fn employee_request(full_name: &str, role: &str, pin: Option<&str>) -> CreateEmployeeRequest {
    CreateEmployeeRequest {
        full_name: full_name.to_string(),
        role: role.to_string(),
        login_name: None,
        password: None,
        password_confirmation: None,
        kiosk_pin: pin.map(ToString::to_string),
    }
}

#[test]
fn test_bootstrap_creates_admin_once() {
    let mut persistence: Persistence = create_test_persistence();

    let admin: EmployeeInfo =
        bootstrap(&mut persistence, &bootstrap_request("long-enough"), NOW).unwrap();
    assert_eq!(admin.role, "admin");
    assert_eq!(admin.login_name.as_deref(), Some("BOSS"));

    let second: Result<EmployeeInfo, ApiError> =
        bootstrap(&mut persistence, &bootstrap_request("long-enough"), NOW);
    assert!(matches!(second, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_bootstrap_rejects_short_password() {
    let mut persistence: Persistence = create_test_persistence();

    let result: Result<EmployeeInfo, ApiError> =
        bootstrap(&mut persistence, &bootstrap_request("short"), NOW);

    let Err(ApiError::ValidationFailed { details }) = result else {
        panic!("expected validation failure, got {result:?}");
    };
    assert_eq!(details[0].field, "password");
    assert_eq!(persistence.count_employees().unwrap(), 0);
}

#[test]
fn test_login_is_case_insensitive_and_creates_session() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);

    let response: LoginResponse = login(
        &mut persistence,
        &LoginRequest {
            login_name: String::from("Marta"),
            password: TEST_PASSWORD.to_string(),
        },
        NOW,
    )
    .unwrap();
    assert_eq!(response.employee.employee_id, manager.employee_id);

    let (actor, employee): (AuthenticatedActor, Employee) =
        AuthenticationService::validate_session(&mut persistence, &response.session_token, NOW)
            .unwrap();
    assert_eq!(actor.role, EmployeeRole::Manager);
    assert_eq!(employee.full_name, "Marta Manager");
}

#[test]
fn test_login_rejects_wrong_password() {
    let mut persistence: Persistence = create_test_persistence();
    create_test_manager(&mut persistence);

    let result: Result<LoginResponse, ApiError> = login(
        &mut persistence,
        &LoginRequest {
            login_name: String::from("marta"),
            password: String::from("not-the-password"),
        },
        NOW,
    );
    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
}

#[test]
fn test_session_expires_after_thirty_days() {
    let mut persistence: Persistence = create_test_persistence();
    create_test_manager(&mut persistence);
    let response: LoginResponse = login(
        &mut persistence,
        &LoginRequest {
            login_name: String::from("marta"),
            password: TEST_PASSWORD.to_string(),
        },
        NOW,
    )
    .unwrap();

    let later = NOW + Duration::days(30) + Duration::seconds(1);
    let result = AuthenticationService::validate_session(
        &mut persistence,
        &response.session_token,
        later,
    );
    assert!(result.is_err());
}

#[test]
fn test_logout_invalidates_session() {
    let mut persistence: Persistence = create_test_persistence();
    create_test_manager(&mut persistence);
    let response: LoginResponse = login(
        &mut persistence,
        &LoginRequest {
            login_name: String::from("marta"),
            password: TEST_PASSWORD.to_string(),
        },
        NOW,
    )
    .unwrap();

    logout(&mut persistence, &response.session_token).unwrap();

    let result = AuthenticationService::validate_session(
        &mut persistence,
        &response.session_token,
        NOW,
    );
    assert!(result.is_err());
}

#[test]
fn test_staff_and_owner_cannot_manage_employees() {
    let mut persistence: Persistence = create_test_persistence();
    let waiter: AuthenticatedActor = create_test_waiter(&mut persistence, "Walt", None);
    let owner: AuthenticatedActor = create_test_owner(&mut persistence);

    for actor in [&waiter, &owner] {
        let created = create_employee(
            &mut persistence,
            actor,
            &employee_request("Nina", "bar", None),
            NOW,
        );
        assert!(matches!(created, Err(ApiError::Unauthorized { .. })));
        assert!(matches!(
            list_employees(&mut persistence, actor),
            Err(ApiError::Unauthorized { .. })
        ));
    }
}

#[test]
fn test_create_employee_reports_invalid_role() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);

    let result = create_employee(
        &mut persistence,
        &manager,
        &employee_request("", "sommelier", None),
        NOW,
    );

    let Err(ApiError::ValidationFailed { details }) = result else {
        panic!("expected validation failure, got {result:?}");
    };
    let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(fields, vec!["full_name", "role"]);
}

#[test]
fn test_kiosk_pin_must_be_unique_among_active_employees() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);
    create_test_waiter(&mut persistence, "Walt", Some("1234"));

    let duplicate = create_employee(
        &mut persistence,
        &manager,
        &employee_request("Nina", "bar", Some("1234")),
        NOW,
    );
    assert!(matches!(duplicate, Err(ApiError::Conflict { .. })));

    let nina: EmployeeInfo = create_employee(
        &mut persistence,
        &manager,
        &employee_request("Nina", "bar", Some("5678")),
        NOW,
    )
    .unwrap();
    assert!(nina.has_kiosk_pin);

    let reassigned = set_kiosk_pin(
        &mut persistence,
        &manager,
        nina.employee_id,
        &SetKioskPinRequest {
            pin: String::from("1234"),
        },
    );
    assert!(matches!(reassigned, Err(ApiError::Conflict { .. })));

    // Re-setting the employee's own PIN is not a collision.
    set_kiosk_pin(
        &mut persistence,
        &manager,
        nina.employee_id,
        &SetKioskPinRequest {
            pin: String::from("5678"),
        },
    )
    .unwrap();
}

#[test]
fn test_set_kiosk_pin_validates_format_and_employee() {
    let mut persistence: Persistence = create_test_persistence();
    let manager: AuthenticatedActor = create_test_manager(&mut persistence);

    let bad_format = set_kiosk_pin(
        &mut persistence,
        &manager,
        manager.employee_id,
        &SetKioskPinRequest {
            pin: String::from("12a4"),
        },
    );
    assert!(matches!(bad_format, Err(ApiError::ValidationFailed { .. })));

    let missing = set_kiosk_pin(
        &mut persistence,
        &manager,
        9999,
        &SetKioskPinRequest {
            pin: String::from("4321"),
        },
    );
    assert!(matches!(missing, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_validate_pin_format() {
    assert!(validate_pin("0042").is_ok());
    assert!(validate_pin("123").is_err());
    assert!(validate_pin("12345").is_err());
    assert!(validate_pin("١٢٣٤").is_err());
}
