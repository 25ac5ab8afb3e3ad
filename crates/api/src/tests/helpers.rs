// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use shiftdesk_domain::EmployeeRole;
use shiftdesk_persistence::{NewEmployeeData, Persistence};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{AuthenticatedActor, CreateShiftRequest, KioskSessionSigner};

/// Monday 2024-07-01, 09:00 UTC.
pub const NOW: OffsetDateTime = datetime!(2024-07-01 09:00 UTC);

pub const TEST_PASSWORD: &str = "correct-horse";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

fn create_employee(
    persistence: &mut Persistence,
    full_name: &str,
    role: EmployeeRole,
    login_name: Option<&str>,
    kiosk_pin: Option<&str>,
) -> AuthenticatedActor {
    let employee_id: i64 = persistence
        .create_employee(&NewEmployeeData {
            full_name,
            role,
            login_name,
            password: login_name.map(|_| TEST_PASSWORD),
            kiosk_pin,
            created_at: "2024-06-01T00:00:00Z",
        })
        .expect("Failed to create employee");
    AuthenticatedActor::new(employee_id, role)
}

pub fn create_test_manager(persistence: &mut Persistence) -> AuthenticatedActor {
    create_employee(
        persistence,
        "Marta Manager",
        EmployeeRole::Manager,
        Some("marta"),
        None,
    )
}

pub fn create_test_waiter(
    persistence: &mut Persistence,
    full_name: &str,
    kiosk_pin: Option<&str>,
) -> AuthenticatedActor {
    create_employee(persistence, full_name, EmployeeRole::Waiter, None, kiosk_pin)
}

pub fn create_test_owner(persistence: &mut Persistence) -> AuthenticatedActor {
    create_employee(persistence, "Olga Owner", EmployeeRole::Owner, Some("olga"), None)
}

pub fn shift_request(employee_id: i64, date: &str, start: &str, end: &str) -> CreateShiftRequest {
    CreateShiftRequest {
        employee_id,
        date: date.to_string(),
        shift_type: String::from("morning"),
        start_time: start.to_string(),
        end_time: end.to_string(),
        second_start_time: None,
        second_end_time: None,
        break_duration_minutes: Some(30),
        is_day_off: None,
        schedule_plan_id: None,
        notes: None,
    }
}

pub fn create_test_signer() -> KioskSessionSigner {
    KioskSessionSigner::new(Some("kiosk-test-secret"))
}
