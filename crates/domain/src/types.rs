// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Implements `Display` in terms of an `as_str` method.
macro_rules! display_via_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

/// The role tag carried by an employee.
///
/// `Admin` and `Manager` are the manager-level roles: they may edit plans,
/// shifts and employees. Every other role is staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    Admin,
    Manager,
    Owner,
    Waiter,
    Bar,
    Kitchen,
    Dj,
}

impl EmployeeRole {
    /// Converts this role to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Owner => "owner",
            Self::Waiter => "waiter",
            Self::Bar => "bar",
            Self::Kitchen => "kitchen",
            Self::Dj => "dj",
        }
    }

    /// Returns whether this role may manage schedules and staff.
    #[must_use]
    pub const fn is_manager(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl FromStr for EmployeeRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "owner" => Ok(Self::Owner),
            "waiter" => Ok(Self::Waiter),
            "bar" => Ok(Self::Bar),
            "kitchen" => Ok(Self::Kitchen),
            "dj" => Ok(Self::Dj),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

/// Whether an employee currently works at the restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    #[default]
    Active,
    Inactive,
}

impl EmploymentStatus {
    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for EmploymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidEmploymentStatus(s.to_string())),
        }
    }
}

/// The shift-type tag. Only a label: explicit shift times are never forced
/// to match the catalog window for the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    Morning,
    Afternoon,
    Night,
    Split,
}

impl ShiftType {
    /// All tags in catalog order.
    pub const ALL: [Self; 4] = [Self::Morning, Self::Afternoon, Self::Night, Self::Split];

    /// Converts this shift type to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Night => "night",
            Self::Split => "split",
        }
    }
}

impl FromStr for ShiftType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "night" => Ok(Self::Night),
            "split" => Ok(Self::Split),
            _ => Err(DomainError::InvalidShiftType(s.to_string())),
        }
    }
}

/// The status of a scheduled shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    #[default]
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl ShiftStatus {
    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }
}

impl FromStr for ShiftStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no_show" => Ok(Self::NoShow),
            _ => Err(DomainError::InvalidShiftStatus(s.to_string())),
        }
    }
}

/// Lifecycle status of a schedule plan.
///
/// Any status may be set to any other; only deletion looks at the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PlanStatus {
    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    /// Returns whether a plan in this status may be deleted.
    #[must_use]
    pub const fn is_deletable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl FromStr for PlanStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(DomainError::InvalidPlanStatus(s.to_string())),
        }
    }
}

display_via_as_str!(EmployeeRole, EmploymentStatus, ShiftType, ShiftStatus, PlanStatus);

/// An employee as seen by the scheduling core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub employee_id: i64,
    pub full_name: String,
    pub role: EmployeeRole,
    pub employment_status: EmploymentStatus,
    pub kiosk_pin: Option<String>,
    pub login_name: Option<String>,
    pub created_at: String,
}

impl Employee {
    /// Returns whether the employee is currently employed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.employment_status, EmploymentStatus::Active)
    }
}
