// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries, one module per table group.
//!
//! - `employees`: employees and staff sessions
//! - `shifts`: shift records
//! - `plans`: schedule plans
//! - `clock`: clock records and breaks

pub mod clock;
pub mod employees;
pub mod plans;
pub mod shifts;
