// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations, one module per table group.
//!
//! Inserts read the new id back through `PersistenceBackend::last_insert_id`.
//! Multi-row writes run inside a single transaction.

pub mod clock;
pub mod employees;
pub mod plans;
pub mod shifts;
