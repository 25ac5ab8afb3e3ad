// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The kiosk clock session state machine.
//!
//! `ClockState` is derived from the stored clock record and break rows, a
//! `ClockCommand` is applied to it, and the resulting `Transition` lists the
//! writes to perform. Storage is the caller's job.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

pub use apply::apply;
pub use command::ClockCommand;
pub use error::CoreError;
pub use state::{ClockEffect, ClockState, Transition};
