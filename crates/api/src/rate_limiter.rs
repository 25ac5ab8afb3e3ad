// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-process limiter for failed kiosk PIN attempts.
//!
//! Failures are kept per source key in a sliding window. State lives in this
//! process only; separate server instances do not share counts.

use std::collections::{HashMap, VecDeque};

use num_traits::ToPrimitive;
use time::{Duration, OffsetDateTime};

/// Sliding-window counter of failed PIN attempts keyed by client address.
#[derive(Debug)]
pub struct PinAttemptLimiter {
    max_attempts: usize,
    window: Duration,
    failures: HashMap<String, VecDeque<OffsetDateTime>>,
}

impl Default for PinAttemptLimiter {
    fn default() -> Self {
        Self::new(5, Duration::minutes(15))
    }
}

impl PinAttemptLimiter {
    #[must_use]
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            failures: HashMap::new(),
        }
    }

    /// Returns `Err(minutes_remaining)` when `key` has used up its attempts.
    ///
    /// The remaining time runs until the oldest failure in the window
    /// expires, rounded up to whole minutes and never below one.
    ///
    /// # Errors
    ///
    /// Returns the whole minutes until the next attempt is allowed.
    pub fn check(&mut self, key: &str, now: OffsetDateTime) -> Result<(), u64> {
        let Some(failures) = self.failures.get_mut(key) else {
            return Ok(());
        };
        prune(failures, now - self.window);

        if failures.len() < self.max_attempts {
            if failures.is_empty() {
                self.failures.remove(key);
            }
            return Ok(());
        }

        let unblocked_at: OffsetDateTime = failures
            .front()
            .map_or(now, |oldest| *oldest + self.window);
        Err(minutes_until(now, unblocked_at))
    }

    /// Records a failed attempt for `key`.
    ///
    /// Every key whose newest failure has left the window is dropped first,
    /// so addresses that never come back do not accumulate.
    pub fn record_failure(&mut self, key: &str, now: OffsetDateTime) {
        self.evict_expired(now);
        self.failures
            .entry(key.to_string())
            .or_default()
            .push_back(now);
    }

    /// Drops every key with no failure inside the window at `now`.
    pub fn evict_expired(&mut self, now: OffsetDateTime) {
        let cutoff: OffsetDateTime = now - self.window;
        self.failures.retain(|_, failures| {
            prune(failures, cutoff);
            !failures.is_empty()
        });
    }

    /// Number of keys currently tracked.
    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.failures.len()
    }

    /// Forgets every failure for `key`.
    pub fn reset(&mut self, key: &str) {
        self.failures.remove(key);
    }

    /// Number of failures for `key` still inside the window.
    #[must_use]
    pub fn failures(&self, key: &str, now: OffsetDateTime) -> usize {
        let cutoff: OffsetDateTime = now - self.window;
        self.failures
            .get(key)
            .map_or(0, |f| f.iter().filter(|at| **at > cutoff).count())
    }
}

fn prune(failures: &mut VecDeque<OffsetDateTime>, cutoff: OffsetDateTime) {
    while failures.front().is_some_and(|at| *at <= cutoff) {
        failures.pop_front();
    }
}

fn minutes_until(now: OffsetDateTime, then: OffsetDateTime) -> u64 {
    let seconds: i64 = (then - now).whole_seconds().max(0);
    let minutes: u64 = (seconds + 59).div_euclid(60).to_u64().unwrap_or(1);
    minutes.max(1)
}
