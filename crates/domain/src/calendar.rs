// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar dates, wall-clock times and timestamps.
//!
//! Shift dates and times are restaurant-local labels with no timezone. They
//! are validated here but always stored exactly as submitted. Instants (clock
//! events, row timestamps) are `OffsetDateTime` values stored as RFC 3339
//! text in UTC.

use chrono::Datelike;
use chrono_tz::Tz;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, UtcOffset, Weekday};

use crate::error::DomainError;

/// A calendar day written as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShiftDate(Date);

impl ShiftDate {
    /// Parses a strict `YYYY-MM-DD` date.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDate` if the shape is wrong or the day
    /// does not exist in the calendar.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let bytes: &[u8] = value.as_bytes();
        let shape_ok: bool = bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !shape_ok {
            return Err(DomainError::InvalidDate(value.to_string()));
        }

        Date::parse(value, format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|_| DomainError::InvalidDate(value.to_string()))
    }

    /// Wraps an already valid date.
    #[must_use]
    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    /// Returns the underlying date.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.0
    }

    /// Returns the day of the week.
    #[must_use]
    pub const fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Shifts the date by a whole number of days.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateArithmeticOverflow` if the result leaves the
    /// supported calendar range.
    pub fn add_days(&self, days: i64) -> Result<Self, DomainError> {
        self.0
            .checked_add(Duration::days(days))
            .map(Self)
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("{self} + {days} days"),
            })
    }

    /// Returns the signed number of days from `self` to `other`.
    #[must_use]
    pub fn days_until(&self, other: Self) -> i64 {
        (other.0 - self.0).whole_days()
    }
}

impl std::fmt::Display for ShiftDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

/// A restaurant wall-clock time, `HH:MM` or `HH:MM:SS`.
///
/// The submitted text is kept verbatim so storage round-trips exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WallTime {
    raw: String,
    seconds_of_day: u32,
}

impl WallTime {
    /// Parses a wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTime` if the text is not `HH:MM` or
    /// `HH:MM:SS` with in-range components.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidTime(value.to_string());

        let parts: Vec<&str> = value.split(':').collect();
        if !(parts.len() == 2 || parts.len() == 3) {
            return Err(invalid());
        }

        let mut components: [u32; 3] = [0; 3];
        for (slot, part) in components.iter_mut().zip(parts.iter()) {
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = part.parse::<u32>().map_err(|_| invalid())?;
        }

        let [hours, minutes, seconds] = components;
        if hours > 23 || minutes > 59 || seconds > 59 {
            return Err(invalid());
        }

        Ok(Self {
            raw: value.to_string(),
            seconds_of_day: hours * 3600 + minutes * 60 + seconds,
        })
    }

    /// Returns the time exactly as it was submitted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the offset from midnight in seconds.
    #[must_use]
    pub const fn seconds_of_day(&self) -> u32 {
        self.seconds_of_day
    }

    /// Returns the offset from midnight in whole minutes.
    #[must_use]
    pub const fn minutes_of_day(&self) -> u32 {
        self.seconds_of_day / 60
    }
}

impl std::fmt::Display for WallTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Formats an instant as RFC 3339 in UTC, truncated to whole seconds.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimestamp` if the instant cannot be
/// represented in RFC 3339.
pub fn format_timestamp(instant: OffsetDateTime) -> Result<String, DomainError> {
    let utc: OffsetDateTime = instant.to_offset(UtcOffset::UTC);
    let truncated: OffsetDateTime = utc - Duration::nanoseconds(i64::from(utc.nanosecond()));
    truncated
        .format(&Rfc3339)
        .map_err(|e| DomainError::InvalidTimestamp(e.to_string()))
}

/// Parses an RFC 3339 timestamp.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimestamp` if the text is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| DomainError::InvalidTimestamp(format!("{value}: {e}")))
}

/// The IANA timezone the restaurant operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestaurantTimezone(Tz);

impl RestaurantTimezone {
    /// Parses an IANA zone name such as `Europe/Madrid`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is unknown.
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        name.parse::<Tz>()
            .map(Self)
            .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
    }

    /// Returns the IANA name of the zone.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Returns the restaurant-local calendar date at `instant`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateArithmeticOverflow` if the instant falls
    /// outside the range both date libraries can represent.
    pub fn local_date(&self, instant: OffsetDateTime) -> Result<ShiftDate, DomainError> {
        let overflow = || DomainError::DateArithmeticOverflow {
            operation: format!("local date of {instant} in {}", self.0.name()),
        };

        let utc: chrono::DateTime<chrono::Utc> =
            chrono::DateTime::from_timestamp(instant.unix_timestamp(), 0).ok_or_else(overflow)?;
        let local: chrono::NaiveDate = utc.with_timezone(&self.0).date_naive();

        let month_number: u8 = u8::try_from(local.month()).map_err(|_| overflow())?;
        let month: Month = Month::try_from(month_number).map_err(|_| overflow())?;
        let day: u8 = u8::try_from(local.day()).map_err(|_| overflow())?;

        Date::from_calendar_date(local.year(), month, day)
            .map(ShiftDate)
            .map_err(|_| overflow())
    }
}

impl Default for RestaurantTimezone {
    fn default() -> Self {
        Self(Tz::UTC)
    }
}
