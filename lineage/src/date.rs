//! Comparable calendar dates.
//!
//! Date strings are parsed upstream (across calendars, ranges and
//! approximations); what reaches the engine is a year/month/day triple where
//! `0` marks an unknown component.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("date has no year component")]
    MissingYear,
    #[error("years {from} and {to} are too far apart to measure")]
    YearOverflow { from: i32, to: i32 },
}

/// A parsed date. Any component may be `0` (unknown).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl Date {
    #[must_use]
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    #[must_use]
    pub fn from_year(year: i32) -> Self {
        Self {
            year,
            month: 0,
            day: 0,
        }
    }

    #[must_use]
    pub fn has_year(&self) -> bool {
        self.year != 0
    }

    /// Compare two dates at their coarsest shared precision.
    ///
    /// Returns `None` when either year is unknown. If either month is unknown
    /// only years are compared; if either day is unknown, year and month.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        if !self.has_year() || !other.has_year() {
            return None;
        }
        let by_year = self.year.cmp(&other.year);
        if by_year != Ordering::Equal || self.month == 0 || other.month == 0 {
            return Some(by_year);
        }
        let by_month = self.month.cmp(&other.month);
        if by_month != Ordering::Equal || self.day == 0 || other.day == 0 {
            return Some(by_month);
        }
        Some(self.day.cmp(&other.day))
    }

    /// `Some(true)` if this date is strictly earlier than `other`.
    #[must_use]
    pub fn is_before(&self, other: &Self) -> Option<bool> {
        self.compare(other).map(Ordering::is_lt)
    }

    /// Whole years from `self` to `later` (plain year subtraction).
    ///
    /// # Errors
    /// Returns [`DateError::MissingYear`] if either date lacks a year, and
    /// [`DateError::YearOverflow`] if the difference does not fit in an `i32`.
    pub fn years_between(&self, later: &Self) -> Result<i32, DateError> {
        if !self.has_year() || !later.has_year() {
            return Err(DateError::MissingYear);
        }
        later
            .year
            .checked_sub(self.year)
            .ok_or(DateError::YearOverflow {
                from: self.year,
                to: later.year,
            })
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.year, self.month, self.day) {
            (0, _, _) => f.write_str("?"),
            (y, 0, _) => write!(f, "{y}"),
            (y, m, 0) => write!(f, "{y}-{m:02}"),
            (y, m, d) => write!(f, "{y}-{m:02}-{d:02}"),
        }
    }
}
