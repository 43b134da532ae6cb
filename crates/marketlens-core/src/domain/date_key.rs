use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::ValidationError;

/// Canonical `YYYY-MM-DD` calendar-date key.
///
/// Lexicographic order of the canonical string equals chronological order,
/// so every comparison in this crate operates on the string form and never
/// touches timestamp arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(String);

impl DateKey {
    /// Normalize a date representation to a canonical key.
    ///
    /// Accepts `YYYY-MM-DD` or an ISO-8601 datetime. A time-of-day component
    /// is truncated at the `T` (or space) separator, never timezone-converted:
    /// conversion can shift the calendar day and break the string-ordering
    /// invariant.
    pub fn normalize(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let date_part = trimmed
            .split_once(['T', ' '])
            .map_or(trimmed, |(date, _)| date);

        Self::parse_date_part(date_part).ok_or_else(|| ValidationError::InvalidDateKey {
            value: input.to_owned(),
        })
    }

    fn parse_date_part(part: &str) -> Option<Self> {
        let bytes = part.as_bytes();
        if bytes.len() != 10 {
            return None;
        }

        let well_formed = bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });
        if !well_formed {
            return None;
        }

        let year: i32 = part[..4].parse().ok()?;
        let month: u8 = part[5..7].parse().ok()?;
        let day: u8 = part[8..10].parse().ok()?;

        // Rejects impossible dates such as 2025-02-30.
        Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()?;

        Some(Self(part.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Date> for DateKey {
    fn from(date: Date) -> Self {
        Self(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        ))
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for DateKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value)
    }
}

impl TryFrom<&str> for DateKey {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::normalize(value)
    }
}

impl From<DateKey> for String {
    fn from(value: DateKey) -> Self {
        value.0
    }
}
