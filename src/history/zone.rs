//! The timezone used to cut timestamps into calendar days.

use crate::error::AppError;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Timelike, Utc};
use std::fmt;
use std::str::FromStr;

/// Which clock decides where one day ends and the next begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayZone {
    /// Calendar days in UTC (matches truncating an ISO-8601 UTC string at the `T`).
    #[default]
    Utc,
    /// The machine's local timezone.
    Local,
    /// A fixed offset from UTC, e.g. `+05:30`.
    Fixed(FixedOffset),
}

impl DayZone {
    /// Calendar date of `timestamp` in this zone.
    pub fn date_of(&self, timestamp: &DateTime<Utc>) -> NaiveDate {
        match self {
            DayZone::Utc => timestamp.date_naive(),
            DayZone::Local => timestamp.with_timezone(&Local).date_naive(),
            DayZone::Fixed(offset) => timestamp.with_timezone(offset).date_naive(),
        }
    }

    /// Hour of day (0-23) of `timestamp` in this zone.
    pub fn hour_of(&self, timestamp: &DateTime<Utc>) -> u32 {
        match self {
            DayZone::Utc => timestamp.hour(),
            DayZone::Local => timestamp.with_timezone(&Local).hour(),
            DayZone::Fixed(offset) => timestamp.with_timezone(offset).hour(),
        }
    }
}

impl FromStr for DayZone {
    type Err = AppError;

    /// Accepts `utc`, `local`, or an offset such as `+05:30`, `-0300` or `+2`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        match value.to_ascii_lowercase().as_str() {
            "utc" | "z" | "gmt" => return Ok(DayZone::Utc),
            "local" => return Ok(DayZone::Local),
            _ => {},
        }

        let invalid = || {
            AppError::Config(format!(
                "Invalid day zone '{}'. Use 'utc', 'local' or an offset like '+05:30'",
                raw
            ))
        };

        let (sign, rest) = match value.chars().next() {
            Some('+') => (1, &value[1..]),
            Some('-') => (-1, &value[1..]),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = match rest.split_once(':') {
            Some((h, m)) => (h, m),
            None if rest.len() == 4 && rest.is_ascii() => rest.split_at(2),
            None => (rest, "0"),
        };
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(DayZone::Fixed)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for DayZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayZone::Utc => write!(f, "UTC"),
            DayZone::Local => write!(f, "local time"),
            DayZone::Fixed(offset) => write!(f, "UTC{}", offset),
        }
    }
}
