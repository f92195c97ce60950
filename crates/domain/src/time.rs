//! Time and timestamp helpers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// UTC timestamp used for door-open times, energy samples, log entries, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// A wall-clock time of day at minute resolution (`HH:MM`, 24-hour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Build a time of day, returning `None` when out of range.
    #[must_use]
    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// The local wall-clock minute of `ts`, seconds discarded.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn local_minute_of(ts: Timestamp) -> Self {
        let local = ts.with_timezone(&Local);
        // chrono guarantees hour < 24 and minute < 60
        Self {
            hour: local.hour() as u8,
            minute: local.minute() as u8,
        }
    }

    #[must_use]
    pub fn hour(self) -> u8 {
        self.hour
    }

    #[must_use]
    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    /// Accepts `H:MM`, `HH:MM`, `H:M` and `HH:M`; rejects anything else.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTimeFormat {
            value: s.to_string(),
        };
        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        let hour = parse_field(hour).ok_or_else(invalid)?;
        let minute = parse_field(minute).ok_or_else(invalid)?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

fn parse_field(field: &str) -> Option<u8> {
    if field.is_empty() || field.len() > 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_parse_zero_padded_time() {
        let tod: TimeOfDay = "07:05".parse().unwrap();
        assert_eq!(tod.hour(), 7);
        assert_eq!(tod.minute(), 5);
    }

    #[test]
    fn should_parse_single_digit_hour_and_normalize_display() {
        let tod: TimeOfDay = "7:00".parse().unwrap();
        assert_eq!(tod.to_string(), "07:00");
    }

    #[test]
    fn should_accept_day_boundaries() {
        assert!("00:00".parse::<TimeOfDay>().is_ok());
        assert!("23:59".parse::<TimeOfDay>().is_ok());
    }

    #[test]
    fn should_reject_malformed_times() {
        for bad in [
            "", "24:00", "12:60", "1200", "12:", ":30", "ab:cd", "12:30:00", " 12:30", "12:30 ",
            "123:00", "12:345", "-1:30", "+1:30", "7pm",
        ] {
            let result = bad.parse::<TimeOfDay>();
            assert_eq!(
                result,
                Err(ValidationError::InvalidTimeFormat {
                    value: bad.to_string()
                }),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn should_order_times_chronologically() {
        let morning: TimeOfDay = "07:00".parse().unwrap();
        let evening: TimeOfDay = "19:00".parse().unwrap();
        assert!(morning < evening);
    }

    #[test]
    fn should_roundtrip_through_serde_json_as_string() {
        let tod = TimeOfDay::new(19, 30).unwrap();
        let json = serde_json::to_string(&tod).unwrap();
        assert_eq!(json, "\"19:30\"");
        let parsed: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tod);
    }

    #[test]
    fn should_truncate_local_minute_of_timestamp() {
        let ts = now();
        let local = ts.with_timezone(&Local);
        let tod = TimeOfDay::local_minute_of(ts);
        assert_eq!(u32::from(tod.hour()), local.hour());
        assert_eq!(u32::from(tod.minute()), local.minute());
    }
}
