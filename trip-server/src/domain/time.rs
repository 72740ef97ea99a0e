//! Time-of-day handling for timetables.
//!
//! Route options and schedules carry times as "h:mm AM" strings with no date
//! attached. This module provides a minute-granularity time of day that parses
//! and prints that form, and wraps around midnight when minutes are added.

use chrono::{Duration, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day with minute granularity.
///
/// Arithmetic wraps at midnight: 11:50 PM plus 20 minutes is 12:10 AM.
/// There is no date, so ordering is plain clock order within one day.
///
/// # Examples
///
/// ```
/// use trip_server::domain::ClockTime;
///
/// let t = ClockTime::parse("1:55 PM").unwrap();
/// assert_eq!(t.to_string(), "1:55 PM");
/// assert_eq!(t.add_minutes(20).to_string(), "2:15 PM");
///
/// // 24-hour input is accepted too
/// assert_eq!(ClockTime::parse("13:55").unwrap(), t);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Create a time from 24-hour components.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| TimeError::new("invalid time"))
    }

    /// Create a time from minutes since midnight, wrapping past one day.
    pub fn from_minutes(minutes: u32) -> Self {
        Self::midnight().add_minutes(i64::from(minutes % MINUTES_PER_DAY))
    }

    /// 12:00 AM.
    pub fn midnight() -> Self {
        Self(NaiveTime::MIN)
    }

    /// Parse a time in "h:mm AM" form, or "HH:MM" 24-hour form.
    ///
    /// The meridiem is case-insensitive and the space before it is optional,
    /// so "9:30AM", "9:30 am" and "09:30" are all the same time.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_server::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse("12:00 AM").is_ok());
    /// assert!(ClockTime::parse("6:33PM").is_ok());
    /// assert!(ClockTime::parse("23:59").is_ok());
    ///
    /// assert!(ClockTime::parse("13:00 PM").is_err());
    /// assert!(ClockTime::parse("1:5 PM").is_err());
    /// assert!(ClockTime::parse("noon").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let upper = s.trim().to_ascii_uppercase();

        let (clock, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
            (rest.trim_end(), Some(Meridiem::Am))
        } else if let Some(rest) = upper.strip_suffix("PM") {
            (rest.trim_end(), Some(Meridiem::Pm))
        } else {
            (upper.as_str(), None)
        };

        let (hour_str, minute_str) = clock
            .split_once(':')
            .ok_or_else(|| TimeError::new("expected h:mm format"))?;

        if hour_str.is_empty() || hour_str.len() > 2 || minute_str.len() != 2 {
            return Err(TimeError::new("expected h:mm format"));
        }

        let hour = parse_digits(hour_str).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute =
            parse_digits(minute_str).ok_or_else(|| TimeError::new("invalid minute digits"))?;

        let hour = match meridiem {
            Some(meridiem) => {
                if !(1..=12).contains(&hour) {
                    return Err(TimeError::new("hour must be 1-12 with AM/PM"));
                }
                match meridiem {
                    Meridiem::Am => hour % 12,
                    Meridiem::Pm => hour % 12 + 12,
                }
            }
            None => hour,
        };

        Self::from_hm(hour, minute)
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes since midnight (0-1439).
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    /// Add (or with a negative value, subtract) minutes, wrapping at midnight.
    pub fn add_minutes(self, minutes: i64) -> Self {
        let (time, _) = self.0.overflowing_add_signed(Duration::minutes(minutes));
        Self(time)
    }

    /// Minutes from `self` forward to `later`, going past midnight if needed.
    ///
    /// Always in `0..MINUTES_PER_DAY`.
    pub fn minutes_until(&self, later: ClockTime) -> u32 {
        let from = self.minutes_since_midnight() as i64;
        let to = later.minutes_since_midnight() as i64;
        (to - from).rem_euclid(MINUTES_PER_DAY as i64) as u32
    }

    /// Format as 24-hour "HH:MM".
    pub fn to_24h_string(&self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }
}

#[derive(Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

/// Parse one or two ASCII digits.
fn parse_digits(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hour, suffix) = match self.hour() {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        write!(f, "{}:{:02} {}", hour, self.minute(), suffix)
    }
}

impl FromStr for ClockTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A span of the day, such as a line's hours of operation.
///
/// A range whose end is before its start runs overnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl ClockRange {
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Parse "9:30AM to 6:33PM".
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let (start, end) = s
            .split_once(" to ")
            .ok_or_else(|| TimeError::new("expected '<start> to <end>'"))?;
        Ok(Self {
            start: ClockTime::parse(start)?,
            end: ClockTime::parse(end)?,
        })
    }

    /// Whether `time` falls inside the range (both ends inclusive).
    pub fn contains(&self, time: ClockTime) -> bool {
        if self.start <= self.end {
            self.start <= time && time <= self.end
        } else {
            time >= self.start || time <= self.end
        }
    }
}

impl fmt::Display for ClockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// The service-day category a weekday falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayType {
    Weekday,
    Saturday,
    Sunday,
}

impl From<Weekday> for DayType {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Sat => DayType::Saturday,
            Weekday::Sun => DayType::Sunday,
            _ => DayType::Weekday,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse(s).unwrap()
    }

    #[test]
    fn parse_twelve_hour() {
        assert_eq!(t("1:55 PM").minutes_since_midnight(), 13 * 60 + 55);
        assert_eq!(t("12:00 AM").minutes_since_midnight(), 0);
        assert_eq!(t("12:30 PM").minutes_since_midnight(), 12 * 60 + 30);
        assert_eq!(t("11:59 PM").minutes_since_midnight(), 23 * 60 + 59);
        assert_eq!(t("9:30AM"), t("9:30 am"));
    }

    #[test]
    fn parse_twenty_four_hour() {
        assert_eq!(t("00:00"), ClockTime::midnight());
        assert_eq!(t("13:55"), t("1:55 PM"));
        assert_eq!(t("7:05"), t("7:05 AM"));
    }

    #[test]
    fn parse_invalid_format() {
        assert!(ClockTime::parse("").is_err());
        assert!(ClockTime::parse("1355").is_err());
        assert!(ClockTime::parse("1:5 PM").is_err());
        assert!(ClockTime::parse("123:00").is_err());
        assert!(ClockTime::parse("ab:cd").is_err());
        assert!(ClockTime::parse("1:55 XM").is_err());
    }

    #[test]
    fn parse_invalid_values() {
        assert!(ClockTime::parse("24:00").is_err());
        assert!(ClockTime::parse("12:60").is_err());
        assert!(ClockTime::parse("0:30 AM").is_err());
        assert!(ClockTime::parse("13:00 PM").is_err());
    }

    #[test]
    fn display_format() {
        assert_eq!(t("00:05").to_string(), "12:05 AM");
        assert_eq!(t("09:00").to_string(), "9:00 AM");
        assert_eq!(t("12:00").to_string(), "12:00 PM");
        assert_eq!(t("18:33").to_string(), "6:33 PM");
        assert_eq!(t("18:33").to_24h_string(), "18:33");
        assert_eq!(format!("{:?}", t("6:33 PM")), "ClockTime(18:33)");
    }

    #[test]
    fn add_minutes_wraps_midnight() {
        assert_eq!(t("11:50 PM").add_minutes(20), t("12:10 AM"));
        assert_eq!(t("12:10 AM").add_minutes(-20), t("11:50 PM"));
        assert_eq!(t("1:00 PM").add_minutes(24 * 60), t("1:00 PM"));
    }

    #[test]
    fn minutes_until_wraps() {
        assert_eq!(t("1:55 PM").minutes_until(t("2:40 PM")), 45);
        assert_eq!(t("11:30 PM").minutes_until(t("12:15 AM")), 45);
        assert_eq!(t("2:00 PM").minutes_until(t("2:00 PM")), 0);
    }

    #[test]
    fn from_minutes_wraps() {
        assert_eq!(ClockTime::from_minutes(0), ClockTime::midnight());
        assert_eq!(ClockTime::from_minutes(MINUTES_PER_DAY + 5), t("12:05 AM"));
    }

    #[test]
    fn serde_uses_display_form() {
        let json = serde_json::to_string(&t("14:15")).unwrap();
        assert_eq!(json, "\"2:15 PM\"");
        let back: ClockTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t("14:15"));
        assert!(serde_json::from_str::<ClockTime>("\"later\"").is_err());
    }

    #[test]
    fn range_parse_and_contains() {
        let range = ClockRange::parse("9:30AM to 6:33PM").unwrap();
        assert_eq!(range.start, t("9:30 AM"));
        assert_eq!(range.end, t("6:33 PM"));
        assert!(range.contains(t("9:30 AM")));
        assert!(range.contains(t("12:00 PM")));
        assert!(range.contains(t("6:33 PM")));
        assert!(!range.contains(t("6:34 PM")));
        assert!(!range.contains(t("9:29 AM")));
        assert_eq!(range.to_string(), "9:30 AM to 6:33 PM");
    }

    #[test]
    fn overnight_range() {
        let range = ClockRange::parse("10:00 PM to 2:00 AM").unwrap();
        assert!(range.contains(t("11:00 PM")));
        assert!(range.contains(t("1:00 AM")));
        assert!(!range.contains(t("3:00 AM")));
    }

    #[test]
    fn range_rejects_missing_separator() {
        assert!(ClockRange::parse("9:30AM-6:33PM").is_err());
    }

    #[test]
    fn day_type_from_weekday() {
        assert_eq!(DayType::from(Weekday::Mon), DayType::Weekday);
        assert_eq!(DayType::from(Weekday::Fri), DayType::Weekday);
        assert_eq!(DayType::from(Weekday::Sat), DayType::Saturday);
        assert_eq!(DayType::from(Weekday::Sun), DayType::Sunday);
    }
}
