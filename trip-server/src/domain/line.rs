//! Transit lines and their hours of operation.

use chrono::Weekday;
use serde::Serialize;

use super::{ClockRange, ClockTime, DayType};

/// Hours of operation per day type.
///
/// Every line runs on weekdays; weekend service is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHours {
    pub weekday: ClockRange,
    pub saturday: Option<ClockRange>,
    pub sunday: Option<ClockRange>,
}

impl ServiceHours {
    /// The hours for a given day, or `None` if there is no service.
    pub fn for_day(&self, day: DayType) -> Option<ClockRange> {
        match day {
            DayType::Weekday => Some(self.weekday),
            DayType::Saturday => self.saturday,
            DayType::Sunday => self.sunday,
        }
    }
}

/// A named line in the network, e.g. "Beach Link".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitLine {
    pub id: String,
    pub name: String,
    pub hours: ServiceHours,
    pub description: String,
}

impl TransitLine {
    /// Whether the line is running at `time` on `day`.
    pub fn operates_at(&self, day: Weekday, time: ClockTime) -> bool {
        self.hours
            .for_day(day.into())
            .is_some_and(|range| range.contains(time))
    }
}
