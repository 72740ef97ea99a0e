//! Default parameters for the departure-time picker.

use crate::domain::{ClockTime, ScheduledRoute};

use super::{ScheduleError, TimeSlots, generate_time_slots};

/// Configuration for generated timetables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// First departure shown.
    pub initial_time: ClockTime,

    /// Number of departures offered.
    pub slot_count: usize,

    /// Minutes between departures.
    pub interval_mins: u32,
}

impl ScheduleConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(initial_time: ClockTime, slot_count: usize, interval_mins: u32) -> Self {
        Self {
            initial_time,
            slot_count,
            interval_mins,
        }
    }

    /// Set the first departure.
    pub fn with_initial_time(mut self, time: ClockTime) -> Self {
        self.initial_time = time;
        self
    }

    /// Set the number of departures.
    pub fn with_slot_count(mut self, n: usize) -> Self {
        self.slot_count = n;
        self
    }

    /// Set the spacing between departures.
    pub fn with_interval(mut self, mins: u32) -> Self {
        self.interval_mins = mins;
        self
    }

    /// Generate the configured departures for a route.
    pub fn slots_for(&self, route: &ScheduledRoute) -> Result<TimeSlots, ScheduleError> {
        generate_time_slots(
            self.initial_time,
            self.slot_count,
            self.interval_mins,
            route.stops().as_slice(),
        )
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            // 1:55 PM
            initial_time: ClockTime::from_minutes(13 * 60 + 55),
            slot_count: 3,
            interval_mins: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Stop, StopSequence};

    #[test]
    fn default_config() {
        let config = ScheduleConfig::default();

        assert_eq!(config.initial_time.to_string(), "1:55 PM");
        assert_eq!(config.slot_count, 3);
        assert_eq!(config.interval_mins, 20);
    }

    #[test]
    fn custom_config() {
        let config = ScheduleConfig::default()
            .with_initial_time(ClockTime::parse("7:00 AM").unwrap())
            .with_slot_count(5)
            .with_interval(15);

        assert_eq!(
            config,
            ScheduleConfig::new(ClockTime::parse("7:00 AM").unwrap(), 5, 15)
        );
    }

    #[test]
    fn slots_for_route() {
        let stops = StopSequence::new(vec![
            Stop::new("Downtown Station", 0),
            Stop::new("Fort Lauderdale Beach", 30),
        ])
        .unwrap();
        let route = ScheduledRoute::new("downtown-beach", stops, 30).unwrap();

        let slots = ScheduleConfig::default().slots_for(&route).unwrap();
        assert_eq!(slots.labels(), vec!["1:55 PM", "2:15 PM", "2:35 PM"]);
        assert_eq!(
            slots.get("2:35 PM").unwrap().final_arrival().unwrap().to_string(),
            "3:05 PM"
        );
    }
}
