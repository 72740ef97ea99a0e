//! Time-slot calculation.
//!
//! A time slot is one departure of a line together with the time it reaches
//! each stop. There is no live timetable behind this: arrival times are the
//! departure plus each stop's fixed offset, and a day's worth of departures
//! is simulated by stepping the departure forward by a fixed interval.

use serde::Serialize;

use crate::domain::{ClockTime, MINUTES_PER_DAY, Stop};

/// Errors from slot generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("at least one time slot is required")]
    ZeroCount,

    #[error("interval between departures must be positive")]
    ZeroInterval,

    /// Departures would come round to the same clock time again
    #[error("{count} slots every {interval} min repeat a departure time")]
    RepeatsDeparture { count: usize, interval: u32 },
}

/// When a departure reaches one stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arrival {
    pub stop: String,
    pub time: ClockTime,
    /// Minutes since the slot's departure. Keeps ordering across midnight.
    pub elapsed_minutes: u32,
}

/// One departure and its arrival time at every stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    departure: ClockTime,
    arrivals: Vec<Arrival>,
}

impl TimeSlot {
    pub fn departure(&self) -> ClockTime {
        self.departure
    }

    /// Arrivals in stop order.
    pub fn arrivals(&self) -> &[Arrival] {
        &self.arrivals
    }

    /// Arrival time at the named stop (first match in stop order).
    pub fn arrival_at(&self, stop: &str) -> Option<ClockTime> {
        self.arrivals
            .iter()
            .find(|a| a.stop == stop)
            .map(|a| a.time)
    }

    /// Arrival at the last stop.
    pub fn final_arrival(&self) -> Option<ClockTime> {
        self.arrivals.last().map(|a| a.time)
    }

    /// The departure formatted as "h:mm AM", used as the slot's key.
    pub fn label(&self) -> String {
        self.departure.to_string()
    }
}

/// Compute arrival times at each stop for a single departure.
///
/// # Examples
///
/// ```
/// use trip_server::domain::{ClockTime, Stop};
/// use trip_server::schedule::calculate_time_slot;
///
/// let stops = vec![Stop::new("Downtown Station", 0), Stop::new("Las Olas Blvd", 10)];
/// let slot = calculate_time_slot(ClockTime::parse("1:55 PM").unwrap(), &stops);
///
/// assert_eq!(slot.arrival_at("Downtown Station").unwrap().to_string(), "1:55 PM");
/// assert_eq!(slot.arrival_at("Las Olas Blvd").unwrap().to_string(), "2:05 PM");
/// ```
pub fn calculate_time_slot(departure: ClockTime, stops: &[Stop]) -> TimeSlot {
    let arrivals = stops
        .iter()
        .map(|stop| Arrival {
            stop: stop.name.clone(),
            time: departure.add_minutes(i64::from(stop.minutes_from_start)),
            elapsed_minutes: stop.minutes_from_start,
        })
        .collect();

    TimeSlot {
        departure,
        arrivals,
    }
}

/// A run of evenly spaced departures, keyed by departure label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlots {
    slots: Vec<TimeSlot>,
}

impl TimeSlots {
    /// Look up a slot by its departure label, e.g. "2:15 PM".
    ///
    /// Any spelling `ClockTime::parse` accepts will match.
    pub fn get(&self, label: &str) -> Option<&TimeSlot> {
        let departure = ClockTime::parse(label).ok()?;
        self.slots.iter().find(|s| s.departure == departure)
    }

    /// The earliest generated slot, shown by default.
    pub fn first(&self) -> Option<&TimeSlot> {
        self.slots.first()
    }

    /// Departure labels in generation order.
    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().map(TimeSlot::label).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeSlot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Generate `count` departures `interval_minutes` apart, starting at `start`.
///
/// # Errors
///
/// Returns `Err` if `count` or `interval_minutes` is zero, or if two
/// departures would land on the same clock time (labels would repeat).
///
/// # Examples
///
/// ```
/// use trip_server::domain::{ClockTime, Stop};
/// use trip_server::schedule::generate_time_slots;
///
/// let stops = vec![Stop::new("Downtown Station", 0), Stop::new("Fort Lauderdale Beach", 30)];
/// let start = ClockTime::parse("1:55 PM").unwrap();
/// let slots = generate_time_slots(start, 3, 20, &stops).unwrap();
///
/// assert_eq!(slots.labels(), vec!["1:55 PM", "2:15 PM", "2:35 PM"]);
/// ```
pub fn generate_time_slots(
    start: ClockTime,
    count: usize,
    interval_minutes: u32,
    stops: &[Stop],
) -> Result<TimeSlots, ScheduleError> {
    if count == 0 {
        return Err(ScheduleError::ZeroCount);
    }
    if interval_minutes == 0 {
        return Err(ScheduleError::ZeroInterval);
    }

    if count > distinct_departures(interval_minutes) {
        return Err(ScheduleError::RepeatsDeparture {
            count,
            interval: interval_minutes,
        });
    }

    let slots = (0..count)
        .map(|i| {
            let departure = start.add_minutes(i as i64 * i64::from(interval_minutes));
            calculate_time_slot(departure, stops)
        })
        .collect();

    Ok(TimeSlots { slots })
}

/// How many departures `interval` minutes apart fit before one repeats.
///
/// Departure `i` is `start + i * interval` modulo a day, so the clock comes
/// back round after `MINUTES_PER_DAY / gcd(interval, MINUTES_PER_DAY)` steps.
fn distinct_departures(interval: u32) -> usize {
    let (mut a, mut b) = (interval, MINUTES_PER_DAY);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    (MINUTES_PER_DAY / a) as usize
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    prop_compose! {
        fn any_time()(minutes in 0u32..MINUTES_PER_DAY) -> ClockTime {
            ClockTime::from_minutes(minutes)
        }
    }

    prop_compose! {
        fn stop_list()(offsets in proptest::collection::vec(0u32..120, 0..8)) -> Vec<Stop> {
            let mut offsets = offsets;
            offsets.sort_unstable();
            offsets
                .into_iter()
                .enumerate()
                .map(|(i, m)| Stop::new(format!("Stop {i}"), m))
                .collect()
        }
    }

    proptest! {
        /// Same inputs always give the same slots
        #[test]
        fn deterministic(start in any_time(), count in 1usize..10, interval in 1u32..60, stops in stop_list()) {
            let a = generate_time_slots(start, count, interval, &stops).unwrap();
            let b = generate_time_slots(start, count, interval, &stops).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Exactly `count` distinct departures, each `interval` after the last
        #[test]
        fn distinct_evenly_spaced(start in any_time(), count in 1usize..20, interval in 1u32..72) {
            let slots = generate_time_slots(start, count, interval, &[]).unwrap();
            let labels: HashSet<_> = slots.labels().into_iter().collect();
            prop_assert_eq!(labels.len(), count);

            let departures: Vec<_> = slots.iter().map(TimeSlot::departure).collect();
            for pair in departures.windows(2) {
                prop_assert_eq!(pair[0].minutes_until(pair[1]), interval);
            }
        }

        /// Time never runs backwards along a route
        #[test]
        fn arrivals_non_decreasing(start in any_time(), stops in stop_list()) {
            let slot = calculate_time_slot(start, &stops);
            for pair in slot.arrivals().windows(2) {
                prop_assert!(pair[0].elapsed_minutes <= pair[1].elapsed_minutes);
            }
            for arrival in slot.arrivals() {
                prop_assert_eq!(start.minutes_until(arrival.time), arrival.elapsed_minutes);
            }
        }

        /// A zero first offset always arrives at the departure time
        #[test]
        fn zero_offset_is_departure(start in any_time(), mut stops in stop_list()) {
            stops.insert(0, Stop::new("Origin", 0));
            let slot = calculate_time_slot(start, &stops);
            prop_assert_eq!(slot.arrival_at("Origin"), Some(start));
        }
    }
}
