//! Route option types.
//!
//! A `RouteOption` is one candidate trip: one or more `Segment`s, each on a
//! single named line, with the stops that line calls at. Constructors check
//! every invariant, so a `RouteOption` that exists is safe to display.

use serde::Serialize;

use super::{ClockTime, DomainError, MINUTES_PER_DAY};

/// A stop along a segment, with its offset from the segment's departure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stop {
    pub name: String,
    pub minutes_from_start: u32,
}

impl Stop {
    pub fn new(name: impl Into<String>, minutes_from_start: u32) -> Self {
        Self {
            name: name.into(),
            minutes_from_start,
        }
    }
}

/// Stops in travel order.
///
/// # Invariants
///
/// - Offsets never decrease from one stop to the next
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StopSequence(Vec<Stop>);

impl StopSequence {
    /// Validate and wrap an ordered list of stops.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_server::domain::{Stop, StopSequence};
    ///
    /// let ok = StopSequence::new(vec![Stop::new("A", 0), Stop::new("B", 10)]);
    /// assert!(ok.is_ok());
    ///
    /// let backwards = StopSequence::new(vec![Stop::new("A", 10), Stop::new("B", 5)]);
    /// assert!(backwards.is_err());
    /// ```
    pub fn new(stops: Vec<Stop>) -> Result<Self, DomainError> {
        for pair in stops.windows(2) {
            if pair[1].minutes_from_start < pair[0].minutes_from_start {
                return Err(DomainError::StopOffsetsDecrease {
                    stop: pair[1].name.clone(),
                    offset: pair[1].minutes_from_start,
                    previous: pair[0].minutes_from_start,
                });
            }
        }
        Ok(Self(stops))
    }

    pub fn as_slice(&self) -> &[Stop] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stop> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Stop> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Stop> {
        self.0.last()
    }

    /// Offset of the final stop, or 0 with no stops.
    pub fn last_offset(&self) -> u32 {
        self.last().map_or(0, |s| s.minutes_from_start)
    }
}

/// One leg of a trip on a single named line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    sub_route_name: String,
    departure: ClockTime,
    stops: StopSequence,
    schedule_description: String,
}

impl Segment {
    pub fn new(
        sub_route_name: impl Into<String>,
        departure: ClockTime,
        stops: StopSequence,
        schedule_description: impl Into<String>,
    ) -> Self {
        Self {
            sub_route_name: sub_route_name.into(),
            departure,
            stops,
            schedule_description: schedule_description.into(),
        }
    }

    /// The line this segment rides, e.g. "Beach Link".
    pub fn sub_route_name(&self) -> &str {
        &self.sub_route_name
    }

    pub fn departure(&self) -> ClockTime {
        self.departure
    }

    /// Departure plus the last stop's offset.
    pub fn arrival(&self) -> ClockTime {
        self.departure
            .add_minutes(i64::from(self.stops.last_offset()))
    }

    pub fn stops(&self) -> &StopSequence {
        &self.stops
    }

    /// Human-readable service hours for the line.
    pub fn schedule_description(&self) -> &str {
        &self.schedule_description
    }
}

/// One complete candidate trip.
///
/// # Invariants
///
/// - At least one segment
/// - `total_duration_minutes > 0`
/// - `transfer_count == segments.len() - 1`
/// - `arrival - departure == total_duration_minutes` (modulo one day)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteOption {
    id: String,
    segments: Vec<Segment>,
    total_duration_minutes: u32,
    departure: ClockTime,
    arrival: ClockTime,
    transfer_count: u32,
}

impl RouteOption {
    /// Construct a route option, checking its invariants.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_server::domain::{ClockTime, RouteOption, Segment, Stop, StopSequence};
    ///
    /// let dep = ClockTime::parse("2:00 PM").unwrap();
    /// let stops = StopSequence::new(vec![Stop::new("Central Terminal", 0), Stop::new("Beach", 30)]).unwrap();
    /// let segment = Segment::new("Beach Link", dep, stops, "9:30AM to 6:33PM");
    ///
    /// let option = RouteOption::new("1", vec![segment.clone()], 30, dep, dep.add_minutes(30), 0);
    /// assert!(option.is_ok());
    ///
    /// // One segment means zero transfers
    /// let wrong = RouteOption::new("1", vec![segment], 30, dep, dep.add_minutes(30), 1);
    /// assert!(wrong.is_err());
    /// ```
    pub fn new(
        id: impl Into<String>,
        segments: Vec<Segment>,
        total_duration_minutes: u32,
        departure: ClockTime,
        arrival: ClockTime,
        transfer_count: u32,
    ) -> Result<Self, DomainError> {
        if segments.is_empty() {
            return Err(DomainError::NoSegments);
        }

        if total_duration_minutes == 0 {
            return Err(DomainError::NonPositiveDuration);
        }

        if transfer_count as usize != segments.len() - 1 {
            return Err(DomainError::TransferCountMismatch {
                actual: transfer_count,
                segments: segments.len(),
            });
        }

        let span = departure.minutes_until(arrival);
        if span != total_duration_minutes % MINUTES_PER_DAY {
            return Err(DomainError::DurationMismatch {
                departure,
                arrival,
                span,
                expected: total_duration_minutes,
            });
        }

        Ok(Self {
            id: id.into(),
            segments,
            total_duration_minutes,
            departure,
            arrival,
            transfer_count,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn total_duration_minutes(&self) -> u32 {
        self.total_duration_minutes
    }

    pub fn departure(&self) -> ClockTime {
        self.departure
    }

    pub fn arrival(&self) -> ClockTime {
        self.arrival
    }

    pub fn transfer_count(&self) -> u32 {
        self.transfer_count
    }

    /// Line names in riding order.
    pub fn sub_route_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(Segment::sub_route_name)
    }
}

/// A line's stop pattern, used to generate a timetable of departures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledRoute {
    id: String,
    stops: StopSequence,
    duration_minutes: u32,
}

impl ScheduledRoute {
    /// Construct a scheduled route.
    ///
    /// The duration must be positive and cover the last stop.
    pub fn new(
        id: impl Into<String>,
        stops: StopSequence,
        duration_minutes: u32,
    ) -> Result<Self, DomainError> {
        if duration_minutes == 0 {
            return Err(DomainError::NonPositiveDuration);
        }
        if duration_minutes < stops.last_offset() {
            return Err(DomainError::DurationShorterThanStops {
                duration: duration_minutes,
                last_offset: stops.last_offset(),
            });
        }
        Ok(Self {
            id: id.into(),
            stops,
            duration_minutes,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stops(&self) -> &StopSequence {
        &self.stops
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }
}
