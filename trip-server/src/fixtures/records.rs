//! On-disk fixture records.
//!
//! Records mirror the JSON files in the data directory. Times are kept as
//! text so that one bad entry is reported against its id instead of failing
//! the whole file.

use serde::Deserialize;

use crate::domain::{
    BoundingBox, ClockRange, ClockTime, Coordinate, CountryCode, DomainError, Region,
    RouteOption, ScheduledRoute, Segment, ServiceHours, Stop, StopSequence, TransitLine,
};

#[derive(Debug, Clone, Deserialize)]
pub struct RegionRecord {
    pub name: String,
    pub bounds: BoundingBox,
    pub country: CountryCode,
    pub center: Coordinate,
    /// IANA name, e.g. "America/New_York"
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl TryFrom<RegionRecord> for Region {
    type Error = DomainError;

    fn try_from(r: RegionRecord) -> Result<Self, Self::Error> {
        let b = r.bounds;
        let bounds = BoundingBox::new(b.north, b.south, b.east, b.west)?;
        let center = Coordinate::new(r.center.lat, r.center.lng)?;
        if !bounds.contains(&center) {
            return Err(DomainError::InvalidBounds("centre lies outside bounds"));
        }
        let timezone = r
            .timezone
            .parse()
            .map_err(|_| DomainError::UnknownTimezone(r.timezone.clone()))?;
        Ok(Region {
            name: r.name,
            bounds,
            country: r.country,
            center,
            timezone,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopRecord {
    pub name: String,
    pub minutes_from_start: u32,
}

fn stop_sequence(stops: Vec<StopRecord>) -> Result<StopSequence, DomainError> {
    StopSequence::new(
        stops
            .into_iter()
            .map(|s| Stop::new(s.name, s.minutes_from_start))
            .collect(),
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentRecord {
    pub sub_route_name: String,
    pub departure: String,
    pub stops: Vec<StopRecord>,
    #[serde(default)]
    pub schedule_description: String,
}

impl TryFrom<SegmentRecord> for Segment {
    type Error = DomainError;

    fn try_from(r: SegmentRecord) -> Result<Self, Self::Error> {
        Ok(Segment::new(
            r.sub_route_name,
            ClockTime::parse(&r.departure)?,
            stop_sequence(r.stops)?,
            r.schedule_description,
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteOptionRecord {
    pub id: String,
    pub segments: Vec<SegmentRecord>,
    pub total_duration_minutes: u32,
    pub departure: String,
    pub arrival: String,
    pub transfer_count: u32,
}

impl TryFrom<RouteOptionRecord> for RouteOption {
    type Error = DomainError;

    fn try_from(r: RouteOptionRecord) -> Result<Self, Self::Error> {
        let segments = r
            .segments
            .into_iter()
            .map(Segment::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        RouteOption::new(
            r.id,
            segments,
            r.total_duration_minutes,
            ClockTime::parse(&r.departure)?,
            ClockTime::parse(&r.arrival)?,
            r.transfer_count,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduledRouteRecord {
    pub id: String,
    pub stops: Vec<StopRecord>,
    pub duration_minutes: u32,
}

impl TryFrom<ScheduledRouteRecord> for ScheduledRoute {
    type Error = DomainError;

    fn try_from(r: ScheduledRouteRecord) -> Result<Self, Self::Error> {
        ScheduledRoute::new(r.id, stop_sequence(r.stops)?, r.duration_minutes)
    }
}

/// A line with hours written as `"9:30AM to 6:33PM"`.
#[derive(Debug, Clone, Deserialize)]
pub struct LineRecord {
    pub id: String,
    pub name: String,
    pub weekday: String,
    pub saturday: Option<String>,
    pub sunday: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl TryFrom<LineRecord> for TransitLine {
    type Error = DomainError;

    fn try_from(r: LineRecord) -> Result<Self, Self::Error> {
        let optional = |s: Option<String>| s.as_deref().map(ClockRange::parse).transpose();
        Ok(TransitLine {
            hours: ServiceHours {
                weekday: ClockRange::parse(&r.weekday)?,
                saturday: optional(r.saturday)?,
                sunday: optional(r.sunday)?,
            },
            id: r.id,
            name: r.name,
            description: r.description,
        })
    }
}
