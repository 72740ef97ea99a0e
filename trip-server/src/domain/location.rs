//! Geographic types: resolved locations, bounding boxes, and the service region.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::{ClockTime, CountryCode, DomainError};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting values outside the valid ranges.
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::InvalidCoordinate(lat, lng));
        }
        Ok(Self { lat, lng })
    }

    /// Great-circle distance to another coordinate, in metres.
    pub fn distance_meters(&self, other: &Coordinate) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;

        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }
}

/// A place resolved from free text.
///
/// Immutable once created. A new `Location` replaces the old one when the
/// user picks a different place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

impl Location {
    pub fn new(coordinate: Coordinate, address: impl Into<String>) -> Self {
        Self {
            latitude: coordinate.lat,
            longitude: coordinate.lng,
            address: address.into(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.latitude,
            lng: self.longitude,
        }
    }
}

/// An axis-aligned latitude/longitude box.
///
/// Boxes crossing the antimeridian are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Create a box, checking the edges are in order.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, DomainError> {
        Coordinate::new(north, east)?;
        Coordinate::new(south, west)?;
        if north < south {
            return Err(DomainError::InvalidBounds("north edge is below south edge"));
        }
        if east < west {
            return Err(DomainError::InvalidBounds("east edge is west of west edge"));
        }
        Ok(Self {
            north,
            south,
            east,
            west,
        })
    }

    /// The smallest box containing every coordinate, or `None` if empty.
    pub fn enclosing<'a, I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut iter = coordinates.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            north: first.lat,
            south: first.lat,
            east: first.lng,
            west: first.lng,
        };
        for c in iter {
            bounds.north = bounds.north.max(c.lat);
            bounds.south = bounds.south.min(c.lat);
            bounds.east = bounds.east.max(c.lng);
            bounds.west = bounds.west.min(c.lng);
        }
        Some(bounds)
    }

    /// Whether the coordinate lies inside the box (edges inclusive).
    pub fn contains(&self, c: &Coordinate) -> bool {
        (self.south..=self.north).contains(&c.lat) && (self.west..=self.east).contains(&c.lng)
    }

    pub fn southwest(&self) -> Coordinate {
        Coordinate {
            lat: self.south,
            lng: self.west,
        }
    }

    pub fn northeast(&self) -> Coordinate {
        Coordinate {
            lat: self.north,
            lng: self.east,
        }
    }
}

/// The area the planner serves.
///
/// Place lookups are restricted to the bounding box and the country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub name: String,
    pub bounds: BoundingBox,
    pub country: CountryCode,
    pub center: Coordinate,
    /// Timetables are in local time here
    pub timezone: Tz,
}

impl Region {
    /// Weekday and time of day at `instant`, on the region's clocks.
    pub fn local_clock(&self, instant: DateTime<Utc>) -> (Weekday, ClockTime) {
        let local = instant.with_timezone(&self.timezone);
        let time = ClockTime::from_minutes(local.hour() * 60 + local.minute());
        (local.weekday(), time)
    }
}
