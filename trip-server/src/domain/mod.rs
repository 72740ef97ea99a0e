//! Domain types for the trip planner.
//!
//! This module contains the core model: times of day, resolved locations,
//! route options and the lines they ride. All types enforce their invariants
//! at construction time, so code that receives them can trust their validity.

mod country;
mod error;
mod line;
mod location;
mod path;
mod result_set;
mod route;
mod time;

pub use country::{CountryCode, InvalidCountryCode};
pub use error::DomainError;
pub use line::{ServiceHours, TransitLine};
pub use location::{BoundingBox, Coordinate, Location, Region};
pub use path::DrivingPath;
pub use result_set::{Rejected, ResultSet};
pub use route::{RouteOption, ScheduledRoute, Segment, Stop, StopSequence};
pub use time::{ClockRange, ClockTime, DayType, MINUTES_PER_DAY, TimeError};
