//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from adapter and IO errors. A route option that fails validation
//! is rejected from its result set rather than aborting the whole batch.

use super::{ClockTime, TimeError};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A stop is listed as reached earlier than the stop before it
    #[error("stop '{stop}' at {offset} min comes after a stop at {previous} min")]
    StopOffsetsDecrease {
        stop: String,
        offset: u32,
        previous: u32,
    },

    /// Route option with no segments
    #[error("route option must have at least one segment")]
    NoSegments,

    /// Zero-length trip
    #[error("total duration must be positive")]
    NonPositiveDuration,

    /// Transfers must be one fewer than segments
    #[error("transfer count {actual} does not match {segments} segment(s)")]
    TransferCountMismatch { actual: u32, segments: usize },

    /// Departure and arrival disagree with the stated duration
    #[error("{departure} to {arrival} is {span} min, but duration is {expected} min")]
    DurationMismatch {
        departure: ClockTime,
        arrival: ClockTime,
        span: u32,
        expected: u32,
    },

    /// A scheduled route ends before its last stop is reached
    #[error("duration {duration} min is shorter than last stop offset {last_offset} min")]
    DurationShorterThanStops { duration: u32, last_offset: u32 },

    /// Two options in one result set share an id
    #[error("duplicate route option id: {0}")]
    DuplicateId(String),

    /// Latitude or longitude outside the valid range
    #[error("coordinate out of range: ({0}, {1})")]
    InvalidCoordinate(f64, f64),

    /// Bounding box edges in the wrong order
    #[error("invalid bounding box: {0}")]
    InvalidBounds(&'static str),

    /// Not an IANA timezone name
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    /// A time field could not be parsed
    #[error(transparent)]
    Time(#[from] TimeError),
}
