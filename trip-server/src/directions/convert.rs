//! Conversion from Google Maps DTOs to domain types.
//!
//! Status strings are mapped onto [`DirectionsError`], geocoding results are
//! filtered to the served region, and overview polylines are decoded into
//! drawable paths.

use tracing::debug;

use crate::domain::{BoundingBox, Coordinate, DrivingPath, Location, Region};

use super::error::DirectionsError;
use super::types::{DirectionsResponse, GeocodeResponse, RouteBounds};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// The polyline ended in the middle of a value or held a bad byte
    #[error("malformed polyline at byte {0}")]
    MalformedPolyline(usize),

    /// A decoded point is not a valid latitude/longitude
    #[error("invalid coordinate ({0}, {1})")]
    InvalidCoordinate(f64, f64),
}

impl From<ConversionError> for DirectionsError {
    fn from(err: ConversionError) -> Self {
        DirectionsError::Json {
            message: err.to_string(),
            body: None,
        }
    }
}

/// Outcome of a top-level `status` field.
#[derive(Debug, PartialEq, Eq)]
enum Status {
    Ok,
    Empty,
}

fn check_status(status: &str, error_message: Option<&str>) -> Result<Status, DirectionsError> {
    match status {
        "OK" => Ok(Status::Ok),
        "ZERO_RESULTS" | "NOT_FOUND" => Ok(Status::Empty),
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => Err(DirectionsError::RateLimited),
        "REQUEST_DENIED" => Err(DirectionsError::Unauthorized),
        other => Err(DirectionsError::ApiError {
            status: 200,
            message: match error_message {
                Some(msg) => format!("{other}: {msg}"),
                None => other.to_string(),
            },
        }),
    }
}

/// Pick the first geocoding result that lies inside the region.
pub fn convert_geocode(
    response: &GeocodeResponse,
    query: &str,
    region: &Region,
) -> Result<Location, DirectionsError> {
    if check_status(&response.status, response.error_message.as_deref())? == Status::Empty {
        return Err(DirectionsError::PlaceNotResolved(query.to_string()));
    }

    response
        .results
        .iter()
        .find_map(|result| {
            let ll = result.geometry.location;
            let coordinate = Coordinate::new(ll.lat, ll.lng).ok()?;
            if !region.bounds.contains(&coordinate) {
                debug!(
                    address = %result.formatted_address,
                    "ignoring geocode result outside region"
                );
                return None;
            }
            Some(Location::new(coordinate, result.formatted_address.clone()))
        })
        .ok_or_else(|| DirectionsError::PlaceNotResolved(query.to_string()))
}

/// Convert the first route of a directions response into a drawable path.
///
/// Distance and duration are summed over the route's legs.
pub fn convert_directions(response: &DirectionsResponse) -> Result<DrivingPath, DirectionsError> {
    if check_status(&response.status, response.error_message.as_deref())? == Status::Empty {
        return Err(DirectionsError::NoRoute);
    }

    let route = response.routes.first().ok_or(DirectionsError::NoRoute)?;
    let points = decode_polyline(&route.overview_polyline.points)?;

    let distance = route
        .legs
        .iter()
        .filter_map(|leg| leg.distance.as_ref())
        .map(|d| d.value)
        .sum();
    let duration = route
        .legs
        .iter()
        .filter_map(|leg| leg.duration.as_ref())
        .map(|d| d.value)
        .sum();

    DrivingPath::from_coordinates(&points, route_bounds(&route.bounds), distance, duration)
        .ok_or(DirectionsError::NoRoute)
}

fn route_bounds(bounds: &RouteBounds) -> Option<BoundingBox> {
    BoundingBox::new(
        bounds.northeast.lat,
        bounds.southwest.lat,
        bounds.northeast.lng,
        bounds.southwest.lng,
    )
    .ok()
}

/// Decode an encoded polyline into coordinates.
///
/// Each value is a zigzag-encoded delta from the previous point, scaled by
/// 1e5 and written as 5-bit chunks offset by 63.
pub fn decode_polyline(encoded: &str) -> Result<Vec<Coordinate>, ConversionError> {
    let bytes = encoded.as_bytes();
    let mut pos = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while pos < bytes.len() {
        lat += next_value(bytes, &mut pos)?;
        lng += next_value(bytes, &mut pos)?;

        let (la, ln) = (lat as f64 / 1e5, lng as f64 / 1e5);
        let coordinate =
            Coordinate::new(la, ln).map_err(|_| ConversionError::InvalidCoordinate(la, ln))?;
        points.push(coordinate);
    }

    Ok(points)
}

fn next_value(bytes: &[u8], pos: &mut usize) -> Result<i64, ConversionError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes
            .get(*pos)
            .ok_or(ConversionError::MalformedPolyline(*pos))?;
        if !(63..=126).contains(&byte) || shift > 30 {
            return Err(ConversionError::MalformedPolyline(*pos));
        }
        *pos += 1;

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}
