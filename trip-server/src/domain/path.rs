//! Drawable driving paths for the map.

use geo_types::{Coord, LineString};
use serde::Serialize;

use super::{BoundingBox, Coordinate};

/// A path between two locations, ready to draw.
///
/// The geometry serialises as a GeoJSON `LineString` (longitude first).
/// `bounds` is the region the map should fit to show the whole path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrivingPath {
    #[serde(serialize_with = "geojson::ser::serialize_geometry")]
    pub geometry: LineString<f64>,
    pub bounds: BoundingBox,
    pub distance_meters: u64,
    pub duration_seconds: u64,
}

impl DrivingPath {
    /// Build a path from coordinates in travel order.
    ///
    /// Returns `None` for an empty list. When `bounds` is not given, the box
    /// enclosing the points is used.
    pub fn from_coordinates(
        points: &[Coordinate],
        bounds: Option<BoundingBox>,
        distance_meters: u64,
        duration_seconds: u64,
    ) -> Option<Self> {
        let bounds = bounds.or_else(|| BoundingBox::enclosing(points))?;
        let geometry: LineString<f64> = points
            .iter()
            .map(|c| Coord { x: c.lng, y: c.lat })
            .collect();
        if geometry.0.is_empty() {
            return None;
        }
        Some(Self {
            geometry,
            bounds,
            distance_meters,
            duration_seconds,
        })
    }

    /// Points along the path in travel order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.geometry.coords().map(|c| Coordinate { lat: c.y, lng: c.x })
    }

    pub fn point_count(&self) -> usize {
        self.geometry.0.len()
    }
}
