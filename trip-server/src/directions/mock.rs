//! Mock directions client for running without API access.
//!
//! Resolves queries against a fixed list of places and draws straight lines
//! between them.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{Coordinate, DrivingPath, Location, Region};

use super::error::DirectionsError;

/// Assumed average driving speed for mock durations, in metres per second.
const MOCK_SPEED_MPS: f64 = 11.0;

/// A place the mock can resolve.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MockPlace {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    /// Other names that resolve to this place.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl MockPlace {
    fn names(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(&self.address)
            .chain(&self.aliases)
            .map(|n| n.to_lowercase())
    }
}

/// Mock client that serves places from fixtures.
#[derive(Debug, Clone)]
pub struct MockDirectionsClient {
    places: Arc<[MockPlace]>,
}

impl MockDirectionsClient {
    pub fn new(places: Vec<MockPlace>) -> Self {
        Self {
            places: places.into(),
        }
    }

    pub fn places(&self) -> &[MockPlace] {
        &self.places
    }

    /// Resolve a query, case-insensitively.
    ///
    /// An exact name match wins; otherwise the first place whose name
    /// contains the query. Places outside the region never match.
    pub async fn resolve_place(
        &self,
        query: &str,
        region: &Region,
    ) -> Result<Location, DirectionsError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(DirectionsError::PlaceNotResolved(String::new()));
        }

        let in_region: Vec<(&MockPlace, Coordinate)> = self
            .places
            .iter()
            .filter_map(|p| {
                let c = Coordinate::new(p.lat, p.lng).ok()?;
                region.bounds.contains(&c).then_some((p, c))
            })
            .collect();

        let exact = in_region
            .iter()
            .find(|(p, _)| p.names().any(|n| n == needle));
        let partial = || {
            in_region
                .iter()
                .find(|(p, _)| p.names().any(|n| n.contains(&needle)))
        };

        exact
            .or_else(partial)
            .map(|(p, c)| Location::new(*c, p.address.clone()))
            .ok_or_else(|| DirectionsError::PlaceNotResolved(query.trim().to_string()))
    }

    /// A straight line from origin to destination.
    pub async fn compute_driving_path(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<DrivingPath, DirectionsError> {
        let from = origin.coordinate();
        let to = destination.coordinate();
        let distance = from.distance_meters(&to);

        DrivingPath::from_coordinates(
            &[from, to],
            None,
            distance.round() as u64,
            (distance / MOCK_SPEED_MPS).round() as u64,
        )
        .ok_or(DirectionsError::NoRoute)
    }
}
