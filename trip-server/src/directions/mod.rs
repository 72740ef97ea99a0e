//! Geocoding and driving directions.
//!
//! Free-text places are resolved to [`Location`]s inside the served region,
//! and a drawable [`DrivingPath`] is fetched between two locations. The live
//! client talks to the Google Maps web services; the mock serves fixture
//! places and straight lines so the planner runs without an API key.

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{DEFAULT_BASE_URL, DirectionsClient, DirectionsConfig};
pub use convert::{ConversionError, decode_polyline};
pub use error::DirectionsError;
pub use mock::{MockDirectionsClient, MockPlace};
pub use types::{DirectionsResponse, GeocodeResponse};

use crate::domain::{DrivingPath, Location, Region};

/// The directions implementation chosen at startup.
#[derive(Debug, Clone)]
pub enum DirectionsBackend {
    Live(DirectionsClient),
    Mock(MockDirectionsClient),
}

impl DirectionsBackend {
    pub fn is_mock(&self) -> bool {
        matches!(self, DirectionsBackend::Mock(_))
    }

    pub async fn resolve_place(
        &self,
        query: &str,
        region: &Region,
    ) -> Result<Location, DirectionsError> {
        match self {
            DirectionsBackend::Live(client) => client.resolve_place(query, region).await,
            DirectionsBackend::Mock(client) => client.resolve_place(query, region).await,
        }
    }

    pub async fn compute_driving_path(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<DrivingPath, DirectionsError> {
        match self {
            DirectionsBackend::Live(client) => {
                client.compute_driving_path(origin, destination).await
            }
            DirectionsBackend::Mock(client) => {
                client.compute_driving_path(origin, destination).await
            }
        }
    }
}

impl From<DirectionsClient> for DirectionsBackend {
    fn from(client: DirectionsClient) -> Self {
        DirectionsBackend::Live(client)
    }
}

impl From<MockDirectionsClient> for DirectionsBackend {
    fn from(client: MockDirectionsClient) -> Self {
        DirectionsBackend::Mock(client)
    }
}
