//! Fixture data loaded from the data directory at startup.
//!
//! The served region, the route options a search returns, scheduled routes
//! for the timetable, the transit line catalog and the mock adapter's places
//! are all plain JSON files. Route options fail soft: a bad entry is logged
//! and left out. Everything else fails the load.

mod error;
mod records;

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::directions::MockPlace;
use crate::domain::{
    DomainError, Region, Rejected, ResultSet, RouteOption, ScheduledRoute, TransitLine,
};

pub use error::FixtureError;
pub use records::{
    LineRecord, RegionRecord, RouteOptionRecord, ScheduledRouteRecord, SegmentRecord, StopRecord,
};

pub const REGION_FILE: &str = "region.json";
pub const ROUTE_OPTIONS_FILE: &str = "route_options.json";
pub const SCHEDULED_ROUTES_FILE: &str = "scheduled_routes.json";
pub const LINES_FILE: &str = "lines.json";
pub const PLACES_FILE: &str = "places.json";

/// Everything the planner serves, validated.
#[derive(Debug, Clone)]
pub struct FixtureSet {
    pub region: Region,
    pub route_options: Arc<ResultSet>,
    pub scheduled_routes: Vec<ScheduledRoute>,
    pub lines: Vec<TransitLine>,
}

impl FixtureSet {
    /// Load every fixture file except the mock places.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let data_dir = data_dir.as_ref();

        let region: RegionRecord = read_json(data_dir, REGION_FILE)?;
        let region = Region::try_from(region).map_err(|reason| FixtureError::Invalid {
            file: REGION_FILE,
            id: String::new(),
            reason,
        })?;

        let records: Vec<RouteOptionRecord> = read_json(data_dir, ROUTE_OPTIONS_FILE)?;
        let route_options = ResultSet::collect(records.into_iter().map(|r| {
            let id = r.id.clone();
            RouteOption::try_from(r).map_err(|reason| Rejected { id, reason })
        }));

        let records: Vec<ScheduledRouteRecord> = read_json(data_dir, SCHEDULED_ROUTES_FILE)?;
        let scheduled_routes: Vec<ScheduledRoute> =
            convert_all(records, SCHEDULED_ROUTES_FILE, |r| r.id.clone())?;

        let records: Vec<LineRecord> = read_json(data_dir, LINES_FILE)?;
        let lines: Vec<TransitLine> = convert_all(records, LINES_FILE, |r| r.id.clone())?;

        info!(
            region = %region.name,
            route_options = route_options.len(),
            rejected = route_options.rejected().len(),
            scheduled_routes = scheduled_routes.len(),
            lines = lines.len(),
            "loaded fixtures"
        );

        Ok(Self {
            region,
            route_options: Arc::new(route_options),
            scheduled_routes,
            lines,
        })
    }

    pub fn scheduled_route(&self, id: &str) -> Option<&ScheduledRoute> {
        self.scheduled_routes.iter().find(|r| r.id() == id)
    }
}

/// Load the places the mock adapter can resolve.
pub fn load_places(data_dir: impl AsRef<Path>) -> Result<Vec<MockPlace>, FixtureError> {
    let places: Vec<MockPlace> = read_json(data_dir.as_ref(), PLACES_FILE)?;
    if places.is_empty() {
        return Err(FixtureError::Empty { file: PLACES_FILE });
    }
    info!(count = places.len(), "loaded mock places");
    Ok(places)
}

fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, FixtureError> {
    let path = dir.join(file);
    let json = std::fs::read_to_string(&path).map_err(|source| FixtureError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| FixtureError::Parse { path, source })
}

fn convert_all<R, T>(
    records: Vec<R>,
    file: &'static str,
    id: impl Fn(&R) -> String,
) -> Result<Vec<T>, FixtureError>
where
    T: TryFrom<R, Error = DomainError>,
{
    records
        .into_iter()
        .map(|r| {
            let record_id = id(&r);
            T::try_from(r).map_err(|reason| FixtureError::Invalid {
                file,
                id: record_id,
                reason,
            })
        })
        .collect()
}
