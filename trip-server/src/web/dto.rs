//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{ClockTime, DrivingPath, RouteOption, ScheduledRoute, TransitLine};
use crate::schedule::{Arrival, TimeSlot, TimeSlots};
use crate::selection::{Endpoint, Field, SelectionState, View};

/// Query for a generated timetable.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    /// Scheduled route id (defaults to the first)
    pub route: Option<String>,

    /// First departure, e.g. "1:55 PM"
    pub time: Option<String>,

    /// Number of departures
    pub count: Option<usize>,

    /// Minutes between departures
    pub interval: Option<u32>,

    /// Departure to show stop times for (defaults to the first)
    pub selected: Option<String>,
}

/// Query for the line catalog.
#[derive(Debug, Default, Deserialize)]
pub struct LinesQuery {
    /// Weekday name, e.g. "sat" (defaults to today)
    pub day: Option<String>,

    /// Time of day (defaults to now)
    pub time: Option<String>,
}

/// Replace the text in one of the location inputs.
#[derive(Debug, Deserialize)]
pub struct InputRequest {
    pub field: Field,
    pub text: String,
}

/// Resolve text and pick the resulting place for an input.
#[derive(Debug, Deserialize)]
pub struct PlaceRequest {
    pub field: Field,
    pub query: String,
}

/// Open a route option's details.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub index: usize,
}

/// Snapshot of a selection session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: u64,
    pub view: View,
    pub start: Endpoint,
    pub end: Endpoint,
    pub locations_selected: bool,

    /// Present unless searching
    pub routes: Option<Vec<RouteOption>>,
    pub selected_index: usize,

    /// Present in the detail view
    pub selected_route: Option<RouteOption>,

    /// Incremented whenever the locations change
    pub path_generation: u64,
    pub has_path: bool,
}

impl SessionResponse {
    pub fn from_state(id: u64, state: &SelectionState) -> Self {
        Self {
            id,
            view: state.view(),
            start: state.endpoint(Field::Start).clone(),
            end: state.endpoint(Field::End).clone(),
            locations_selected: state.locations_selected(),
            routes: state.results().map(|r| r.options().to_vec()),
            selected_index: state.selected_index(),
            selected_route: state.selected_route().cloned(),
            path_generation: state.generation(),
            has_path: state.path().is_some(),
        }
    }
}

/// A driving path with the generation it was fetched for.
#[derive(Debug, Serialize)]
pub struct PathResponse<'a> {
    pub generation: u64,
    #[serde(flatten)]
    pub path: &'a DrivingPath,
}

/// A generated timetable.
#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub route_id: String,
    pub duration_minutes: u32,
    pub departure_stop: Option<String>,
    pub labels: Vec<String>,
    pub selected: SlotResult,
}

/// One departure's stop times.
#[derive(Debug, Serialize)]
pub struct SlotResult {
    pub departure: ClockTime,
    pub arrival: Option<ClockTime>,
    pub arrivals: Vec<Arrival>,
}

impl SlotResult {
    pub fn from_slot(slot: &TimeSlot) -> Self {
        Self {
            departure: slot.departure(),
            arrival: slot.final_arrival(),
            arrivals: slot.arrivals().to_vec(),
        }
    }
}

impl ScheduleResponse {
    pub fn new(route: &ScheduledRoute, slots: &TimeSlots, selected: &TimeSlot) -> Self {
        Self {
            route_id: route.id().to_string(),
            duration_minutes: route.duration_minutes(),
            departure_stop: route.stops().first().map(|s| s.name.clone()),
            labels: slots.labels(),
            selected: SlotResult::from_slot(selected),
        }
    }
}

/// A line and whether it is running at the queried time.
#[derive(Debug, Serialize)]
pub struct LineResult {
    #[serde(flatten)]
    pub line: TransitLine,
    pub operating: bool,
}

#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub day: String,
    pub time: ClockTime,
    pub lines: Vec<LineResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
