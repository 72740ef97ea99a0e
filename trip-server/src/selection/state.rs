//! The selection state machine.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{DrivingPath, Location, ResultSet, RouteOption};

use super::SelectionError;

/// Which of the two location inputs an action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Start,
    End,
}

/// What the user is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Entering locations; no results are showing.
    Searching,
    /// The list of route options.
    ResultsShown,
    /// Stop-by-stop detail for one option.
    DetailShown,
}

/// One location input: the text in the box and the place it resolved to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Endpoint {
    pub text: String,
    pub location: Option<Location>,
}

/// Identifies the state generation a path request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathToken(u64);

impl PathToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// A driving path the caller should fetch and hand back via
/// [`SelectionState::apply_path`].
#[derive(Debug, Clone, PartialEq)]
pub struct PathRequest {
    pub token: PathToken,
    pub origin: Location,
    pub destination: Location,
}

/// Selection state for a single session.
///
/// Results are shared via `Arc` so that going back from the detail view
/// shows exactly the set that was open before.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    start: Endpoint,
    end: Endpoint,
    results: Option<Arc<ResultSet>>,
    selected_index: usize,
    detail_open: bool,
    generation: u64,
    path: Option<Arc<DrivingPath>>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        match (&self.results, self.detail_open) {
            (None, _) => View::Searching,
            (Some(_), false) => View::ResultsShown,
            (Some(_), true) => View::DetailShown,
        }
    }

    /// Both a start and an end place have been picked.
    pub fn locations_selected(&self) -> bool {
        self.start.location.is_some() && self.end.location.is_some()
    }

    pub fn endpoint(&self, field: Field) -> &Endpoint {
        match field {
            Field::Start => &self.start,
            Field::End => &self.end,
        }
    }

    pub fn results(&self) -> Option<&Arc<ResultSet>> {
        self.results.as_ref()
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// The option whose detail is open, if any.
    pub fn selected_route(&self) -> Option<&RouteOption> {
        if !self.detail_open {
            return None;
        }
        self.results.as_ref()?.get(self.selected_index)
    }

    /// The most recent path applied for the current generation.
    pub fn path(&self) -> Option<&Arc<DrivingPath>> {
        self.path.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The user changed the text in one of the inputs.
    ///
    /// The field's resolved place is discarded and any results or path are
    /// dropped. Outstanding path requests become stale.
    pub fn edit_input(&mut self, field: Field, text: impl Into<String>) {
        let endpoint = self.endpoint_mut(field);
        endpoint.text = text.into();
        endpoint.location = None;
        self.clear_results();
        self.advance_generation();
    }

    /// The user picked a resolved place for one of the inputs.
    ///
    /// The input text becomes the place's address. Returns a path request
    /// when both locations are now set.
    pub fn select_place(&mut self, field: Field, location: Location) -> Option<PathRequest> {
        let endpoint = self.endpoint_mut(field);
        endpoint.text = location.address.clone();
        endpoint.location = Some(location);
        self.clear_results();
        self.request_path()
    }

    /// Exchange the start and end inputs, text and places both.
    pub fn swap(&mut self) -> Option<PathRequest> {
        std::mem::swap(&mut self.start, &mut self.end);
        self.clear_results();
        self.request_path()
    }

    /// Show `results` for the current pair of locations.
    ///
    /// The first option is selected by default and the list view is shown.
    pub fn find_routes(&mut self, results: Arc<ResultSet>) -> Result<(), SelectionError> {
        if !self.locations_selected() {
            return Err(SelectionError::LocationsIncomplete);
        }
        if results.is_empty() {
            return Err(SelectionError::NoResults);
        }
        self.results = Some(results);
        self.selected_index = 0;
        self.detail_open = false;
        Ok(())
    }

    /// Open the detail view for the option at `index`.
    pub fn select_route(&mut self, index: usize) -> Result<&RouteOption, SelectionError> {
        let results = self.results.as_ref().ok_or(SelectionError::NoResults)?;
        if index >= results.len() {
            return Err(SelectionError::IndexOutOfRange {
                index,
                len: results.len(),
            });
        }
        self.selected_index = index;
        self.detail_open = true;
        self.results
            .as_deref()
            .and_then(|r| r.get(index))
            .ok_or(SelectionError::NoResults)
    }

    /// Close the detail view, returning to the same list.
    pub fn back(&mut self) -> Result<(), SelectionError> {
        if self.view() != View::DetailShown {
            return Err(SelectionError::NotInDetail);
        }
        self.detail_open = false;
        Ok(())
    }

    /// Store a fetched path if it answers the latest request.
    ///
    /// Returns `false` and leaves the state unchanged for a stale token.
    pub fn apply_path(&mut self, token: PathToken, path: Arc<DrivingPath>) -> bool {
        if token.0 != self.generation || !self.locations_selected() {
            debug!(
                token = token.0,
                current = self.generation,
                "discarding stale driving path"
            );
            return false;
        }
        self.path = Some(path);
        true
    }

    fn endpoint_mut(&mut self, field: Field) -> &mut Endpoint {
        match field {
            Field::Start => &mut self.start,
            Field::End => &mut self.end,
        }
    }

    fn clear_results(&mut self) {
        self.results = None;
        self.selected_index = 0;
        self.detail_open = false;
    }

    fn advance_generation(&mut self) -> PathToken {
        self.generation += 1;
        self.path = None;
        PathToken(self.generation)
    }

    fn request_path(&mut self) -> Option<PathRequest> {
        let token = self.advance_generation();
        let origin = self.start.location.clone()?;
        let destination = self.end.location.clone()?;
        Some(PathRequest {
            token,
            origin,
            destination,
        })
    }
}
