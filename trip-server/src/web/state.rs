//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedDirections;
use crate::fixtures::FixtureSet;
use crate::schedule::ScheduleConfig;

use super::sessions::SessionStore;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached directions backend (live or mock)
    pub directions: Arc<CachedDirections>,

    /// Region, route options, schedules and lines
    pub fixtures: Arc<FixtureSet>,

    /// Per-user selection sessions
    pub sessions: SessionStore,

    /// Default timetable parameters
    pub schedule: Arc<ScheduleConfig>,

    /// Find routes as soon as both places are picked
    pub auto_search: bool,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        directions: CachedDirections,
        fixtures: FixtureSet,
        sessions: SessionStore,
        schedule: ScheduleConfig,
    ) -> Self {
        Self {
            directions: Arc::new(directions),
            fixtures: Arc::new(fixtures),
            sessions,
            schedule: Arc::new(schedule),
            auto_search: false,
        }
    }

    pub fn with_auto_search(mut self, enabled: bool) -> Self {
        self.auto_search = enabled;
        self
    }
}
