//! Web layer for the trip planner.
//!
//! Serves the map page, JSON APIs and HTML fragments for the search panel,
//! the timetable and the line catalog.

mod dto;
mod routes;
mod sessions;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use sessions::{SessionHandle, SessionStore};
pub use state::AppState;
pub use templates::*;
