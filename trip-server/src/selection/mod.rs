//! Per-session route selection.
//!
//! One [`SelectionState`] exists per planning session. It records what the
//! user typed, which places they picked, the current result set and which
//! option is open. The visible [`View`] is always derived from that data.

mod error;
mod state;

#[cfg(test)]
mod scenario_tests;

pub use error::SelectionError;
pub use state::{Endpoint, Field, PathRequest, PathToken, SelectionState, View};
