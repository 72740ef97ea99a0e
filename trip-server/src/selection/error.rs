//! Errors for rejected user actions.

/// A user action that is not valid in the current state.
///
/// The state is never modified when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("both start and end locations must be selected")]
    LocationsIncomplete,

    #[error("no route options to choose from")]
    NoResults,

    #[error("route index {index} out of range ({len} options)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no route details are open")]
    NotInDetail,
}
