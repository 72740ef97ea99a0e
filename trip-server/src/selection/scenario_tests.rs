//! End-to-end selection over the bundled fixtures and the mock adapter.

use std::path::Path;
use std::sync::Arc;

use super::*;
use crate::directions::MockDirectionsClient;
use crate::fixtures::{FixtureSet, load_places};

fn bundled() -> (FixtureSet, MockDirectionsClient) {
    let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let fixtures = FixtureSet::load(&data).unwrap();
    let mock = MockDirectionsClient::new(load_places(&data).unwrap());
    (fixtures, mock)
}

#[tokio::test]
async fn central_terminal_to_beach() {
    let (fixtures, mock) = bundled();
    let mut state = SelectionState::new();

    let start = mock
        .resolve_place("Central Terminal", &fixtures.region)
        .await
        .unwrap();
    let end = mock
        .resolve_place("Fort Lauderdale Beach", &fixtures.region)
        .await
        .unwrap();

    assert!(state.select_place(Field::Start, start).is_none());
    let request = state.select_place(Field::End, end).unwrap();
    assert!(state.locations_selected());

    let path = mock
        .compute_driving_path(&request.origin, &request.destination)
        .await
        .unwrap();
    assert!(state.apply_path(request.token, Arc::new(path)));

    state.find_routes(fixtures.route_options.clone()).unwrap();
    assert_eq!(state.view(), View::ResultsShown);
    assert!(!state.results().unwrap().is_empty());
    assert_eq!(state.selected_index(), 0);

    let option = state.select_route(1).unwrap();
    assert_eq!(option.id(), "2");
    assert_eq!(option.total_duration_minutes(), 45);
    assert_eq!(option.transfer_count(), 1);
    let lines: Vec<_> = option.sub_route_names().collect();
    assert_eq!(lines, vec!["Downtown Link", "Beach Link"]);
    assert_eq!(state.view(), View::DetailShown);

    state.back().unwrap();
    assert_eq!(state.view(), View::ResultsShown);
    assert_eq!(state.selected_index(), 1);
    assert!(Arc::ptr_eq(
        state.results().unwrap(),
        &fixtures.route_options
    ));
    assert!(state.path().is_some());
}

#[test]
fn every_option_has_consistent_transfers() {
    let (fixtures, _) = bundled();
    for option in fixtures.route_options.options() {
        assert_eq!(
            option.transfer_count() as usize,
            option.segments().len() - 1,
            "option {}",
            option.id()
        );
    }
}

#[tokio::test]
async fn path_for_swapped_pair_supersedes_first() {
    let (fixtures, mock) = bundled();
    let mut state = SelectionState::new();

    let start = mock
        .resolve_place("Central Terminal", &fixtures.region)
        .await
        .unwrap();
    let end = mock
        .resolve_place("Fort Lauderdale Beach", &fixtures.region)
        .await
        .unwrap();
    state.select_place(Field::Start, start);
    let first = state.select_place(Field::End, end).unwrap();
    let second = state.swap().unwrap();

    // The swapped request finishes first; the original arrives late
    let fresh = mock
        .compute_driving_path(&second.origin, &second.destination)
        .await
        .unwrap();
    let stale = mock
        .compute_driving_path(&first.origin, &first.destination)
        .await
        .unwrap();

    assert!(state.apply_path(second.token, Arc::new(fresh.clone())));
    assert!(!state.apply_path(first.token, Arc::new(stale)));
    assert_eq!(**state.path().unwrap(), fresh);
}
