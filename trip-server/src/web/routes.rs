//! HTTP route handlers.

use std::str::FromStr;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Utc, Weekday};
use tower_http::services::ServeDir;
use tracing::{debug, error, info, warn};

use crate::directions::DirectionsError;
use crate::domain::{ClockTime, TimeError};
use crate::schedule::ScheduleError;
use crate::selection::{PathRequest, SelectionError, SelectionState};

use super::dto::*;
use super::sessions::SessionHandle;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/region", get(region))
        .route("/api/lines", get(lines))
        .route("/api/schedule", get(schedule))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/input", post(edit_input))
        .route("/api/sessions/:id/place", post(select_place))
        .route("/api/sessions/:id/swap", post(swap))
        .route("/api/sessions/:id/search", post(find_routes))
        .route("/api/sessions/:id/select", post(select_route))
        .route("/api/sessions/:id/back", post(back))
        .route("/api/sessions/:id/path", get(driving_path))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Map page with the search panel.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let template = IndexTemplate::new(
        &state.fixtures.region,
        state.directions.backend().is_mock(),
        state.auto_search,
    );
    Ok(Html(template.render()?))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Region bounds, centre and country.
async fn region(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.fixtures.region.clone())
}

/// Transit lines and whether each runs at the given (or current) time.
async fn lines(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<LinesQuery>,
) -> Result<Response, AppError> {
    let (today, now) = state.fixtures.region.local_clock(Utc::now());
    let day = match req.day.as_deref() {
        Some(d) => Weekday::from_str(d).map_err(|_| AppError::BadRequest {
            message: format!("Invalid day: {d}"),
        })?,
        None => today,
    };
    let time = match req.time.as_deref() {
        Some(t) => ClockTime::parse(t)?,
        None => now,
    };

    let results: Vec<LineResult> = state
        .fixtures
        .lines
        .iter()
        .map(|line| LineResult {
            operating: line.operates_at(day, time),
            line: line.clone(),
        })
        .collect();

    if accepts_html(&headers) {
        let template = LinesTemplate {
            lines: results
                .iter()
                .map(|r| LineView::new(&r.line, r.operating))
                .collect(),
        };
        return Ok(Html(template.render()?).into_response());
    }

    Ok(Json(LinesResponse {
        day: day.to_string(),
        time,
        lines: results,
    })
    .into_response())
}

/// Generated departures for a scheduled route.
async fn schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<ScheduleQuery>,
) -> Result<Response, AppError> {
    let route = match req.route.as_deref() {
        Some(id) => state.fixtures.scheduled_route(id),
        None => state.fixtures.scheduled_routes.first(),
    }
    .ok_or_else(|| AppError::NotFound {
        message: format!(
            "Unknown scheduled route: {}",
            req.route.as_deref().unwrap_or("(none)")
        ),
    })?;

    let mut config = (*state.schedule).clone();
    if let Some(time) = req.time.as_deref() {
        config = config.with_initial_time(ClockTime::parse(time)?);
    }
    if let Some(count) = req.count {
        config = config.with_slot_count(count);
    }
    if let Some(interval) = req.interval {
        config = config.with_interval(interval);
    }

    let slots = config.slots_for(route)?;
    let selected = match req.selected.as_deref() {
        Some(label) => slots.get(label).ok_or_else(|| AppError::BadRequest {
            message: format!("No departure at {label}"),
        })?,
        None => slots.first().ok_or_else(|| AppError::Internal {
            message: "no departures generated".into(),
        })?,
    };

    if accepts_html(&headers) {
        let template =
            ScheduleTemplate::new(route.id(), route.duration_minutes(), &slots, selected);
        return Ok(Html(template.render()?).into_response());
    }

    Ok(Json(ScheduleResponse::new(route, &slots, selected)).into_response())
}

/// Render a session as an HTML fragment or a JSON snapshot.
fn session_response(
    id: u64,
    state: &SelectionState,
    headers: &HeaderMap,
) -> Result<Response, AppError> {
    if accepts_html(headers) {
        let html = SessionTemplate::from_state(id, state).render()?;
        return Ok(Html(html).into_response());
    }
    Ok(Json(SessionResponse::from_state(id, state)).into_response())
}

async fn find_session(state: &AppState, id: u64) -> Result<SessionHandle, AppError> {
    state.sessions.get(id).await.ok_or_else(|| AppError::NotFound {
        message: format!("Unknown session: {id}"),
    })
}

/// Fetch a driving path in the background and hand it to the session.
///
/// The session lock is not held while waiting on the backend.
fn spawn_path_fetch(state: &AppState, session_id: u64, session: SessionHandle, req: PathRequest) {
    let directions = state.directions.clone();
    tokio::spawn(async move {
        match directions
            .compute_driving_path(&req.origin, &req.destination)
            .await
        {
            Ok(path) => {
                let applied = session.lock().await.apply_path(req.token, path);
                debug!(
                    session = session_id,
                    generation = req.token.generation(),
                    applied,
                    "driving path fetched"
                );
            }
            Err(e) => warn!(
                session = session_id,
                error = %e,
                "failed to fetch driving path"
            ),
        }
    });
}

/// After a place change: fetch the path and, if configured, search.
fn after_locations_changed(
    app: &AppState,
    id: u64,
    session: &SessionHandle,
    state: &mut SelectionState,
    request: Option<PathRequest>,
) {
    if let Some(req) = request {
        spawn_path_fetch(app, id, session.clone(), req);
    }
    if app.auto_search && state.locations_selected() {
        if let Err(e) = state.find_routes(app.fixtures.route_options.clone()) {
            warn!(session = id, error = %e, "automatic route search failed");
        }
    }
}

/// Start a new session.
async fn create_session(
    State(app): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let (id, session) = app.sessions.create().await;
    info!(session = id, active = app.sessions.entry_count(), "session created");

    let state = session.lock().await;
    let response = session_response(id, &state, &headers)?;
    Ok((StatusCode::CREATED, response).into_response())
}

async fn get_session(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let session = find_session(&app, id).await?;
    let state = session.lock().await;
    session_response(id, &state, &headers)
}

/// The user typed in one of the inputs.
async fn edit_input(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(req): Json<InputRequest>,
) -> Result<Response, AppError> {
    let session = find_session(&app, id).await?;
    let mut state = session.lock().await;
    state.edit_input(req.field, req.text);
    session_response(id, &state, &headers)
}

/// Resolve text to a place and select it.
///
/// Resolution happens before the session is locked. On failure the session
/// is left as it was.
async fn select_place(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(req): Json<PlaceRequest>,
) -> Result<Response, AppError> {
    let session = find_session(&app, id).await?;
    let location = app.directions.resolve_place(&req.query).await?;
    debug!(
        cached = app.directions.cache_entry_count(),
        query = %req.query,
        "place resolved"
    );
    info!(session = id, field = ?req.field, address = %location.address, "place selected");

    let mut state = session.lock().await;
    let request = state.select_place(req.field, (*location).clone());
    after_locations_changed(&app, id, &session, &mut state, request);
    session_response(id, &state, &headers)
}

/// Exchange start and destination.
async fn swap(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let session = find_session(&app, id).await?;
    let mut state = session.lock().await;
    let request = state.swap();
    after_locations_changed(&app, id, &session, &mut state, request);
    session_response(id, &state, &headers)
}

/// Show route options for the selected locations.
async fn find_routes(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let session = find_session(&app, id).await?;
    let mut state = session.lock().await;
    state.find_routes(app.fixtures.route_options.clone())?;
    info!(session = id, options = app.fixtures.route_options.len(), "routes found");
    session_response(id, &state, &headers)
}

/// Open a route's details.
async fn select_route(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(req): Json<SelectRequest>,
) -> Result<Response, AppError> {
    let session = find_session(&app, id).await?;
    let mut state = session.lock().await;
    state.select_route(req.index)?;
    session_response(id, &state, &headers)
}

/// Close the details and return to the list.
async fn back(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let session = find_session(&app, id).await?;
    let mut state = session.lock().await;
    state.back()?;
    session_response(id, &state, &headers)
}

/// The latest driving path as GeoJSON.
async fn driving_path(
    State(app): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let session = find_session(&app, id).await?;
    let state = session.lock().await;
    let path = state.path().ok_or_else(|| AppError::NotFound {
        message: "No driving path yet".into(),
    })?;
    Ok(Json(PathResponse {
        generation: state.generation(),
        path,
    })
    .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<DirectionsError> for AppError {
    fn from(e: DirectionsError) -> Self {
        let message = e.to_string();
        match e {
            DirectionsError::PlaceNotResolved(_) | DirectionsError::NoRoute => {
                AppError::NotFound { message }
            }
            DirectionsError::NotConfigured(_) => AppError::Internal { message },
            _ => AppError::BadGateway { message },
        }
    }
}

impl From<SelectionError> for AppError {
    fn from(e: SelectionError) -> Self {
        let message = e.to_string();
        match e {
            SelectionError::IndexOutOfRange { .. } => AppError::BadRequest { message },
            SelectionError::LocationsIncomplete
            | SelectionError::NoResults
            | SelectionError::NotInDetail => AppError::Conflict { message },
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<TimeError> for AppError {
    fn from(e: TimeError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Internal {
            message: format!("Template error: {e}"),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Conflict { message }
            | AppError::BadGateway { message }
            | AppError::Internal { message } => message,
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path as FsPath;
    use std::time::Duration;

    use axum::body::to_bytes;
    use axum::http::HeaderValue;

    use crate::cache::{CacheConfig, CachedDirections};
    use crate::directions::MockDirectionsClient;
    use crate::fixtures::{FixtureSet, load_places};
    use crate::schedule::ScheduleConfig;
    use crate::selection::{Field, View};
    use crate::web::sessions::SessionStore;

    fn app() -> AppState {
        let data = FsPath::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let fixtures = FixtureSet::load(&data).unwrap();
        let mock = MockDirectionsClient::new(load_places(&data).unwrap());
        let directions =
            CachedDirections::new(mock.into(), fixtures.region.clone(), &CacheConfig::default());
        AppState::new(
            directions,
            fixtures,
            SessionStore::new(Duration::from_secs(60), 100),
            ScheduleConfig::default(),
        )
    }

    fn json_headers() -> HeaderMap {
        HeaderMap::new()
    }

    fn html_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        headers
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn place(
        app: &AppState,
        id: u64,
        field: Field,
        query: &str,
    ) -> Result<Response, AppError> {
        select_place(
            State(app.clone()),
            json_headers(),
            Path(id),
            Json(PlaceRequest {
                field,
                query: query.into(),
            }),
        )
        .await
    }

    #[test]
    fn accepts_html_header() {
        assert!(accepts_html(&html_headers()));
        assert!(!accepts_html(&json_headers()));
    }

    #[test]
    fn error_status_mapping() {
        let err: AppError = DirectionsError::PlaceNotResolved("x".into()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: AppError = DirectionsError::RateLimited.into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        let err: AppError = SelectionError::LocationsIncomplete.into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: AppError = SelectionError::IndexOutOfRange { index: 9, len: 3 }.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: AppError = ScheduleError::ZeroCount.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn session_flow_over_handlers() {
        let app = app();
        let (id, session) = app.sessions.create().await;

        let response = place(&app, id, Field::Start, "Central Terminal").await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["view"], "searching");
        assert_eq!(json["locations_selected"], false);

        place(&app, id, Field::End, "Fort Lauderdale Beach").await.unwrap();

        let response = find_routes(State(app.clone()), json_headers(), Path(id))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["view"], "results_shown");
        assert_eq!(json["routes"].as_array().unwrap().len(), 3);

        let response = select_route(
            State(app.clone()),
            html_headers(),
            Path(id),
            Json(SelectRequest { index: 1 }),
        )
        .await
        .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Downtown Link"));
        assert!(html.contains("Back to routes"));

        back(State(app.clone()), json_headers(), Path(id))
            .await
            .unwrap();
        let state = session.lock().await;
        assert_eq!(state.view(), View::ResultsShown);
        assert_eq!(state.selected_index(), 1);
    }

    #[tokio::test]
    async fn unresolved_place_leaves_session_untouched() {
        let app = app();
        let (id, session) = app.sessions.create().await;

        let err = place(&app, id, Field::Start, "Atlantis").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(session.lock().await.endpoint(Field::Start).text, "");
    }

    #[tokio::test]
    async fn search_before_places_conflicts() {
        let app = app();
        let (id, _) = app.sessions.create().await;
        let err = find_routes(State(app.clone()), json_headers(), Path(id))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn auto_search_shows_results_once_both_set() {
        let app = app().with_auto_search(true);
        let (id, _) = app.sessions.create().await;

        place(&app, id, Field::Start, "Central Terminal").await.unwrap();
        let response = place(&app, id, Field::End, "Fort Lauderdale Beach").await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["view"], "results_shown");
    }

    #[tokio::test]
    async fn driving_path_arrives_in_background() {
        let app = app();
        let (id, session) = app.sessions.create().await;
        place(&app, id, Field::Start, "Central Terminal").await.unwrap();
        place(&app, id, Field::End, "Fort Lauderdale Beach").await.unwrap();

        for _ in 0..50 {
            if session.lock().await.path().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let response = driving_path(State(app.clone()), Path(id)).await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["geometry"]["type"], "LineString");
        assert_eq!(json["generation"], session.lock().await.generation());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let app = app();
        let err = get_session(State(app), json_headers(), Path(999))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn schedule_defaults_and_selection() {
        let app = app();
        let response = schedule(
            State(app.clone()),
            json_headers(),
            Query(ScheduleQuery {
                selected: Some("2:35 PM".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["route_id"], "downtown-beach");
        assert_eq!(json["labels"], serde_json::json!(["1:55 PM", "2:15 PM", "2:35 PM"]));
        assert_eq!(json["selected"]["arrival"], "3:05 PM");

        let err = schedule(
            State(app),
            json_headers(),
            Query(ScheduleQuery {
                interval: Some(0),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn schedule_accepts_interval_that_wraps_midnight() {
        let app = app();
        let response = schedule(
            State(app),
            json_headers(),
            Query(ScheduleQuery {
                count: Some(2),
                interval: Some(1000),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["labels"], serde_json::json!(["1:55 PM", "6:35 AM"]));
    }

    #[tokio::test]
    async fn lines_at_given_time() {
        let app = app();
        let response = lines(
            State(app),
            json_headers(),
            Query(LinesQuery {
                day: Some("sat".into()),
                time: Some("7:00 PM".into()),
            }),
        )
        .await
        .unwrap();
        let json = body_json(response).await;
        let running: Vec<_> = json["lines"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|l| l["operating"] == true)
            .map(|l| l["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(running, vec!["Las Olas Link"]);
    }

    #[tokio::test]
    async fn index_renders() {
        let response = index_page(State(app())).await.unwrap();
        assert!(response.0.contains("LauderGO!"));
        assert!(response.0.contains("Demo mode"));
    }
}
