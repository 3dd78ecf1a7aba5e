//! HTTP route handlers.

use std::collections::BTreeSet;
use std::path::Path;

use askama::Template;
use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path as UrlPath, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::domain::{
    ColumnId, ColumnVisibility, DomainError, ServiceType, Station, TrainId, parse_date,
};
use crate::fetch::SearchOutcome;
use crate::selection::FilterAction;

use super::dto::*;
use super::form::FormFields;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/stations/search", get(search_stations))
        .route("/api/session", get(session_snapshot))
        .route("/station", post(select_station))
        .route("/station/clear", post(clear_station))
        .route("/service-types", post(set_service_types))
        .route("/date", post(set_date))
        .route("/destinations", post(set_destinations))
        .route("/columns", post(set_columns))
        .route("/refresh", post(refresh))
        .route("/train/close", post(close_train))
        .route("/train/earlier-stops", post(toggle_earlier_stops))
        .route("/train/:id", post(open_train))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> AppError {
    AppError::NotFound {
        message: "no such page".to_string(),
    }
}

/// The page. `?q=` runs a station search and lists the results.
async fn index_page(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, AppError> {
    let search = match query.q {
        Some(q) if !q.is_empty() => {
            let outcome = state.search.search(&q).await;
            StationSearchView {
                searched: outcome != SearchOutcome::TooShort,
                results: outcome.into_stations(),
                query: q,
            }
        }
        _ => StationSearchView::default(),
    };

    let session = state.session.lock().await;
    let html = IndexTemplate::from_session(&session, search)
        .render()
        .map_err(|e| AppError::Internal {
            message: format!("Template error: {e}"),
        })?;
    Ok(Html(html))
}

/// Debounced station search.
async fn search_stations(
    State(state): State<AppState>,
    Query(req): Query<StationSearchRequest>,
) -> Json<StationSearchResponse> {
    let outcome = state.search.search(&req.q).await;
    Json(StationSearchResponse::from(outcome))
}

async fn session_snapshot(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let session = state.session.lock().await;
    Json(SessionSnapshot::from_session(&session))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Reply to a state change: back to the page for browsers, the new
/// snapshot for API clients.
async fn after_change(state: &AppState, headers: &HeaderMap) -> Response {
    if accepts_html(headers) {
        return Redirect::to("/").into_response();
    }
    let session = state.session.lock().await;
    Json(SessionSnapshot::from_session(&session)).into_response()
}

async fn dispatch(state: &AppState, headers: &HeaderMap, action: FilterAction) -> Response {
    state.session.dispatch(action).await;
    after_change(state, headers).await
}

async fn select_station(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let form = FormFields::from_request(&headers, &body)?;

    let id: i64 = form
        .require("id")?
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest {
            message: format!("Invalid station id: {}", form.get("id").unwrap_or("")),
        })?;
    let name = form.require("name")?.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest {
            message: "Station name must not be empty".to_string(),
        });
    }
    let distance = form
        .get("distance")
        .and_then(|d| d.trim().parse().ok())
        .unwrap_or(0.0);

    let station = Station::new(id, name, distance);
    Ok(dispatch(&state, &headers, FilterAction::SelectStation(Some(station))).await)
}

async fn clear_station(State(state): State<AppState>, headers: HeaderMap) -> Response {
    dispatch(&state, &headers, FilterAction::SelectStation(None)).await
}

async fn set_service_types(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let form = FormFields::from_request(&headers, &body)?;
    let types = form
        .all("type")
        .map(str::parse::<ServiceType>)
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(dispatch(&state, &headers, FilterAction::SetServiceTypes(types)).await)
}

async fn set_date(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let form = FormFields::from_request(&headers, &body)?;
    let date = parse_date(form.require("date")?)?;

    Ok(dispatch(&state, &headers, FilterAction::SetDate(date)).await)
}

async fn set_destinations(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let form = FormFields::from_request(&headers, &body)?;
    let destinations: BTreeSet<String> = form.all("destination").map(str::to_string).collect();

    Ok(dispatch(&state, &headers, FilterAction::SetDestinations(destinations)).await)
}

async fn set_columns(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let form = FormFields::from_request(&headers, &body)?;
    let columns = form
        .all("column")
        .map(str::parse::<ColumnId>)
        .collect::<Result<Vec<_>, _>>()?;

    let visibility = ColumnVisibility::only(columns);
    Ok(dispatch(&state, &headers, FilterAction::SetColumns(visibility)).await)
}

async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.session.refresh().await;
    after_change(&state, &headers).await
}

async fn open_train(
    State(state): State<AppState>,
    headers: HeaderMap,
    UrlPath(train_id): UrlPath<TrainId>,
) -> Response {
    state.session.open_train(train_id).await;
    after_change(&state, &headers).await
}

async fn close_train(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.session.close_train().await;
    after_change(&state, &headers).await
}

async fn toggle_earlier_stops(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.session.toggle_earlier_stops().await;
    after_change(&state, &headers).await
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
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
