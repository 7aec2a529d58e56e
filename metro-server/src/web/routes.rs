//! HTTP route handlers.

use std::path::Path;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path as UrlPath, Query, State, rejection::QueryRejection},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::Station;
use crate::network::NetworkError;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/stations", get(list_stations))
        .route("/stations.txt", get(stations_text))
        .route("/termini", get(list_termini))
        .route("/lines", get(list_lines))
        .route("/lines/:name/stations", get(line_stations))
        .route("/lines/:name/adjacent", get(adjacent_lines))
        .route("/path", get(find_path))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with the line table and route form.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let template = IndexTemplate {
        lines: state.metro.lines().map(LineView::from_line).collect(),
        station_count: state.metro.station_count(),
    };
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;
    Ok(Html(html))
}

/// Every station name as JSON.
async fn list_stations(State(state): State<AppState>) -> Json<StationsResponse> {
    let stations = state
        .metro
        .all_stations()
        .into_iter()
        .map(|s| s.name().to_string())
        .collect();
    Json(StationsResponse { stations })
}

/// Every station name as plain text, one per line.
async fn stations_text(State(state): State<AppState>) -> String {
    state.metro.output_all_stations()
}

/// Both terminals of every line.
async fn list_termini(State(state): State<AppState>) -> Json<TerminiResponse> {
    let termini = state
        .metro
        .termini()
        .into_iter()
        .map(|(line, first, last)| TerminusResult {
            line: line.to_string(),
            first: first.to_string(),
            last: last.to_string(),
        })
        .collect();
    Json(TerminiResponse { termini })
}

/// Every line with its size and connections.
async fn list_lines(State(state): State<AppState>) -> Json<LinesResponse> {
    let lines = state.metro.lines().map(LineSummary::from_line).collect();
    Json(LinesResponse { lines })
}

/// Stations on one line, in line order.
async fn line_stations(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
) -> Result<Json<LineStationsResponse>, AppError> {
    let stations = state
        .metro
        .stations_on_line(&name)?
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    Ok(Json(LineStationsResponse {
        line: name,
        stations,
    }))
}

/// Lines sharing a station with one line.
async fn adjacent_lines(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
) -> Result<Json<AdjacentLinesResponse>, AppError> {
    let line = state
        .metro
        .line(&name)
        .ok_or_else(|| NetworkError::LineNotFound { line: name.clone() })?;

    let adjacent = state
        .metro
        .adjacent_lines(&name)?
        .into_iter()
        .map(|other| AdjacentLineResult {
            name: other.name().to_string(),
            shared_stations: line
                .intersecting_stations_of(other.name())
                .iter()
                .map(|s| s.name().to_string())
                .collect(),
        })
        .collect();

    Ok(Json(AdjacentLinesResponse {
        line: name,
        adjacent,
    }))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Find a route between two stations.
async fn find_path(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<PathRequest>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(req) = query.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;

    let from = Station::parse(&req.from).map_err(|_| AppError::BadRequest {
        message: "Origin station must not be blank".to_string(),
    })?;
    let to = Station::parse(&req.to).map_err(|_| AppError::BadRequest {
        message: "Destination station must not be blank".to_string(),
    })?;

    let route = state.metro.find_path(&from, &to)?;

    // Return HTML or JSON based on Accept header
    if accepts_html(&headers) {
        let template = RouteTemplate {
            route: RouteView::from_route(&route),
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        Ok(Json(RouteResponse::from_route(&route)).into_response())
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<NetworkError> for AppError {
    fn from(e: NetworkError) -> Self {
        let message = e.to_string();
        match e {
            NetworkError::NoRoute { .. } => AppError::NotFound { message },
            e if e.is_not_found() => AppError::NotFound { message },
            NetworkError::InvalidStation(_) | NetworkError::BlankLineName => {
                AppError::BadRequest { message }
            }
            _ => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
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
