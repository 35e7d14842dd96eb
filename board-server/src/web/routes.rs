//! HTTP route handlers.

use std::convert::Infallible;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{Html, IntoResponse},
    routing::get,
};
use chrono::Local;
use futures::stream::{self, Stream};
use tower_http::services::ServeDir;
use tracing::warn;

use crate::domain::RefTime;
use crate::lookup::{DayType, DepartureWatch, classify_day, next_departures};

use super::dto::*;
use super::state::{AppState, NotReady};
use super::templates::{BoardTemplate, StationView};

/// Create the application router.
///
/// `data_dir` is served under `/data`, so the generated CSV files stay
/// reachable as plain static assets.
pub fn create_router(state: AppState, data_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/stations", get(stations))
        .route("/api/departures", get(departures))
        .route("/api/departures/stream", get(departures_stream))
        .nest_service("/data", ServeDir::new(data_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The board page.
async fn index_page(State(state): State<AppState>) -> impl IntoResponse {
    let convergence = state.line.convergence().name.clone();
    let last = state
        .session
        .last_station()
        .filter(|s| state.line.station_index(s).is_some() && *s != convergence);

    let template = BoardTemplate {
        stations: state
            .line
            .stations()
            .iter()
            .map(|s| StationView {
                name: s.name.clone(),
                major: s.major,
                selectable: s.name != convergence,
            })
            .collect(),
        convergence,
        last_selected: last.unwrap_or_default(),
    };

    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// List the line's stations and the remembered selection.
async fn stations(State(state): State<AppState>) -> Json<StationsResponse> {
    let convergence = state.line.convergence().name.clone();

    let stations = state
        .line
        .stations()
        .iter()
        .map(|s| StationDto {
            name: s.name.clone(),
            rapid_stop: s.rapid_stop,
            major: s.major,
            selectable: s.name != convergence,
        })
        .collect();

    let last_selected = state
        .session
        .last_station()
        .filter(|s| state.line.station_index(s).is_some() && *s != convergence);

    Json(StationsResponse {
        stations,
        convergence,
        through_destination: state.line.through().destination.clone(),
        last_selected,
    })
}

/// Look up the next departures from a station.
async fn departures(
    State(state): State<AppState>,
    Query(req): Query<DeparturesRequest>,
) -> Result<Json<DeparturesResponse>, AppError> {
    let day = match &req.day {
        Some(label) => DayType::parse(label).ok_or_else(|| AppError::BadRequest {
            message: format!("invalid day type {label:?}"),
        })?,
        None => classify_day(Local::now().naive_local(), &state.holidays),
    };

    let at = match &req.time {
        Some(text) => RefTime::parse(text).map_err(|e| AppError::BadRequest {
            message: format!("invalid reference time {text:?}: {e}"),
        })?,
        None => RefTime::from_clock(Local::now().time()),
    };

    let table = state.tables.table_for(day).await?;

    let departures = next_departures(&table, &state.line, &req.station, at, &state.lookup)
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?;

    // Remember a valid, non-terminal selection for the next session
    if req.station != state.line.convergence().name
        && state.line.station_index(&req.station).is_some()
    {
        if let Err(e) = state.session.remember_station(&req.station) {
            warn!(station = %req.station, %e, "could not persist station selection");
        }
    }

    Ok(Json(DeparturesResponse {
        station: req.station,
        day_type: day.as_str().to_string(),
        reference_time: at.to_string(),
        departures: departures.iter().map(DepartureDto::from).collect(),
    }))
}

/// Stream the board for a station in current-time mode.
///
/// Re-evaluates once a second against the wall clock and pushes an
/// event whenever the board changes. The ticker is cancelled when the
/// client disconnects.
async fn departures_stream(
    State(state): State<AppState>,
    Query(req): Query<StreamRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if state.line.station_index(&req.station).is_none() {
        return Err(AppError::BadRequest {
            message: format!("station {:?} is not on the line", req.station),
        });
    }

    let day = classify_day(Local::now().naive_local(), &state.holidays);
    let table = state.tables.table_for(day).await?;

    let watch = DepartureWatch::spawn(
        table,
        state.line.clone(),
        req.station.clone(),
        (*state.lookup).clone(),
    );
    let rx = watch.subscribe();

    // The watch handle rides along in the stream state so the ticker is
    // dropped, and therefore cancelled, with the connection
    let stream = stream::unfold((watch, rx, true), |(watch, mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }

        let dtos: Vec<DepartureDto> = rx.borrow_and_update().iter().map(DepartureDto::from).collect();
        let event = Event::default().json_data(&dtos).ok()?;
        Some((Ok::<_, Infallible>(event), (watch, rx, false)))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotReady { message: String },
    Internal { message: String },
}

impl From<NotReady> for AppError {
    fn from(e: NotReady) -> Self {
        match e {
            NotReady::Loading => AppError::NotReady {
                message: e.to_string(),
            },
            NotReady::Failed(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotReady { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
