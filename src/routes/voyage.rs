use axum::{
    extract::Query,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::pipeline::{locate, timeline};
use crate::state::AppState;
use crate::types::route::{
    default_route, known_locations, CoordinateSpace, Location, Route, RouteSegment, VoyageSnapshot,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/route", get(route_overview))
        .route("/api/locate", post(locate_ship))
        .route("/api/timeline", get(voyage_timeline))
}

#[derive(Serialize)]
struct RouteOverview {
    total_duration_ms: f64,
    segments: Vec<RouteSegment>,
    polyline: Vec<[f64; 2]>,
    ports: Vec<Location>,
}

async fn route_overview() -> Json<RouteOverview> {
    let route = default_route();
    let ports = known_locations();

    Json(RouteOverview {
        total_duration_ms: route.total_duration(),
        polyline: route.polyline(),
        segments: route.segments().to_vec(),
        ports: vec![ports.usa, ports.dubai, ports.korea],
    })
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LocateRequest {
    progress: f64,
    #[serde(default)]
    route: Option<Route>,
    #[serde(default)]
    coordinates: Option<String>,
}

fn parse_space(raw: Option<&str>) -> Result<CoordinateSpace, AppError> {
    match raw {
        Some(space) => CoordinateSpace::from_str(space).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid coordinates: {}. Use 'lnglat' or 'percent'",
                space
            ))
        }),
        None => Ok(CoordinateSpace::default()),
    }
}

fn in_space(route: Route, space: CoordinateSpace) -> Route {
    match space {
        CoordinateSpace::LngLat => route,
        CoordinateSpace::Percent => route.to_percent_space(),
    }
}

async fn locate_ship(Json(req): Json<LocateRequest>) -> Result<Json<VoyageSnapshot>, AppError> {
    if !req.progress.is_finite() {
        return Err(AppError::BadRequest("progress must be a finite number".to_string()));
    }
    let space = parse_space(req.coordinates.as_deref())?;
    let route = req.route.unwrap_or_else(default_route);
    route.validate()?;
    let route = in_space(route, space);
    let progress = req.progress.clamp(0.0, 1.0);

    Ok(Json(locate::locate(&route, progress)))
}

#[derive(Deserialize)]
struct TimelineQuery {
    samples: Option<usize>,
    coordinates: Option<String>,
}

#[derive(Serialize)]
struct TimelineResponse {
    total_duration_ms: f64,
    samples: Vec<timeline::TimelineSample>,
}

async fn voyage_timeline(
    Query(params): Query<TimelineQuery>,
) -> Result<Json<TimelineResponse>, AppError> {
    let space = parse_space(params.coordinates.as_deref())?;
    let route = in_space(default_route(), space);
    let samples = timeline::timeline(&route, params.samples.unwrap_or(60));

    tracing::debug!("Sampled {} timeline points", samples.len());

    Ok(Json(TimelineResponse {
        total_duration_ms: route.total_duration(),
        samples,
    }))
}
