use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::pipeline::build::{build_route, match_waypoint, offset_toward_waypoint, WaypointNames};
use crate::pipeline::progress::{SessionReading, TrackingPhase, TrackingSession};
use crate::pipeline::tracking_id::normalize_tracking_id;
use crate::state::AppState;
use crate::types::route::default_route;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tracking", post(start_tracking))
        .route("/api/tracking/link", get(start_from_link))
        .route(
            "/api/tracking/:session_id",
            get(read_session).delete(reset_session),
        )
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StartTrackingRequest {
    tracking_id: String,
}

#[derive(Serialize)]
struct SessionResponse {
    session_id: String,
    tracking_id: String,
    started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reported_position: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dropped_waypoints: Vec<String>,
    #[serde(flatten)]
    reading: SessionReading,
}

impl SessionResponse {
    fn new(session_id: String, session: &TrackingSession, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            tracking_id: session.tracking_id.clone(),
            started_at: session.started_at,
            reported_position: session.reported_position.clone(),
            dropped_waypoints: Vec::new(),
            reading: session.read_at(now),
        }
    }
}

async fn start_tracking(
    State(state): State<AppState>,
    Json(req): Json<StartTrackingRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let tracking_id = normalize_tracking_id(&req.tracking_id);
    if tracking_id != normalize_tracking_id(&state.config().demo_tracking_id) {
        return Err(AppError::InvalidTrackingId(req.tracking_id));
    }

    let now = Utc::now();
    let session = TrackingSession::new(tracking_id, default_route(), now);
    let session_id = Uuid::new_v4().to_string();
    let response = SessionResponse::new(session_id.clone(), &session, now);
    state.insert(session_id.clone(), session);

    tracing::info!("Started demo tracking session {}", session_id);

    Ok(Json(response))
}

async fn start_from_link(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SessionResponse>, AppError> {
    let tracking_id = pairs
        .iter()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| normalize_tracking_id(value))
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidTrackingId(String::new()))?;

    let names = WaypointNames::from_query_pairs(&pairs);
    let built = build_route(&names, state.geocoder(), state.config().ms_per_km).await?;

    let now = Utc::now();
    let mut session = TrackingSession::new(tracking_id, built.route, now);
    if let Some(current) = names.current.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        match match_waypoint(&session.route, current) {
            Some(index) => {
                session.start_offset_ms = offset_toward_waypoint(&session.route, index)
            }
            None => session.reported_position = Some(current.to_string()),
        }
    }

    let session_id = Uuid::new_v4().to_string();
    let mut response = SessionResponse::new(session_id.clone(), &session, now);
    response.dropped_waypoints = built.dropped;

    tracing::info!(
        "Started tracking session {} for {} ({} legs, {:.0} ms)",
        session_id,
        session.tracking_id,
        session.route.len(),
        session.route.total_duration()
    );
    state.insert(session_id, session);

    Ok(Json(response))
}

async fn read_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(session_id.clone()))?;

    Ok(Json(SessionResponse::new(session_id, &session, Utc::now())))
}

#[derive(Serialize)]
struct ResetResponse {
    session_id: String,
    phase: TrackingPhase,
}

async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ResetResponse>, AppError> {
    let session = state
        .remove(&session_id)
        .ok_or_else(|| AppError::NotFound(session_id.clone()))?;

    tracing::info!(
        "Reset tracking session {} at {:.1}%",
        session_id,
        session.progress_at(Utc::now()) * 100.0
    );

    Ok(Json(ResetResponse {
        session_id,
        phase: TrackingPhase::Idle,
    }))
}
