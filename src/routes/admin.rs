use axum::{extract::State, routing::post, Json, Router};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::pipeline::tracking_id::generate_tracking_id;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/admin/tracking-url", post(create_tracking_url))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TrackingUrlRequest {
    start: String,
    #[serde(default)]
    stops: Vec<String>,
    end: String,
    current: String,
}

#[derive(Serialize, Deserialize)]
struct TrackingUrlResponse {
    tracking_id: String,
    url: String,
}

async fn create_tracking_url(
    State(state): State<AppState>,
    Json(req): Json<TrackingUrlRequest>,
) -> Result<Json<TrackingUrlResponse>, AppError> {
    let start = req.start.trim();
    let end = req.end.trim();
    if start.is_empty() || end.is_empty() {
        return Err(AppError::BadRequest(
            "Both start and end destinations are required".to_string(),
        ));
    }
    if req.current.trim().is_empty() {
        return Err(AppError::BadRequest("Current position is required".to_string()));
    }

    let tracking_id = generate_tracking_id(start, end);
    let url = tracking_url(&state.config().public_base_url, &tracking_id, &req)?;

    tracing::info!("Generated tracking link {} ({} -> {})", tracking_id, start, end);

    Ok(Json(TrackingUrlResponse {
        tracking_id,
        url: url.to_string(),
    }))
}

fn tracking_url(base: &str, tracking_id: &str, req: &TrackingUrlRequest) -> Result<Url, AppError> {
    let mut url = Url::parse(base)
        .and_then(|origin| origin.join("/tracking"))
        .map_err(|err| AppError::Internal(format!("Invalid PUBLIC_BASE_URL: {}", err)))?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("id", tracking_id);
        query.append_pair("start", req.start.trim());
        for stop in req.stops.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            query.append_pair("stops", stop);
        }
        query.append_pair("end", req.end.trim());
        query.append_pair("current", req.current.trim());
    }

    Ok(url)
}
