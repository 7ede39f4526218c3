use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("No match for place name: {0}")]
    NotFound(String),
    #[error("Geocoding request failed: {0}")]
    Request(String),
    #[error("Unexpected geocoder response: {0}")]
    InvalidResponse(String),
}

impl GeocodeError {
    /// True when the geocoder itself could not be reached or understood, as
    /// opposed to a name it has no answer for.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, GeocodeError::NotFound(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Segment {index} has invalid duration {duration}")]
    InvalidDuration { index: usize, duration: f64 },
    #[error("Total route duration is not finite")]
    UnboundedTotal,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid tracking ID. Please try again.")]
    InvalidTrackingId(String),
    #[error("Tracking session not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Invalid route: {0}")]
    Route(#[from] RouteError),
    #[error("Geocoder unavailable: {0}")]
    Geocode(#[from] GeocodeError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidTrackingId(_) | AppError::BadRequest(_) | AppError::Route(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Geocode(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
