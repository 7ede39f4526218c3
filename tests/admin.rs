use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use voyage_rs::{config::Config, routes, state::AppState};

fn app() -> Router {
    let mut config = Config::default();
    config.public_base_url = "https://un-shipping.example".to_string();
    let state = AppState::new(config);
    Router::new()
        .merge(routes::admin::router())
        .merge(routes::tracking::router())
        .with_state(state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn generates_tracking_id_and_shareable_link() {
    let response = app()
        .oneshot(post_json(
            "/api/admin/tracking-url",
            serde_json::json!({
                "start": "Seattle",
                "stops": ["Dubai", ""],
                "end": "Busan",
                "current": "In transit to Dubai"
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: Value = serde_json::from_slice(&body).expect("json");

    let tracking_id = json["tracking_id"].as_str().expect("tracking id");
    assert!(tracking_id.starts_with("SE-BU-"));
    let suffix: u16 = tracking_id[6..].parse().expect("numeric suffix");
    assert!((100..=999).contains(&suffix));

    let url = json["url"].as_str().expect("url");
    assert!(url.starts_with("https://un-shipping.example/tracking?id=SE-BU-"));
    assert!(url.ends_with("&start=Seattle&stops=Dubai&end=Busan&current=In+transit+to+Dubai"));
}

#[tokio::test]
async fn missing_end_destination_is_rejected() {
    let response = app()
        .oneshot(post_json(
            "/api/admin/tracking-url",
            serde_json::json!({ "start": "Seattle", "end": "   ", "current": "At berth" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn current_position_is_required() {
    let missing = app()
        .oneshot(post_json(
            "/api/admin/tracking-url",
            serde_json::json!({ "start": "Seattle", "end": "Busan" }),
        ))
        .await
        .expect("response");
    assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let blank = app()
        .oneshot(post_json(
            "/api/admin/tracking-url",
            serde_json::json!({ "start": "Seattle", "end": "Busan", "current": "  " }),
        ))
        .await
        .expect("response");
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generated_link_opens_a_session() {
    let app = app();
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/admin/tracking-url",
            serde_json::json!({ "start": "Dubai", "end": "Busan", "current": "Leaving Dubai" }),
        ))
        .await
        .expect("response");
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: Value = serde_json::from_slice(&body).expect("json");
    let url = json["url"].as_str().expect("url");
    let query = url.split_once('?').map(|(_, q)| q).expect("query");

    let tracked = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/tracking/link?{query}"))
                .method("GET")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(tracked.status(), StatusCode::OK);
    let body = to_bytes(tracked.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: Value = serde_json::from_slice(&body).expect("json");
    assert!(json["tracking_id"].as_str().expect("tracking id").starts_with("DU-BU-"));
    assert_eq!(json["current_status"], "In transit to Busan");
}
