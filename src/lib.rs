pub mod config;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod types;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// All API routes with the shared layers, ready to serve.
pub fn app(state: state::AppState) -> Router {
    with_layers(api_routes(), state)
}

/// The API plus a static frontend served from `dir` for every other path,
/// falling back to its `index.html`. The fallback sits inside the CORS and
/// trace layers like any API route.
pub fn app_with_static_dir(state: state::AppState, dir: &str) -> Router {
    let serve_dir = ServeDir::new(dir)
        .not_found_service(ServeFile::new(format!("{}/index.html", dir.trim_end_matches('/'))));
    with_layers(api_routes().fallback_service(serve_dir), state)
}

fn api_routes() -> Router<state::AppState> {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::voyage::router())
        .merge(routes::admin::router())
        .merge(routes::tracking::router())
}

fn with_layers(routes: Router<state::AppState>, state: state::AppState) -> Router {
    routes
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
