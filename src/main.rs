use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voyage_rs::{config, state};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voyage_rs=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();
    let state = state::AppState::new(config.clone());

    if config.mapbox_access_token.is_none() {
        tracing::info!("MAPBOX_ACCESS_TOKEN not set, resolving waypoints from the built-in gazetteer");
    }

    // Start session eviction task
    let eviction_state = state.clone();
    let eviction_ttl = config.session_ttl;
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await; // Every 5 minutes
            eviction_state.evict_expired(eviction_ttl);
        }
    });

    // Static frontend, if one is deployed next to the binary
    let app = voyage_rs::app_with_static_dir(state, "assets/web");

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Voyage tracker listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Track: POST http://{}/api/tracking", addr);
    tracing::info!("Admin links: POST http://{}/api/admin/tracking-url", addr);

    axum::serve(listener, app).await.unwrap();
}
