use std::time::Duration;

pub const DEMO_TRACKING_ID: &str = "US-DXB-KR-123";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub session_ttl: Duration,
    pub public_base_url: String,
    pub demo_tracking_id: String,
    pub mapbox_access_token: Option<String>,
    /// Simulated transit time per kilometre for routes built from links.
    pub ms_per_km: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            session_ttl: Duration::from_secs(3600),
            public_base_url: "http://localhost:3000".to_string(),
            demo_tracking_id: DEMO_TRACKING_ID.to_string(),
            mapbox_access_token: None,
            ms_per_km: 20.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let session_ttl = std::env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.session_ttl);

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.public_base_url);

        let demo_tracking_id = std::env::var("DEMO_TRACKING_ID")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.demo_tracking_id);

        let mapbox_access_token = std::env::var("MAPBOX_ACCESS_TOKEN")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let ms_per_km = std::env::var("MS_PER_KM")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(defaults.ms_per_km);

        Self {
            port,
            session_ttl,
            public_base_url,
            demo_tracking_id,
            mapbox_access_token,
            ms_per_km,
        }
    }
}
