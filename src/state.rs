use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::pipeline::geocode::Geocoder;
use crate::pipeline::progress::TrackingSession;

#[derive(Clone)]
pub struct AppState {
    sessions: Arc<DashMap<String, TrackingSession>>,
    config: Arc<Config>,
    geocoder: Arc<Geocoder>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let geocoder = Geocoder::from_token(config.mapbox_access_token.as_deref());
        Self::with_geocoder(config, geocoder)
    }

    pub fn with_geocoder(config: Config, geocoder: Geocoder) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            config: Arc::new(config),
            geocoder: Arc::new(geocoder),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn geocoder(&self) -> &Geocoder {
        &self.geocoder
    }

    pub fn insert(&self, session_id: String, session: TrackingSession) {
        self.sessions.insert(session_id, session);
    }

    pub fn get(&self, session_id: &str) -> Option<TrackingSession> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, session_id: &str) -> Option<TrackingSession> {
        self.sessions.remove(session_id).map(|(_, session)| session)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn evict_expired(&self, ttl: Duration) {
        let now = Utc::now();
        let ttl_ms = ttl.as_millis().min(i64::MAX as u128) as i64;
        self.sessions.retain(|_, session| {
            (now - session.started_at).num_milliseconds() < ttl_ms
        });
        tracing::info!("Session eviction complete. Current size: {}", self.sessions.len());
    }
}
