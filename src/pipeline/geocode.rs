use reqwest::Url;
use serde_json::Value;

use crate::error::GeocodeError;
use crate::types::route::{default_route, Location};

const MAPBOX_PLACES_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places/";

/// Resolves place names typed by an operator into coordinates. The returned
/// location keeps the name as typed so status lines read back what was
/// entered.
#[derive(Debug, Clone)]
pub enum Geocoder {
    Gazetteer(Gazetteer),
    Mapbox(MapboxGeocoder),
}

impl Geocoder {
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(token) => Geocoder::Mapbox(MapboxGeocoder::new(token)),
            None => Geocoder::Gazetteer(Gazetteer::builtin()),
        }
    }

    pub async fn resolve(&self, name: &str) -> Result<Location, GeocodeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GeocodeError::NotFound(String::new()));
        }
        match self {
            Geocoder::Gazetteer(gazetteer) => gazetteer.lookup(name),
            Geocoder::Mapbox(mapbox) => mapbox.lookup(name).await,
        }
    }
}

/// Fixed table of ports and sea areas.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: Vec<Location>,
}

impl Gazetteer {
    pub fn new(entries: Vec<Location>) -> Self {
        Self { entries }
    }

    pub fn builtin() -> Self {
        let route = default_route();
        let mut entries: Vec<Location> = Vec::new();
        for location in route.waypoints() {
            if !entries.iter().any(|known| known.name == location.name) {
                entries.push(location.clone());
            }
        }
        entries.extend([
            Location::new("Singapore", 103.8198, 1.3521),
            Location::new("Shanghai, China", 121.4737, 31.2304),
            Location::new("Rotterdam, Netherlands", 4.4777, 51.9244),
            Location::new("Hamburg, Germany", 9.9937, 53.5511),
            Location::new("Los Angeles, USA", -118.2437, 34.0522),
            Location::new("Tokyo, Japan", 139.6503, 35.6762),
            Location::new("Mumbai, India", 72.8777, 19.0760),
            Location::new("Suez, Egypt", 32.5498, 29.9668),
        ]);
        Self { entries }
    }

    /// Case-insensitive match on the full name, or on the part before the
    /// first comma ("Seattle" finds "Seattle, USA").
    pub fn lookup(&self, name: &str) -> Result<Location, GeocodeError> {
        let wanted = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|entry| {
                let full = entry.name.to_lowercase();
                let short = full.split(',').next().unwrap_or("").trim().to_string();
                full == wanted || short == wanted
            })
            .map(|entry| Location::new(name.trim(), entry.lng, entry.lat))
            .ok_or_else(|| GeocodeError::NotFound(name.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct MapboxGeocoder {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl MapboxGeocoder {
    pub fn new(access_token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.to_string(),
            base_url: MAPBOX_PLACES_URL.to_string(),
        }
    }

    /// Same API shape served from another origin (a proxy or a test double).
    pub fn with_base_url(access_token: &str, base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::new(access_token)
        }
    }

    fn request_url(&self, name: &str) -> Result<Url, GeocodeError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| GeocodeError::Request(format!("Bad geocoder URL: {}", err)))?;
        url.path_segments_mut()
            .map_err(|_| GeocodeError::Request("Geocoder URL cannot take a path".to_string()))?
            .pop_if_empty()
            .push(&format!("{}.json", name));
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token)
            .append_pair("limit", "1");
        Ok(url)
    }

    async fn lookup(&self, name: &str) -> Result<Location, GeocodeError> {
        let url = self.request_url(name)?;
        tracing::debug!("Geocoding '{}' via Mapbox", name);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| GeocodeError::Request(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Request(format!("{}: {}", status, body)));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| GeocodeError::InvalidResponse(err.to_string()))?;

        let (lng, lat) = first_feature_center(&payload)
            .ok_or_else(|| GeocodeError::NotFound(name.to_string()))?;
        Ok(Location::new(name, lng, lat))
    }
}

fn first_feature_center(payload: &Value) -> Option<(f64, f64)> {
    let center = payload
        .get("features")
        .and_then(Value::as_array)
        .and_then(|features| features.first())
        .and_then(|feature| feature.get("center"))
        .and_then(Value::as_array)?;
    let lng = center.first().and_then(Value::as_f64)?;
    let lat = center.get(1).and_then(Value::as_f64)?;
    Some((lng, lat))
}
