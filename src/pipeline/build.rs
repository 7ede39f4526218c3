use crate::error::GeocodeError;
use crate::pipeline::geocode::Geocoder;
use crate::types::route::{Location, Route};

/// Place names carried by a shareable tracking link.
#[derive(Debug, Clone, Default)]
pub struct WaypointNames {
    pub start: String,
    pub stops: Vec<String>,
    pub end: String,
    pub current: Option<String>,
}

impl WaypointNames {
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        let mut names = WaypointNames::default();
        for (key, value) in pairs {
            match key.as_str() {
                "start" => names.start = value.clone(),
                "stops" => names.stops.push(value.clone()),
                "end" => names.end = value.clone(),
                "current" => names.current = Some(value.clone()),
                _ => {}
            }
        }
        names
    }

    /// Start, non-blank stops, end, in travel order.
    pub fn ordered(&self) -> Vec<&str> {
        std::iter::once(self.start.as_str())
            .chain(
                self.stops
                    .iter()
                    .map(String::as_str)
                    .filter(|stop| !stop.trim().is_empty()),
            )
            .chain(std::iter::once(self.end.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct BuiltRoute {
    pub route: Route,
    pub dropped: Vec<String>,
}

/// Resolves every waypoint and chains the survivors into a route. Names the
/// geocoder cannot place are skipped, not retried. Fails only when the
/// geocoder was unreachable and too few waypoints survived to make a leg.
pub async fn build_route(
    names: &WaypointNames,
    geocoder: &Geocoder,
    ms_per_km: f64,
) -> Result<BuiltRoute, GeocodeError> {
    let mut resolved: Vec<Location> = Vec::new();
    let mut dropped = Vec::new();
    let mut outage = None;

    for name in names.ordered() {
        match geocoder.resolve(name).await {
            Ok(location) => resolved.push(location),
            Err(err) => {
                tracing::warn!("Dropping waypoint '{}': {}", name, err);
                dropped.push(name.to_string());
                if err.is_unavailable() {
                    outage = Some(err);
                }
            }
        }
    }

    if resolved.len() < 2 {
        if let Some(err) = outage {
            return Err(err);
        }
    }

    let route = Route::from_waypoints(&resolved, |from, to| {
        haversine_distance(from.lat, from.lng, to.lat, to.lng) * ms_per_km
    });

    Ok(BuiltRoute { route, dropped })
}

/// Index of the waypoint an operator's free-text position refers to. A
/// waypoint matches when its city ("Dubai" of "Dubai, UAE") appears in the
/// text as whole words, so "In transit to Dubai" finds Dubai but "a" finds
/// nothing.
pub fn match_waypoint(route: &Route, current: &str) -> Option<usize> {
    let said = words(current);
    if said.is_empty() {
        return None;
    }
    route
        .waypoints()
        .iter()
        .enumerate()
        .rev()
        .find(|(_, location)| {
            let city = words(location.name.split(',').next().unwrap_or(""));
            !city.is_empty() && said.windows(city.len()).any(|window| window == city.as_slice())
        })
        .map(|(index, _)| index)
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Simulated time at which the ship is halfway along the leg arriving at
/// waypoint `index`; the origin itself maps to departure.
pub fn offset_toward_waypoint(route: &Route, index: usize) -> f64 {
    match index.checked_sub(1).and_then(|leg| route.segments().get(leg)) {
        Some(leg) => route.offset_of_waypoint(index - 1) + leg.duration / 2.0,
        None => 0.0,
    }
}

pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const R: f64 = 6371.0; // Earth radius in km

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    R * c
}
