use serde::{Deserialize, Serialize};

use crate::error::RouteError;

/// A named waypoint. `lng`/`lat` are degrees, or percentages of the map
/// canvas after [`Route::to_percent_space`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lng: f64,
    pub lat: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, lng: f64, lat: f64) -> Self {
        Self {
            name: name.into(),
            lng,
            lat,
        }
    }

    pub fn same_point(&self, other: &Location) -> bool {
        self.lng == other.lng && self.lat == other.lat
    }
}

/// One leg of a voyage. `duration` is in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub start: Location,
    pub end: Location,
    pub duration: f64,
}

impl RouteSegment {
    pub fn new(start: Location, end: Location, duration: f64) -> Self {
        Self {
            start,
            end,
            duration,
        }
    }

    /// Heading of the straight chord from start to end, in degrees,
    /// counter-clockwise from +x. `None` for a zero-length segment.
    pub fn heading(&self) -> Option<f64> {
        if self.start.same_point(&self.end) {
            return None;
        }
        Some(chord_heading(&self.start, &self.end))
    }
}

pub fn chord_heading(from: &Location, to: &Location) -> f64 {
    (to.lat - from.lat).atan2(to.lng - from.lng).to_degrees()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route {
    segments: Vec<RouteSegment>,
}

impl Route {
    pub fn new(segments: Vec<RouteSegment>) -> Self {
        Self { segments }
    }

    /// Chains consecutive waypoints into segments, timing each leg with
    /// `duration_of`.
    pub fn from_waypoints<F>(waypoints: &[Location], mut duration_of: F) -> Self
    where
        F: FnMut(&Location, &Location) -> f64,
    {
        let segments = waypoints
            .windows(2)
            .map(|pair| {
                let duration = duration_of(&pair[0], &pair[1]).max(0.0);
                RouteSegment::new(pair[0].clone(), pair[1].clone(), duration)
            })
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|segment| segment.duration).sum()
    }

    /// Rejects routes the calculator cannot walk: every duration must be a
    /// finite non-negative number and so must their sum.
    pub fn validate(&self) -> Result<(), RouteError> {
        if let Some((index, segment)) = self
            .segments
            .iter()
            .enumerate()
            .find(|(_, segment)| !segment.duration.is_finite() || segment.duration < 0.0)
        {
            return Err(RouteError::InvalidDuration {
                index,
                duration: segment.duration,
            });
        }
        if !self.total_duration().is_finite() {
            return Err(RouteError::UnboundedTotal);
        }
        Ok(())
    }

    pub fn origin(&self) -> Option<&Location> {
        self.segments.first().map(|segment| &segment.start)
    }

    pub fn destination(&self) -> Option<&Location> {
        self.segments.last().map(|segment| &segment.end)
    }

    /// Every segment start plus the final end, as `[lng, lat]` pairs.
    pub fn polyline(&self) -> Vec<[f64; 2]> {
        let mut coordinates: Vec<[f64; 2]> = self
            .segments
            .iter()
            .map(|segment| [segment.start.lng, segment.start.lat])
            .collect();
        if let Some(end) = self.destination() {
            coordinates.push([end.lng, end.lat]);
        }
        coordinates
    }

    /// Milliseconds from departure until the ship reaches the waypoint at
    /// `index` in the chain `start[0], end[0], end[1], ...`.
    pub fn offset_of_waypoint(&self, index: usize) -> f64 {
        self.segments
            .iter()
            .take(index)
            .map(|segment| segment.duration)
            .sum()
    }

    /// Waypoints in travel order: the first start followed by every end.
    pub fn waypoints(&self) -> Vec<&Location> {
        let mut points = Vec::with_capacity(self.segments.len() + 1);
        if let Some(origin) = self.origin() {
            points.push(origin);
        }
        points.extend(self.segments.iter().map(|segment| &segment.end));
        points
    }

    /// Equirectangular projection onto a 0-100 canvas with y growing
    /// downwards, for renderers that position the ship by percentage.
    pub fn to_percent_space(&self) -> Route {
        let project = |location: &Location| {
            Location::new(
                location.name.clone(),
                (location.lng + 180.0) / 360.0 * 100.0,
                (90.0 - location.lat) / 180.0 * 100.0,
            )
        };
        Route::new(
            self.segments
                .iter()
                .map(|segment| {
                    RouteSegment::new(project(&segment.start), project(&segment.end), segment.duration)
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipPosition {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoyageSnapshot {
    pub position: Option<ShipPosition>,
    pub current_status: String,
    pub next_destination: String,
    pub segment_progress: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSpace {
    #[default]
    LngLat,
    Percent,
}

impl CoordinateSpace {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lnglat" | "lng_lat" | "geo" => Some(CoordinateSpace::LngLat),
            "percent" | "pct" => Some(CoordinateSpace::Percent),
            _ => None,
        }
    }
}

pub struct KnownLocations {
    pub usa: Location,
    pub dubai: Location,
    pub korea: Location,
}

pub fn known_locations() -> KnownLocations {
    KnownLocations {
        usa: Location::new("Seattle, USA", -122.3321, 47.6062),
        dubai: Location::new("Dubai, UAE", 55.2708, 25.2048),
        korea: Location::new("Busan, South Korea", 129.0756, 35.1796),
    }
}

/// The demo voyage: Seattle to Dubai across the Pacific and Indian Ocean,
/// then back east to Busan.
pub fn default_route() -> Route {
    let ports = known_locations();
    let north_pacific = Location::new("N. Pacific", -140.0, 45.0);
    let aleutians = Location::new("Aleutian Islands", 178.0, 52.0);
    let east_of_japan = Location::new("East of Japan", 155.0, 35.0);
    let south_china_sea = Location::new("S. China Sea", 118.0, 20.0);
    let malacca = Location::new("Strait of Malacca", 100.0, 4.0);
    let sri_lanka = Location::new("South of Sri Lanka", 80.0, 5.0);
    let arabian_sea = Location::new("Arabian Sea", 65.0, 18.0);

    let legs = [
        (&ports.usa, &north_pacific, 120_000.0),
        (&north_pacific, &aleutians, 80_000.0),
        (&aleutians, &east_of_japan, 60_000.0),
        (&east_of_japan, &south_china_sea, 50_000.0),
        (&south_china_sea, &malacca, 40_000.0),
        (&malacca, &sri_lanka, 50_000.0),
        (&sri_lanka, &arabian_sea, 50_000.0),
        (&arabian_sea, &ports.dubai, 50_000.0),
        (&ports.dubai, &arabian_sea, 50_000.0),
        (&arabian_sea, &sri_lanka, 50_000.0),
        (&sri_lanka, &malacca, 50_000.0),
        (&malacca, &south_china_sea, 60_000.0),
        (&south_china_sea, &east_of_japan, 100_000.0),
        (&east_of_japan, &ports.korea, 190_000.0),
    ];

    Route::new(
        legs.into_iter()
            .map(|(start, end, duration)| RouteSegment::new(start.clone(), end.clone(), duration))
            .collect(),
    )
}
