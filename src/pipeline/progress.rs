use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pipeline::locate::{current_leg, locate, JOURNEY_COMPLETE};
use crate::types::route::{Route, VoyageSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingPhase {
    Idle,
    Tracking,
    Arrived,
}

impl TrackingPhase {
    pub fn for_progress(progress: f64) -> Self {
        if progress >= 1.0 {
            TrackingPhase::Arrived
        } else {
            TrackingPhase::Tracking
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopState {
    Completed,
    Current,
    Upcoming,
}

/// One line of the voyage plan shown beside the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanStop {
    pub name: String,
    pub state: StopState,
}

/// Distinct stops of `route` in the order first reached, each marked against
/// the ship's progress. The stop being sailed to is `Current`; any stop
/// already passed on an earlier leg is `Completed`, even when the route
/// returns to it later. On arrival every stop is `Completed`.
pub fn voyage_plan(route: &Route, progress: f64) -> Vec<PlanStop> {
    let waypoints = route.waypoints();
    let mut names: Vec<&str> = Vec::new();
    for location in &waypoints {
        if !names.contains(&location.name.as_str()) {
            names.push(location.name.as_str());
        }
    }

    let leg = current_leg(route, progress).map(|(index, _)| index);
    let heading_to = leg.map(|index| route.segments()[index].end.name.as_str());
    // Waypoints up to and including the start of the current leg are behind us.
    let passed = match leg {
        Some(index) => &waypoints[..=index],
        None => &waypoints[..],
    };

    names
        .into_iter()
        .map(|name| {
            let state = if Some(name) == heading_to {
                StopState::Current
            } else if passed.iter().any(|location| location.name == name) {
                StopState::Completed
            } else {
                StopState::Upcoming
            };
            PlanStop {
                name: name.to_string(),
                state,
            }
        })
        .collect()
}

/// Fraction of the voyage covered after `elapsed_ms`, capped at 1.
pub fn progress_from_elapsed(elapsed_ms: f64, total_ms: f64) -> f64 {
    if total_ms <= f64::EPSILON {
        return 1.0;
    }
    (elapsed_ms / total_ms).clamp(0.0, 1.0)
}

/// A running voyage. Position is recomputed from the wall clock on every
/// read; nothing here is advanced incrementally.
#[derive(Debug, Clone)]
pub struct TrackingSession {
    pub tracking_id: String,
    pub route: Route,
    pub started_at: DateTime<Utc>,
    /// Simulated time already behind the ship when tracking began.
    pub start_offset_ms: f64,
    /// Free-text position reported by the operator, if it did not match a
    /// waypoint.
    pub reported_position: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReading {
    pub phase: TrackingPhase,
    pub progress: f64,
    pub elapsed_ms: f64,
    pub total_duration_ms: f64,
    #[serde(flatten)]
    pub snapshot: VoyageSnapshot,
    /// Percentage through the current leg, for the progress bar.
    pub leg_percent: f64,
    pub voyage_plan: Vec<PlanStop>,
}

impl TrackingSession {
    pub fn new(tracking_id: impl Into<String>, route: Route, started_at: DateTime<Utc>) -> Self {
        Self {
            tracking_id: tracking_id.into(),
            route,
            started_at,
            start_offset_ms: 0.0,
            reported_position: None,
        }
    }

    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> f64 {
        let wall = (now - self.started_at).num_milliseconds().max(0) as f64;
        wall + self.start_offset_ms
    }

    pub fn progress_at(&self, now: DateTime<Utc>) -> f64 {
        progress_from_elapsed(self.elapsed_ms(now), self.route.total_duration())
    }

    pub fn read_at(&self, now: DateTime<Utc>) -> SessionReading {
        if self.route.is_empty() {
            return SessionReading {
                phase: TrackingPhase::Idle,
                progress: 0.0,
                elapsed_ms: 0.0,
                total_duration_ms: 0.0,
                snapshot: locate(&self.route, 0.0),
                leg_percent: 0.0,
                voyage_plan: Vec::new(),
            };
        }

        let elapsed_ms = self.elapsed_ms(now);
        let total_duration_ms = self.route.total_duration();
        let progress = progress_from_elapsed(elapsed_ms, total_duration_ms);
        let phase = TrackingPhase::for_progress(progress);

        let mut snapshot = locate(&self.route, progress);
        if phase == TrackingPhase::Arrived {
            let final_destination = self
                .route
                .destination()
                .map(|location| location.name.as_str())
                .filter(|name| !name.is_empty())
                .unwrap_or("final destination");
            snapshot.current_status = format!("Shipment has arrived at {}.", final_destination);
            snapshot.next_destination = JOURNEY_COMPLETE.to_string();
        }

        let leg_percent = if phase == TrackingPhase::Arrived {
            100.0
        } else {
            snapshot.segment_progress * 100.0
        };

        SessionReading {
            phase,
            progress,
            elapsed_ms: elapsed_ms.min(total_duration_ms),
            total_duration_ms,
            snapshot,
            leg_percent,
            voyage_plan: voyage_plan(&self.route, progress),
        }
    }
}
