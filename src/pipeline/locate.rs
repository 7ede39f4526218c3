use crate::types::route::{chord_heading, Route, ShipPosition, VoyageSnapshot};

pub const NO_ROUTE_STATUS: &str = "No route data";
pub const JOURNEY_COMPLETE: &str = "Journey complete";

pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start * (1.0 - t) + end * t
}

/// Places the ship on `route` after `progress` (0..=1) of the total voyage
/// time. Callers clamp `progress`; an empty route yields a placeholder
/// snapshot without a position.
///
/// An elapsed time landing exactly on a segment boundary is attributed to
/// the segment ending there.
pub fn locate(route: &Route, progress: f64) -> VoyageSnapshot {
    if route.is_empty() {
        return VoyageSnapshot {
            position: None,
            current_status: NO_ROUTE_STATUS.to_string(),
            next_destination: "N/A".to_string(),
            segment_progress: 0.0,
        };
    }

    if let Some((index, segment_progress)) = current_leg(route, progress) {
        let segment = &route.segments()[index];
        let (start, end) = (&segment.start, &segment.end);

        return VoyageSnapshot {
            position: Some(ShipPosition {
                x: lerp(start.lng, end.lng, segment_progress),
                y: lerp(start.lat, end.lat, segment_progress),
                angle: chord_heading(start, end),
            }),
            current_status: format!("In transit to {}", end.name),
            next_destination: format!("Next stop: {}", end.name),
            segment_progress,
        };
    }

    arrived(route)
}

/// Index of the leg under way after `progress` of the voyage, with the
/// fraction of that leg covered. `None` once the ship has arrived or when
/// there is no route.
pub fn current_leg(route: &Route, progress: f64) -> Option<(usize, f64)> {
    if progress >= 1.0 {
        return None;
    }
    let elapsed = route.total_duration() * progress;
    let mut accumulated = 0.0;
    for (index, segment) in route.segments().iter().enumerate() {
        let segment_end = accumulated + segment.duration;
        if elapsed <= segment_end {
            let segment_progress = if segment.duration > 0.0 {
                (elapsed - accumulated) / segment.duration
            } else {
                1.0
            };
            return Some((index, segment_progress));
        }
        accumulated = segment_end;
    }
    None
}

fn arrived(route: &Route) -> VoyageSnapshot {
    let segments = route.segments();
    let last = &segments[segments.len() - 1];

    VoyageSnapshot {
        position: Some(ShipPosition {
            x: last.end.lng,
            y: last.end.lat,
            angle: arrival_heading(route),
        }),
        current_status: format!("Arrived at {}", last.end.name),
        next_destination: JOURNEY_COMPLETE.to_string(),
        segment_progress: 1.0,
    }
}

/// Direction of the final leg; a zero-length final leg defers to the latest
/// earlier leg that actually moved.
fn arrival_heading(route: &Route) -> f64 {
    route
        .segments()
        .iter()
        .rev()
        .find_map(|segment| segment.heading())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::route::{known_locations, Location, RouteSegment};

    const EPS: f64 = 1e-9;

    fn usa_dubai_korea() -> Route {
        let ports = known_locations();
        Route::new(vec![
            RouteSegment::new(ports.usa.clone(), ports.dubai.clone(), 40.0),
            RouteSegment::new(ports.dubai, ports.korea, 20.0),
        ])
    }

    fn position(snapshot: &VoyageSnapshot) -> ShipPosition {
        snapshot.position.expect("position")
    }

    #[test]
    fn empty_route_returns_placeholder() {
        let snapshot = locate(&Route::default(), 0.3);
        assert_eq!(snapshot.position, None);
        assert_eq!(snapshot.current_status, "No route data");
        assert_eq!(snapshot.next_destination, "N/A");
        assert_eq!(snapshot.segment_progress, 0.0);
    }

    #[test]
    fn departure_sits_on_first_start() {
        let route = usa_dubai_korea();
        let snapshot = locate(&route, 0.0);
        let pos = position(&snapshot);
        assert_eq!((pos.x, pos.y), (-122.3321, 47.6062));
        assert_eq!(snapshot.segment_progress, 0.0);
        assert_eq!(snapshot.current_status, "In transit to Dubai, UAE");
    }

    #[test]
    fn full_progress_is_arrival() {
        let route = usa_dubai_korea();
        let snapshot = locate(&route, 1.0);
        let pos = position(&snapshot);
        assert_eq!((pos.x, pos.y), (129.0756, 35.1796));
        assert_eq!(snapshot.segment_progress, 1.0);
        assert_eq!(snapshot.current_status, "Arrived at Busan, South Korea");
        assert_eq!(snapshot.next_destination, "Journey complete");
    }

    #[test]
    fn halfway_is_three_quarters_through_first_leg() {
        let route = usa_dubai_korea();
        let snapshot = locate(&route, 0.5);
        let pos = position(&snapshot);
        assert!((snapshot.segment_progress - 0.75).abs() < EPS);
        assert!((pos.x - lerp(-122.3321, 55.2708, 0.75)).abs() < EPS);
        assert!((pos.y - lerp(47.6062, 25.2048, 0.75)).abs() < EPS);
        assert_eq!(snapshot.current_status, "In transit to Dubai, UAE");
        assert_eq!(snapshot.next_destination, "Next stop: Dubai, UAE");
    }

    #[test]
    fn ninety_percent_is_on_second_leg() {
        let route = usa_dubai_korea();
        let snapshot = locate(&route, 0.9);
        assert!((snapshot.segment_progress - 0.7).abs() < EPS);
        assert_eq!(snapshot.current_status, "In transit to Busan, South Korea");
    }

    #[test]
    fn exact_boundary_belongs_to_the_ending_segment() {
        let a = Location::new("A", 0.0, 0.0);
        let b = Location::new("B", 10.0, 0.0);
        let c = Location::new("C", 10.0, 10.0);
        let route = Route::new(vec![
            RouteSegment::new(a, b.clone(), 30.0),
            RouteSegment::new(b, c, 10.0),
        ]);

        let snapshot = locate(&route, 30.0 / 40.0);
        assert_eq!(snapshot.current_status, "In transit to B");
        assert_eq!(snapshot.segment_progress, 1.0);
        let pos = position(&snapshot);
        assert_eq!((pos.x, pos.y, pos.angle), (10.0, 0.0, 0.0));

        let just_after = locate(&route, 0.76);
        assert_eq!(just_after.current_status, "In transit to C");
    }

    #[test]
    fn heading_follows_the_chord() {
        let route = Route::new(vec![RouteSegment::new(
            Location::new("A", 0.0, 0.0),
            Location::new("B", 0.0, 5.0),
            10.0,
        )]);
        let pos = position(&locate(&route, 0.2));
        assert!((pos.angle - 90.0).abs() < EPS);
    }

    #[test]
    fn zero_duration_segment_counts_as_complete() {
        let a = Location::new("A", 0.0, 0.0);
        let b = Location::new("B", 4.0, 4.0);
        let route = Route::new(vec![
            RouteSegment::new(a.clone(), b, 0.0),
            RouteSegment::new(a.clone(), a, 0.0),
        ]);
        let snapshot = locate(&route, 0.0);
        assert_eq!(snapshot.segment_progress, 1.0);
        assert_eq!(snapshot.current_status, "In transit to B");
    }

    #[test]
    fn progress_beyond_one_still_arrives() {
        let snapshot = locate(&usa_dubai_korea(), 1.7);
        assert_eq!(snapshot.next_destination, JOURNEY_COMPLETE);
    }

    #[test]
    fn arrival_heading_uses_final_leg() {
        let pos = position(&locate(&usa_dubai_korea(), 1.0));
        let ports = known_locations();
        assert!((pos.angle - chord_heading(&ports.dubai, &ports.korea)).abs() < EPS);
    }

    #[test]
    fn arrival_heading_skips_zero_length_final_leg() {
        let a = Location::new("A", 0.0, 0.0);
        let b = Location::new("B", -3.0, 0.0);
        let route = Route::new(vec![
            RouteSegment::new(a, b.clone(), 10.0),
            RouteSegment::new(b.clone(), b, 5.0),
        ]);
        let pos = position(&locate(&route, 1.0));
        assert!((pos.angle - 180.0).abs() < EPS);
    }

    #[test]
    fn single_stationary_leg_arrives_facing_east() {
        let here = Location::new("Here", 2.0, 2.0);
        let route = Route::new(vec![RouteSegment::new(here.clone(), here, 10.0)]);
        assert_eq!(position(&locate(&route, 1.0)).angle, 0.0);
    }

    /// Distance along the polyline of `route` to the point nearest `pos`.
    fn distance_along(route: &Route, pos: &ShipPosition) -> f64 {
        let mut covered = 0.0;
        let mut best = (f64::INFINITY, 0.0);
        for segment in route.segments() {
            let (ax, ay) = (segment.start.lng, segment.start.lat);
            let (dx, dy) = (segment.end.lng - ax, segment.end.lat - ay);
            let length = dx.hypot(dy);
            let u = if length > 0.0 {
                (((pos.x - ax) * dx + (pos.y - ay) * dy) / (length * length)).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let gap = (ax + u * dx - pos.x).hypot(ay + u * dy - pos.y);
            if gap < best.0 {
                best = (gap, covered + u * length);
            }
            covered += length;
        }
        assert!(best.0 < 1e-9, "({}, {}) is off the route", pos.x, pos.y);
        best.1
    }

    #[test]
    fn ship_advances_along_the_polyline_without_jumps() {
        // Zig-zag with uneven pace so time and distance disagree.
        let a = Location::new("A", 0.0, 0.0);
        let b = Location::new("B", 10.0, 5.0);
        let c = Location::new("C", 20.0, -5.0);
        let d = Location::new("D", 35.0, 0.0);
        let route = Route::new(vec![
            RouteSegment::new(a, b.clone(), 3.0),
            RouteSegment::new(b, c.clone(), 1.0),
            RouteSegment::new(c, d, 6.0),
        ]);
        let total_length: f64 = route
            .segments()
            .iter()
            .map(|s| (s.end.lng - s.start.lng).hypot(s.end.lat - s.start.lat))
            .sum();
        let top_speed = route
            .segments()
            .iter()
            .map(|s| (s.end.lng - s.start.lng).hypot(s.end.lat - s.start.lat) / s.duration)
            .fold(0.0, f64::max);

        // 300 steps put samples exactly on both inner boundaries (0.3, 0.4).
        let steps = 300;
        let max_step = top_speed * route.total_duration() / steps as f64 + 1e-9;
        let mut previous: Option<(ShipPosition, f64)> = None;
        for step in 0..=steps {
            let progress = step as f64 / steps as f64;
            let pos = position(&locate(&route, progress));
            let along = distance_along(&route, &pos);

            if let Some((last, last_along)) = previous {
                assert!(along + 1e-9 >= last_along, "moved backwards at {progress}");
                assert!(along - last_along <= max_step, "skipped ahead at {progress}");
                let jump = (pos.x - last.x).hypot(pos.y - last.y);
                assert!(jump <= max_step, "jumped {jump} at {progress}");
            } else {
                assert!(along.abs() < EPS);
            }
            previous = Some((pos, along));
        }
        let (_, final_along) = previous.expect("samples");
        assert!((final_along - total_length).abs() < 1e-9);
    }

    #[test]
    fn default_route_position_is_continuous() {
        let route = crate::types::route::default_route();
        let top_speed = route
            .segments()
            .iter()
            .map(|s| (s.end.lng - s.start.lng).hypot(s.end.lat - s.start.lat) / s.duration)
            .fold(0.0, f64::max);
        let steps = 1_000;
        let max_step = top_speed * route.total_duration() / steps as f64 + 1e-9;

        let mut last = position(&locate(&route, 0.0));
        for step in 1..=steps {
            let pos = position(&locate(&route, step as f64 / steps as f64));
            let jump = (pos.x - last.x).hypot(pos.y - last.y);
            assert!(jump <= max_step, "jumped {jump} at step {step}");
            last = pos;
        }
    }
}
