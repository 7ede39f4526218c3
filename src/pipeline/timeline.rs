use rayon::prelude::*;
use serde::Serialize;

use crate::pipeline::locate::locate;
use crate::types::route::{Route, VoyageSnapshot};

pub const MIN_SAMPLES: usize = 2;
pub const MAX_SAMPLES: usize = 500;

#[derive(Debug, Clone, Serialize)]
pub struct TimelineSample {
    pub progress: f64,
    pub elapsed_ms: f64,
    #[serde(flatten)]
    pub snapshot: VoyageSnapshot,
}

/// Evenly spaced snapshots from departure to arrival, inclusive.
pub fn timeline(route: &Route, samples: usize) -> Vec<TimelineSample> {
    let sample_count = samples.clamp(MIN_SAMPLES, MAX_SAMPLES);
    let total = route.total_duration();

    (0..sample_count)
        .into_par_iter()
        .map(|idx| {
            let progress = idx as f64 / (sample_count - 1) as f64;
            TimelineSample {
                progress,
                elapsed_ms: total * progress,
                snapshot: locate(route, progress),
            }
        })
        .collect()
}
