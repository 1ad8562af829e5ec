use crate::domain::forecast::{CongestionDriver, ForecastBucket};
use crate::domain::params::ForecastParams;
use crate::domain::terminal::{TerminalLimits, TerminalProfile};

pub const MAX_DRIVERS: usize = 3;

const OUTSIDE_WEIGHT: f64 = 30.0;
const INSIDE_WEIGHT: f64 = 25.0;
const BAY_WEIGHT: f64 = 25.0;
const TURNAROUND_WEIGHT: f64 = 20.0;
/// Turnaround at or below this contributes nothing to the score.
const TURNAROUND_FLOOR_MIN: f64 = 60.0;
/// Turnaround span over which the turnaround component ramps to full.
const TURNAROUND_RAMP_MIN: f64 = 120.0;

/// Worst values across the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeakMetrics {
    pub outside: f64,
    pub inside: f64,
    pub occupancy_pct: f64,
    pub turnaround_min: f64,
}

impl PeakMetrics {
    pub fn from_buckets(buckets: &[ForecastBucket]) -> Self {
        buckets.iter().fold(Self::default(), |peak, bucket| Self {
            outside: peak.outside.max(bucket.queue_outside),
            inside: peak.inside.max(bucket.queue_inside),
            occupancy_pct: peak.occupancy_pct.max(f64::from(bucket.bay_occupancy_pct)),
            turnaround_min: peak.turnaround_min.max(f64::from(bucket.avg_turnaround_minutes)),
        })
    }
}

/// Weighted, capped sum of the four peak components, 0-100.
pub fn congestion_score(peaks: &PeakMetrics, limits: &TerminalLimits) -> u32 {
    let outside = (peaks.outside / limits.outside_divisor()).min(1.0) * OUTSIDE_WEIGHT;
    let inside = (peaks.inside / limits.inside_divisor()).min(1.0) * INSIDE_WEIGHT;
    let bays = (peaks.occupancy_pct / 100.0).min(1.0) * BAY_WEIGHT;
    let turnaround = ((peaks.turnaround_min - TURNAROUND_FLOOR_MIN) / TURNAROUND_RAMP_MIN)
        .max(0.0)
        .min(1.0)
        * TURNAROUND_WEIGHT;

    (outside + inside + bays + turnaround).round().clamp(0.0, 100.0) as u32
}

fn contribution(value: f64) -> u32 {
    value.round().clamp(0.0, 100.0) as u32
}

/// Evaluates every driver rule and keeps the strongest three.
///
/// Ties keep rule order.
pub fn congestion_drivers(
    peaks: &PeakMetrics,
    params: &ForecastParams,
    limits: &TerminalLimits,
    profile: &TerminalProfile,
) -> Vec<CongestionDriver> {
    let mut drivers = Vec::new();

    if params.docs_delay_pct > 10.0 {
        drivers.push(CongestionDriver {
            factor: "Documentation Delays".to_string(),
            contribution_pct: contribution(params.docs_delay_pct * 2.0),
            detail: format!(
                "{}% of trucks face doc holds (~{} min each). Pre-clear docs to cut turnaround.",
                params.docs_delay_pct, profile.docs_delayed_min
            ),
        });
    }

    if peaks.outside > limits.outside() * 0.55 {
        drivers.push(CongestionDriver {
            factor: "Outside Queue Pressure".to_string(),
            contribution_pct: contribution(peaks.outside / limits.outside_divisor() * 100.0),
            detail: format!(
                "Queue peaks at {:.1} trucks vs. {}-truck limit outside the gate.",
                peaks.outside, limits.outside_queue_limit
            ),
        });
    }

    if peaks.occupancy_pct > 70.0 {
        drivers.push(CongestionDriver {
            factor: "Bay Saturation".to_string(),
            contribution_pct: contribution(peaks.occupancy_pct),
            detail: format!(
                "All {} bays are {}% occupied at peak, leaving no buffer for changeover or delays.",
                limits.total_bays, peaks.occupancy_pct
            ),
        });
    }

    if peaks.inside > limits.inside() * 0.55 {
        drivers.push(CongestionDriver {
            factor: "Inside Yard Congestion".to_string(),
            contribution_pct: contribution(peaks.inside / limits.inside_divisor() * 100.0),
            detail: format!(
                "Yard peaks at {:.1} trucks vs. {}-truck inside limit.",
                peaks.inside, limits.inside_yard_limit
            ),
        });
    }

    if params.rejection_pct > 20.0 {
        drivers.push(CongestionDriver {
            factor: "High Gate Rejection".to_string(),
            contribution_pct: contribution(params.rejection_pct * 2.0),
            detail: format!(
                "{}% rejection at gate wastes slot capacity and creates re-booking pressure.",
                params.rejection_pct
            ),
        });
    }

    // sort_by is stable
    drivers.sort_by(|a, b| b.contribution_pct.cmp(&a.contribution_pct));
    drivers.truncate(MAX_DRIVERS);
    drivers
}
