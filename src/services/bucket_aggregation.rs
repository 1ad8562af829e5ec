use chrono::{DateTime, Duration, FixedOffset};

use crate::domain::forecast::ForecastBucket;
use crate::domain::params::ForecastParams;
use crate::domain::terminal::{
    BUCKET_COUNT, BUCKET_MIN, TICKS_PER_BUCKET, TerminalLimits, TerminalProfile,
};
use crate::services::arrival_model::band_weights;
use crate::services::flow_simulation::SimulationTrace;

/// Share of a limit above which a bucket is flagged as overflowing.
pub const OVERFLOW_THRESHOLD: f64 = 0.80;

/// Rounds to one decimal place.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Expected gate-to-exit time for one truck given a queue wait.
///
/// Documentation time here is the delay-weighted blend of the normal and
/// delayed figures, unlike the clearance rate used while simulating.
pub fn avg_turnaround(params: &ForecastParams, profile: &TerminalProfile, queue_wait_min: f64) -> f64 {
    profile.weighbridge_min
        + profile.inspection_min
        + profile.blended_docs_min(params.docs_delay_fraction())
        + queue_wait_min
        + params.avg_loading_minutes
        + profile.exit_min
}

/// Capacity-pressure estimate of the wait for a bay. Zero while any bay
/// sits idle on average.
pub fn queue_wait_minutes(
    avg_loading: f64,
    avg_inside: f64,
    docs_estimate: f64,
    params: &ForecastParams,
    limits: &TerminalLimits,
) -> f64 {
    let idle_bays = (limits.bays() - avg_loading).max(0.0);
    if idle_bays > 0.0 {
        return 0.0;
    }
    ((avg_inside - docs_estimate).max(0.0) / limits.bays_divisor()) * params.avg_loading_minutes
}

/// `HH:MM–HH:MM` in the wall clock of `now`'s offset.
pub fn bucket_label(now: DateTime<FixedOffset>, start_min: u32, end_min: u32) -> String {
    let start = now + Duration::minutes(i64::from(start_min));
    let end = now + Duration::minutes(i64::from(end_min));
    format!("{}–{}", start.format("%H:%M"), end.format("%H:%M"))
}

/// Folds the 24-tick trace into the four output buckets.
///
/// Each bucket averages the 7 state snapshots on its boundaries (both ends
/// included) and sums the 6 tick outputs inside it. This is the only place
/// where values are rounded.
pub fn aggregate_buckets(
    trace: &SimulationTrace,
    now: DateTime<FixedOffset>,
    params: &ForecastParams,
    limits: &TerminalLimits,
    profile: &TerminalProfile,
    docs_estimate: f64,
) -> Vec<ForecastBucket> {
    let (early, on_time, late) = band_weights(params);

    (0..BUCKET_COUNT)
        .map(|bucket| {
            let start_tick = bucket * TICKS_PER_BUCKET;
            let end_tick = start_tick + TICKS_PER_BUCKET;
            let states = &trace.states[start_tick..=end_tick];
            let outputs = &trace.outputs[start_tick..end_tick];

            let n = states.len() as f64;
            let avg_outside = states.iter().map(|s| s.outside_queue).sum::<f64>() / n;
            let avg_inside = states.iter().map(|s| s.inside_yard).sum::<f64>() / n;
            let avg_loading = states.iter().map(|s| s.in_loading).sum::<f64>() / n;
            let arrivals: f64 = outputs.iter().map(|o| o.net_arrivals).sum();
            let completed: f64 = outputs.iter().map(|o| o.completed).sum();

            let queue_wait = queue_wait_minutes(avg_loading, avg_inside, docs_estimate, params, limits);
            let occupancy_pct = (avg_loading / limits.bays_divisor() * 100.0).round().clamp(0.0, 100.0);

            let start_min = (bucket as f64 * BUCKET_MIN) as u32;
            let end_min = start_min + BUCKET_MIN as u32;

            ForecastBucket {
                label: bucket_label(now, start_min, end_min),
                bucket_start_minutes_from_now: start_min,
                bucket_end_minutes_from_now: end_min,
                expected_arrivals: round_tenth(arrivals),
                early_fraction: early,
                on_time_fraction: on_time,
                late_fraction: late,
                queue_outside: round_tenth(avg_outside),
                queue_inside: round_tenth(avg_inside),
                bays_occupied: avg_loading.round().clamp(0.0, limits.bays()) as u32,
                bay_occupancy_pct: occupancy_pct as u32,
                avg_turnaround_minutes: avg_turnaround(params, profile, queue_wait).round().max(0.0) as u32,
                trucks_completed: round_tenth(completed),
                outside_overflow: avg_outside > limits.outside() * OVERFLOW_THRESHOLD,
                inside_overflow: avg_inside > limits.inside() * OVERFLOW_THRESHOLD,
            }
        })
        .collect()
}
