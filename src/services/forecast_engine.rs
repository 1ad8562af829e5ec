//! Congestion forecast for the next two hours of terminal operation.
//!
//! The engine is a discrete-time, expected-value flow simulation: 5-minute
//! ticks, aggregated into 30-minute buckets. There is no randomness and no
//! I/O, so the same input always yields the same forecast and the function
//! can be called from anywhere, including tight what-if loops.

use std::time::Instant;

use chrono::SecondsFormat;
use tracing::debug;

use crate::domain::forecast::{CurrentState, DerivedStats, ForecastInput, ForecastResult, RiskLevel};
use crate::domain::params::ForecastParams;
use crate::domain::terminal::{
    BUCKET_COUNT, BUCKET_MIN, HORIZON_MIN, TICK_MIN, TerminalLimits, TerminalProfile,
};
use crate::services::arrival_model::{EARLY_WEIGHT, LATE_SHARE, build_arrival_table};
use crate::services::bucket_aggregation::{aggregate_buckets, avg_turnaround, round_tenth};
use crate::services::congestion_scoring::{PeakMetrics, congestion_drivers, congestion_score};
use crate::services::flow_simulation::{SimState, run_simulation};
use crate::services::recommendations::recommend;

/// Trucks assumed held on paperwork at the start, from the current yard
/// count. Computed once and kept fixed for the whole run.
pub fn docs_estimate(current_inside_yard: f64, params: &ForecastParams) -> f64 {
    (current_inside_yard * params.docs_delay_fraction() * 0.5).round()
}

/// Initial simulation state from the live counters. Bays occupied beyond
/// the configured total are not representable and start at the ceiling.
pub fn seed_state(input: &ForecastInput, limits: &TerminalLimits, docs_estimate: f64) -> SimState {
    let inside_yard = input.current_inside_yard.max(0.0);
    SimState {
        outside_queue: input.current_outside_queue.max(0.0),
        inside_yard,
        in_docs: docs_estimate.max(0.0).min(inside_yard),
        in_loading: input.current_bay_occupancy.max(0.0).min(limits.bays()),
        total_completed: 0.0,
    }
}

/// Computes the full forecast for one snapshot.
pub fn compute_forecast(input: &ForecastInput) -> ForecastResult {
    let started = Instant::now();
    let params = input.params;
    let limits = input.limits();
    let profile = input.profile.clone().unwrap_or_default();
    let profile = &profile;

    let arrivals = build_arrival_table(&input.scheduled_trucks, &params, profile);
    let docs_estimate = docs_estimate(input.current_inside_yard, &params);
    let initial = seed_state(input, &limits, docs_estimate);
    let trace = run_simulation(initial, &arrivals, &params, &limits, profile);

    let buckets = aggregate_buckets(&trace, input.now, &params, &limits, profile, docs_estimate);
    let peaks = PeakMetrics::from_buckets(&buckets);
    let congestion_score = congestion_score(&peaks, &limits);
    let congestion_drivers = congestion_drivers(&peaks, &params, &limits, profile);
    let recommendations = recommend(&peaks, &params, &limits, profile);

    let base_turnaround = avg_turnaround(&params, profile, 0.0).round().max(0.0) as u32;

    debug!(
        trucks = input.scheduled_trucks.len(),
        congestion_score,
        elapsed_us = started.elapsed().as_micros() as u64,
        "computed terminal forecast"
    );

    ForecastResult {
        generated_at: input.now.to_rfc3339_opts(SecondsFormat::Millis, true),
        params,
        buckets,
        congestion_score,
        risk_level: RiskLevel::from_score(congestion_score),
        congestion_drivers,
        recommendations,
        model_assumptions: model_assumptions(&params, &limits, profile, base_turnaround),
        current_state: CurrentState {
            trucks_outside: input.current_outside_queue,
            trucks_inside: input.current_inside_yard,
            bays_occupied: input.current_bay_occupancy,
            trucks_in_docs: docs_estimate,
        },
        derived_stats: DerivedStats {
            avg_base_turnaround_min: base_turnaround,
            peak_bay_occupancy_pct: peaks.occupancy_pct as u32,
            peak_outside_queue: round_tenth(peaks.outside),
            peak_inside_queue: round_tenth(peaks.inside),
        },
    }
}

fn model_assumptions(
    params: &ForecastParams,
    limits: &TerminalLimits,
    profile: &TerminalProfile,
    base_turnaround: u32,
) -> Vec<String> {
    let docs_avg = profile.blended_docs_min(params.docs_delay_fraction()).round();
    let late_pct = (params.adherence() * LATE_SHARE * 100.0).round();
    let zones = profile
        .bay_zones
        .iter()
        .map(|zone| format!("{}={} {}", zone.name, zone.bays, zone.products))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        format!(
            "Loading: {} min avg per truck (operational range 45-60 min)",
            params.avg_loading_minutes
        ),
        format!(
            "Weighbridge: {} min, {} lanes running in parallel",
            profile.weighbridge_min, profile.gate_lanes
        ),
        format!("Safety inspection: {} min avg (range 5-10 min)", profile.inspection_min),
        format!(
            "Docs: {docs_avg} min avg ({} min if delayed, {} min if clear; {}% of trucks face delays)",
            profile.docs_delayed_min, profile.docs_normal_min, params.docs_delay_pct
        ),
        format!(
            "Slot adherence: {}% on-time, {}% early (<= {} min before), {late_pct}% late (<= {} min after)",
            params.slot_adherence_pct,
            (EARLY_WEIGHT * 100.0).round(),
            profile.early_window_min,
            profile.late_window_min
        ),
        format!("Gate rejection rate: {}%", params.rejection_pct),
        format!(
            "Yard limits: inside {} trucks, outside {} trucks",
            limits.inside_yard_limit, limits.outside_queue_limit
        ),
        format!("Bay configuration: {zones}; total {} bays", limits.total_bays),
        format!(
            "Forecast horizon: {HORIZON_MIN} min in {BUCKET_COUNT}x{BUCKET_MIN}-min buckets, {TICK_MIN}-min tick resolution"
        ),
        "Model: deterministic expected-value flow simulation (no randomness)".to_string(),
        format!("Base turnaround (no queue wait): {base_turnaround} min"),
    ]
}
