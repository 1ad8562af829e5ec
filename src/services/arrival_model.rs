use crate::domain::params::ForecastParams;
use crate::domain::terminal::{TerminalProfile, TICKS, TICK_MIN};
use crate::domain::truck::ScheduledTruck;

/// Fixed share of trucks that show up before their slot opens.
pub const EARLY_WEIGHT: f64 = 0.15;
/// Share of adherent trucks arriving inside the slot.
pub const ON_TIME_SHARE: f64 = 0.55;
/// Share of adherent trucks arriving after the slot closes.
pub const LATE_SHARE: f64 = 0.30;

/// Weights of the early, on-time and late bands for the given parameters.
///
/// They sum to `0.15 + 0.85 * adherence`, less than one. The remainder is
/// trucks that never turn up inside the horizon.
pub fn band_weights(params: &ForecastParams) -> (f64, f64, f64) {
    let adherence = params.adherence();
    (EARLY_WEIGHT, adherence * ON_TIME_SHARE, adherence * LATE_SHARE)
}

/// Expected fraction of one truck arriving in `[window_start, window_end)`.
///
/// The truck's arrival time is a mixture of three uniform bands around its
/// slot `[slot_start, slot_end]`:
///
/// - early: `[slot_start - early_window, slot_start]`
/// - on time: `[slot_start, slot_end]`
/// - late: `[slot_end, slot_end + late_window]`
///
/// A zero-width band (an instantaneous slot) contributes nothing.
pub fn arrival_prob_in_window(
    slot_start: f64,
    slot_end: f64,
    window_start: f64,
    window_end: f64,
    params: &ForecastParams,
    profile: &TerminalProfile,
) -> f64 {
    let (early, on_time, late) = band_weights(params);
    let overlap = |band_start: f64, band_end: f64| {
        uniform_overlap(band_start, band_end, window_start, window_end)
    };

    on_time * overlap(slot_start, slot_end)
        + early * overlap(slot_start - profile.early_window_min, slot_start)
        + late * overlap(slot_end, slot_end + profile.late_window_min)
}

fn uniform_overlap(band_start: f64, band_end: f64, window_start: f64, window_end: f64) -> f64 {
    let width = band_end - band_start;
    if width <= 0.0 {
        return 0.0;
    }
    let overlap = band_end.min(window_end) - band_start.max(window_start);
    overlap.max(0.0) / width
}

/// Expected raw arrivals (before gate rejection) per tick of the horizon.
pub fn build_arrival_table(
    trucks: &[ScheduledTruck],
    params: &ForecastParams,
    profile: &TerminalProfile,
) -> [f64; TICKS] {
    let mut arrivals = [0.0; TICKS];
    for truck in trucks.iter().filter(|truck| truck.is_expected_to_arrive()) {
        for (tick, slot) in arrivals.iter_mut().enumerate() {
            let window_start = tick as f64 * TICK_MIN;
            *slot += arrival_prob_in_window(
                truck.slot_start_minutes_from_now,
                truck.slot_end_minutes_from_now,
                window_start,
                window_start + TICK_MIN,
                params,
                profile,
            );
        }
    }
    arrivals
}
