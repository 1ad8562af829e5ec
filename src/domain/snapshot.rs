use chrono::{DateTime, FixedOffset};

use crate::domain::forecast::ForecastInput;
use crate::domain::params::ForecastParams;
use crate::domain::truck::ScheduledTruck;

/// Live yard counters from gate/yard telemetry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YardState {
    pub current_bay_occupancy: f64,
    pub current_inside_yard: f64,
    pub current_outside_queue: f64,
    pub total_bays: Option<u32>,
    pub inside_yard_limit: Option<u32>,
    pub outside_queue_limit: Option<u32>,
}

/// Turnaround measured over recently completed trips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoricalStats {
    pub avg_turnaround_min: Option<f64>,
    pub sample_size: usize,
}

/// Forecast inputs as captured at one moment: the yard counters plus the
/// day's bookings.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalSnapshot {
    pub generated_at: DateTime<FixedOffset>,
    pub yard: YardState,
    pub scheduled_trucks: Vec<ScheduledTruck>,
    pub historical: Option<HistoricalStats>,
}

impl TerminalSnapshot {
    /// Builds an engine input from this snapshot. `now` defaults to the
    /// moment the snapshot was taken, which keeps slot offsets consistent.
    pub fn to_forecast_input(
        &self,
        params: ForecastParams,
        now: Option<DateTime<FixedOffset>>,
    ) -> ForecastInput {
        ForecastInput {
            now: now.unwrap_or(self.generated_at),
            params,
            scheduled_trucks: self.scheduled_trucks.clone(),
            current_bay_occupancy: self.yard.current_bay_occupancy,
            current_inside_yard: self.yard.current_inside_yard,
            current_outside_queue: self.yard.current_outside_queue,
            total_bays: self.yard.total_bays,
            inside_yard_limit: self.yard.inside_yard_limit,
            outside_queue_limit: self.yard.outside_queue_limit,
            profile: None,
        }
    }

    pub fn trucks_expected(&self) -> usize {
        self.scheduled_trucks
            .iter()
            .filter(|truck| truck.is_expected_to_arrive())
            .count()
    }
}
