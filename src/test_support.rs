use chrono::{DateTime, FixedOffset};

use crate::domain::forecast::ForecastInput;
use crate::domain::params::ForecastParams;
use crate::domain::truck::{ProductCategory, ScheduledTruck};

pub fn fixed_now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2025-01-15T10:00:00Z").unwrap()
}

// An empty terminal at the fixed reference time with default parameters.
pub fn make_input() -> ForecastInput {
    ForecastInput {
        now: fixed_now(),
        params: ForecastParams::default(),
        scheduled_trucks: Vec::new(),
        current_bay_occupancy: 0.0,
        current_inside_yard: 0.0,
        current_outside_queue: 0.0,
        total_bays: None,
        inside_yard_limit: None,
        outside_queue_limit: None,
        profile: None,
    }
}

pub fn make_truck(id: &str, slot_start: f64, slot_end: f64) -> ScheduledTruck {
    ScheduledTruck {
        booking_id: id.to_string(),
        slot_start_minutes_from_now: slot_start,
        slot_end_minutes_from_now: slot_end,
        is_already_in_terminal: false,
        product_category: ProductCategory::Pol,
    }
}

pub fn make_trucks(count: usize, slot_start: f64, slot_end: f64) -> Vec<ScheduledTruck> {
    (0..count)
        .map(|i| make_truck(&format!("b{i}"), slot_start, slot_end))
        .collect()
}
