use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::params::ForecastParams;
use crate::domain::terminal::{TerminalLimits, TerminalProfile};
use crate::domain::truck::ScheduledTruck;

/// Everything the engine needs for one forecast run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForecastInput {
    pub now: DateTime<FixedOffset>,
    pub params: ForecastParams,
    pub scheduled_trucks: Vec<ScheduledTruck>,
    pub current_bay_occupancy: f64,
    pub current_inside_yard: f64,
    pub current_outside_queue: f64,
    #[serde(default)]
    pub total_bays: Option<u32>,
    #[serde(default)]
    pub inside_yard_limit: Option<u32>,
    #[serde(default)]
    pub outside_queue_limit: Option<u32>,
    #[serde(default)]
    pub profile: Option<TerminalProfile>,
}

impl ForecastInput {
    pub fn limits(&self) -> TerminalLimits {
        TerminalLimits::resolve(self.total_bays, self.inside_yard_limit, self.outside_queue_limit)
    }
}

/// One 30-minute row of the forecast.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForecastBucket {
    /// Wall-clock span, e.g. `14:00–14:30`.
    pub label: String,
    pub bucket_start_minutes_from_now: u32,
    pub bucket_end_minutes_from_now: u32,

    pub expected_arrivals: f64,
    pub early_fraction: f64,
    pub on_time_fraction: f64,
    pub late_fraction: f64,

    pub queue_outside: f64,
    pub queue_inside: f64,

    pub bays_occupied: u32,
    pub bay_occupancy_pct: u32,

    pub avg_turnaround_minutes: u32,
    pub trucks_completed: f64,

    pub outside_overflow: bool,
    pub inside_overflow: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CongestionDriver {
    pub factor: String,
    /// Relative contribution, 0-100.
    pub contribution_pct: u32,
    pub detail: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    SlotCap,
    ShiftTrucks,
    DocsPreclear,
    BayPriority,
}

/// Declaration order is display order: high first.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub id: String,
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    /// Short text such as `-5 trucks outside`.
    pub impact: String,
    pub impact_value: i64,
    pub priority: Priority,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=29 => RiskLevel::Low,
            30..=54 => RiskLevel::Moderate,
            55..=74 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

/// Echo of the raw telemetry the forecast started from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CurrentState {
    pub trucks_outside: f64,
    pub trucks_inside: f64,
    pub bays_occupied: f64,
    pub trucks_in_docs: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DerivedStats {
    /// Turnaround with zero queue wait.
    pub avg_base_turnaround_min: u32,
    pub peak_bay_occupancy_pct: u32,
    pub peak_outside_queue: f64,
    pub peak_inside_queue: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub generated_at: String,
    pub params: ForecastParams,
    pub buckets: Vec<ForecastBucket>,
    pub congestion_score: u32,
    pub risk_level: RiskLevel,
    pub congestion_drivers: Vec<CongestionDriver>,
    pub recommendations: Vec<Recommendation>,
    pub model_assumptions: Vec<String>,
    pub current_state: CurrentState,
    pub derived_stats: DerivedStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_bands() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(54), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(55), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(74), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(75), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Critical);
    }

    #[test]
    fn priorities_order_high_before_low() {
        let mut priorities = vec![Priority::Low, Priority::High, Priority::Medium];
        priorities.sort();
        assert_eq!(priorities, vec![Priority::High, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn recommendation_kind_serializes_snake_case() {
        let yaml = serde_yaml::to_string(&RecommendationKind::DocsPreclear).unwrap();
        assert_eq!(yaml.trim(), "docs_preclear");
    }
}
