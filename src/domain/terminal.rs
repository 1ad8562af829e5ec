use serde::{Deserialize, Serialize};

// Simulation resolution. The output shape (4 buckets of 6 ticks) is fixed.
pub const TICK_MIN: f64 = 5.0;
pub const BUCKET_MIN: f64 = 30.0;
pub const BUCKET_COUNT: usize = 4;
pub const TICKS_PER_BUCKET: usize = 6;
pub const TICKS: usize = BUCKET_COUNT * TICKS_PER_BUCKET;
pub const HORIZON_MIN: f64 = BUCKET_COUNT as f64 * BUCKET_MIN;

pub const TOTAL_BAYS_DEFAULT: u32 = 18;
pub const INSIDE_LIMIT_DEFAULT: u32 = 8;
pub const OUTSIDE_LIMIT_DEFAULT: u32 = 15;

/// Stage service times and layout of the terminal.
///
/// Defaults describe the real site: two weighbridges with inspection,
/// 18 bays split over three gantries (G3 reserved for LPG).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TerminalProfile {
    pub weighbridge_min: f64,
    pub inspection_min: f64,
    pub docs_normal_min: f64,
    pub docs_delayed_min: f64,
    pub exit_min: f64,
    /// Parallel weighbridge + inspection lanes at the gate.
    pub gate_lanes: u32,
    /// How early a truck may show up before its slot opens.
    pub early_window_min: f64,
    /// How late a truck may show up after its slot closes.
    pub late_window_min: f64,
    pub bay_zones: Vec<BayZone>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BayZone {
    pub name: String,
    pub bays: u32,
    pub products: String,
}

impl Default for TerminalProfile {
    fn default() -> Self {
        Self {
            weighbridge_min: 2.5,
            inspection_min: 7.5,
            docs_normal_min: 4.0,
            docs_delayed_min: 22.0,
            exit_min: 3.0,
            gate_lanes: 2,
            early_window_min: 45.0,
            late_window_min: 60.0,
            bay_zones: vec![
                BayZone {
                    name: "G1".to_string(),
                    bays: 8,
                    products: "POL/Chem".to_string(),
                },
                BayZone {
                    name: "G2".to_string(),
                    bays: 4,
                    products: "POL/Chem".to_string(),
                },
                BayZone {
                    name: "G3".to_string(),
                    bays: 6,
                    products: "LPG".to_string(),
                },
            ],
        }
    }
}

impl TerminalProfile {
    pub fn gate_service_min(&self) -> f64 {
        self.weighbridge_min + self.inspection_min
    }

    /// Trucks the gate can admit per tick across all lanes.
    pub fn gate_throughput_per_tick(&self) -> f64 {
        (self.gate_lanes as f64 * TICK_MIN) / self.gate_service_min().max(1.0)
    }

    /// Docs clearance time constant. Always the delayed figure, never the
    /// blended average.
    pub fn docs_clearance_min(&self) -> f64 {
        self.docs_delayed_min.max(1.0)
    }

    /// Expected documentation time per truck for a given delay fraction.
    pub fn blended_docs_min(&self, docs_delay_fraction: f64) -> f64 {
        docs_delay_fraction * self.docs_delayed_min
            + (1.0 - docs_delay_fraction) * self.docs_normal_min
    }

    pub fn lpg_bays(&self) -> u32 {
        self.bay_zones
            .iter()
            .filter(|zone| zone.products.contains("LPG"))
            .map(|zone| zone.bays)
            .sum()
    }
}

/// Capacity limits after applying caller overrides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalLimits {
    pub total_bays: u32,
    pub inside_yard_limit: u32,
    pub outside_queue_limit: u32,
}

impl Default for TerminalLimits {
    fn default() -> Self {
        Self {
            total_bays: TOTAL_BAYS_DEFAULT,
            inside_yard_limit: INSIDE_LIMIT_DEFAULT,
            outside_queue_limit: OUTSIDE_LIMIT_DEFAULT,
        }
    }
}

impl TerminalLimits {
    pub fn resolve(
        total_bays: Option<u32>,
        inside_yard_limit: Option<u32>,
        outside_queue_limit: Option<u32>,
    ) -> Self {
        Self {
            total_bays: total_bays.unwrap_or(TOTAL_BAYS_DEFAULT),
            inside_yard_limit: inside_yard_limit.unwrap_or(INSIDE_LIMIT_DEFAULT),
            outside_queue_limit: outside_queue_limit.unwrap_or(OUTSIDE_LIMIT_DEFAULT),
        }
    }

    pub fn bays(&self) -> f64 {
        self.total_bays as f64
    }

    pub fn inside(&self) -> f64 {
        self.inside_yard_limit as f64
    }

    pub fn outside(&self) -> f64 {
        self.outside_queue_limit as f64
    }

    // Denominators. A zero-sized terminal must not divide by zero.
    pub fn bays_divisor(&self) -> f64 {
        self.bays().max(1.0)
    }

    pub fn inside_divisor(&self) -> f64 {
        self.inside().max(1.0)
    }

    pub fn outside_divisor(&self) -> f64 {
        self.outside().max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizon_is_four_half_hour_buckets() {
        assert_eq!(TICKS, 24);
        assert_eq!(HORIZON_MIN, 120.0);
        assert_eq!(TICKS_PER_BUCKET as f64 * TICK_MIN, BUCKET_MIN);
    }

    #[test]
    fn default_gate_admits_one_truck_per_tick() {
        let profile = TerminalProfile::default();
        assert_eq!(profile.gate_service_min(), 10.0);
        assert_eq!(profile.gate_throughput_per_tick(), 1.0);
    }

    #[test]
    fn default_bay_zones_add_up_to_default_total() {
        let profile = TerminalProfile::default();
        let total: u32 = profile.bay_zones.iter().map(|zone| zone.bays).sum();
        assert_eq!(total, TOTAL_BAYS_DEFAULT);
        assert_eq!(profile.lpg_bays(), 6);
    }

    #[test]
    fn blended_docs_time_weights_delay_share() {
        let profile = TerminalProfile::default();
        assert_eq!(profile.blended_docs_min(0.0), 4.0);
        assert_eq!(profile.blended_docs_min(1.0), 22.0);
        assert!((profile.blended_docs_min(0.25) - 8.5).abs() < 1e-9);
    }

    #[test]
    fn resolve_uses_defaults_for_missing_overrides() {
        let limits = TerminalLimits::resolve(Some(10), None, None);
        assert_eq!(limits.total_bays, 10);
        assert_eq!(limits.inside_yard_limit, INSIDE_LIMIT_DEFAULT);
        assert_eq!(limits.outside_queue_limit, OUTSIDE_LIMIT_DEFAULT);
    }

    #[test]
    fn divisors_are_guarded_for_zero_limits() {
        let limits = TerminalLimits::resolve(Some(0), Some(0), Some(0));
        assert_eq!(limits.bays_divisor(), 1.0);
        assert_eq!(limits.inside_divisor(), 1.0);
        assert_eq!(limits.outside_divisor(), 1.0);
    }

    #[test]
    fn partial_profile_yaml_keeps_other_defaults() {
        let profile: TerminalProfile = serde_yaml::from_str("inspection_min: 10\n").unwrap();
        assert_eq!(profile.inspection_min, 10.0);
        assert_eq!(profile.weighbridge_min, 2.5);
        assert_eq!(profile.bay_zones.len(), 3);
    }
}
