use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ParamsError {
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("{name} must be between 0 and 100, got {value}")]
    PercentOutOfRange { name: &'static str, value: f64 },
    #[error("avg_loading_minutes must be greater than zero, got {0}")]
    NonPositiveLoadingTime(f64),
}

/// Tunable operational assumptions behind a forecast.
///
/// These are knobs, not measurements: the what-if tooling varies them to
/// see how the terminal would cope.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ForecastParams {
    /// Share of trucks arriving within their booked slot window (0-100).
    pub slot_adherence_pct: f64,
    /// Share of trucks turned away at the gate (0-100).
    pub rejection_pct: f64,
    /// Share of admitted trucks held inside the yard on paperwork (0-100).
    pub docs_delay_pct: f64,
    /// Average loading time per truck at a bay.
    pub avg_loading_minutes: f64,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            slot_adherence_pct: 70.0,
            rejection_pct: 15.0,
            docs_delay_pct: 25.0,
            // midpoint of the 45-60 min operational range
            avg_loading_minutes: 52.0,
        }
    }
}

impl ForecastParams {
    pub fn adherence(&self) -> f64 {
        self.slot_adherence_pct / 100.0
    }

    pub fn docs_delay_fraction(&self) -> f64 {
        self.docs_delay_pct / 100.0
    }

    pub fn rejection_fraction(&self) -> f64 {
        self.rejection_pct / 100.0
    }

    /// Loading time used as a divisor; never below one minute.
    pub fn guarded_loading_minutes(&self) -> f64 {
        self.avg_loading_minutes.max(1.0)
    }

    /// Caller-side validation. The engine itself accepts anything and
    /// degrades by clamping, so this is the place to reject nonsense.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let percentages = [
            ("slot_adherence_pct", self.slot_adherence_pct),
            ("rejection_pct", self.rejection_pct),
            ("docs_delay_pct", self.docs_delay_pct),
        ];
        for (name, value) in percentages {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite { name, value });
            }
            if !(0.0..=100.0).contains(&value) {
                return Err(ParamsError::PercentOutOfRange { name, value });
            }
        }
        if !self.avg_loading_minutes.is_finite() {
            return Err(ParamsError::NotFinite {
                name: "avg_loading_minutes",
                value: self.avg_loading_minutes,
            });
        }
        if self.avg_loading_minutes <= 0.0 {
            return Err(ParamsError::NonPositiveLoadingTime(self.avg_loading_minutes));
        }
        Ok(())
    }

    /// Names and values of the knobs that differ from the defaults.
    pub fn changed_from_default(&self) -> Vec<(&'static str, f64, f64)> {
        let defaults = Self::default();
        [
            ("slot_adherence_pct", self.slot_adherence_pct, defaults.slot_adherence_pct),
            ("rejection_pct", self.rejection_pct, defaults.rejection_pct),
            ("docs_delay_pct", self.docs_delay_pct, defaults.docs_delay_pct),
            ("avg_loading_minutes", self.avg_loading_minutes, defaults.avg_loading_minutes),
        ]
        .into_iter()
        .filter(|(_, value, default)| value != default)
        .collect()
    }
}
