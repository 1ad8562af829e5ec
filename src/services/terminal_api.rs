use std::env;
use std::fs;
use std::time::Duration;

use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::snapshot::{HistoricalStats, TerminalSnapshot, YardState};
use crate::domain::truck::{ProductCategory, ScheduledTruck};
use crate::services::data_source::{TerminalApiError, SnapshotSource};

pub const TOKEN_ENV_VAR: &str = "TERMINAL_API_TOKEN";

#[derive(Error, Debug)]
pub enum TerminalConfigError {
    #[error("failed to read terminal config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse terminal config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("terminal config is missing base_url")]
    MissingBaseUrl,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TerminalApiConfig {
    pub base_url: String,
    pub forecast_path: String,
    pub timeout_secs: u64,
}

impl Default for TerminalApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            forecast_path: "/api/forecast".to_string(),
            timeout_secs: 10,
        }
    }
}

impl TerminalApiConfig {
    pub fn from_yaml_file(filepath: &str) -> Result<Self, TerminalConfigError> {
        let contents = fs::read_to_string(filepath)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        if config.base_url.trim().is_empty() {
            return Err(TerminalConfigError::MissingBaseUrl);
        }
        Ok(config)
    }

    pub fn forecast_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.forecast_path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone)]
pub struct AuthData {
    pub api_token: String,
}

impl AuthData {
    pub fn from_env() -> Result<Self, TerminalApiError> {
        match env::var(TOKEN_ENV_VAR) {
            Ok(api_token) if !api_token.is_empty() => Ok(Self { api_token }),
            _ => Err(TerminalApiError::Unauthorized),
        }
    }
}

// Wire format of the terminal operations API (camelCase JSON).

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastDataResponse {
    generated_at: String,
    current_state: CurrentStatePayload,
    #[serde(default)]
    scheduled_trucks: Vec<ScheduledTruckPayload>,
    historical_stats: Option<HistoricalStatsPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentStatePayload {
    current_bay_occupancy: f64,
    current_inside_yard: f64,
    current_outside_queue: f64,
    total_bays: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduledTruckPayload {
    booking_id: String,
    slot_start_minutes_from_now: f64,
    slot_end_minutes_from_now: f64,
    #[serde(default)]
    is_already_in_terminal: bool,
    product_category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoricalStatsPayload {
    avg_turnaround_min: Option<f64>,
    #[serde(default)]
    sample_size: usize,
}

pub struct TerminalApiClient {
    config: TerminalApiConfig,
    auth: AuthData,
    client: Client,
}

impl TerminalApiClient {
    pub fn new(config: TerminalApiConfig, auth: AuthData) -> Result<Self, TerminalApiError> {
        if config.base_url.trim().is_empty() {
            return Err(TerminalApiError::Config(TerminalConfigError::MissingBaseUrl));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|err| TerminalApiError::Connection(err.to_string()))?;

        Ok(Self {
            config,
            auth,
            client,
        })
    }

    async fn fetch_forecast_data(&self) -> Result<ForecastDataResponse, TerminalApiError> {
        let url = self.config.forecast_url();
        debug!(%url, "requesting forecast inputs");
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.auth.api_token)
            .send()
            .await
            .map_err(|err| TerminalApiError::Connection(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TerminalApiError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(TerminalApiError::NotFound);
        }
        if !status.is_success() {
            return Err(TerminalApiError::Connection(format!("unexpected status {status}")));
        }

        response
            .json::<ForecastDataResponse>()
            .await
            .map_err(|err| TerminalApiError::Parse(err.to_string()))
    }
}

impl SnapshotSource for TerminalApiClient {
    async fn fetch_snapshot(&self) -> Result<TerminalSnapshot, TerminalApiError> {
        let payload = self.fetch_forecast_data().await?;
        let snapshot = map_snapshot(payload)?;
        info!(
            trucks = snapshot.scheduled_trucks.len(),
            expected = snapshot.trucks_expected(),
            "fetched terminal snapshot"
        );
        Ok(snapshot)
    }
}

fn map_snapshot(payload: ForecastDataResponse) -> Result<TerminalSnapshot, TerminalApiError> {
    let generated_at = DateTime::parse_from_rfc3339(&payload.generated_at)
        .map_err(|_| TerminalApiError::Parse(format!("invalid generatedAt: {}", payload.generated_at)))?;

    let scheduled_trucks = payload
        .scheduled_trucks
        .into_iter()
        .filter_map(map_truck)
        .collect();

    // Negative counters from telemetry are glitches; treat them as empty.
    let state = payload.current_state;
    Ok(TerminalSnapshot {
        generated_at,
        yard: YardState {
            current_bay_occupancy: state.current_bay_occupancy.max(0.0),
            current_inside_yard: state.current_inside_yard.max(0.0),
            current_outside_queue: state.current_outside_queue.max(0.0),
            // A terminal reporting zero bays has no bay data, not zero bays.
            total_bays: state.total_bays.filter(|bays| *bays > 0),
            inside_yard_limit: None,
            outside_queue_limit: None,
        },
        scheduled_trucks,
        historical: payload.historical_stats.map(|stats| HistoricalStats {
            avg_turnaround_min: stats.avg_turnaround_min,
            sample_size: stats.sample_size,
        }),
    })
}

fn map_truck(truck: ScheduledTruckPayload) -> Option<ScheduledTruck> {
    let mapped = ScheduledTruck {
        booking_id: truck.booking_id,
        slot_start_minutes_from_now: truck.slot_start_minutes_from_now,
        slot_end_minutes_from_now: truck.slot_end_minutes_from_now,
        is_already_in_terminal: truck.is_already_in_terminal,
        product_category: truck
            .product_category
            .map(ProductCategory::from)
            .unwrap_or_default(),
    };
    if !mapped.has_valid_slot() {
        warn!(booking_id = %mapped.booking_id, "skipping booking with inverted slot window");
        return None;
    }
    Some(mapped)
}
