use std::io::{self, Write};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::params::ForecastParams;
use crate::domain::snapshot::{HistoricalStats, TerminalSnapshot, YardState};
use crate::domain::truck::ScheduledTruck;

#[derive(Error, Debug)]
pub enum SnapshotYamlError {
    #[error("failed to read snapshot yaml: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse snapshot yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid timestamp: {0} (expected RFC 3339)")]
    InvalidTimestamp(String),
    #[error("invalid slot for booking {booking_id}: ends at {end} before it starts at {start}")]
    InvalidSlot {
        booking_id: String,
        start: f64,
        end: f64,
    },
    #[error("{name} must be a non-negative number, got {value}")]
    NegativeCounter { name: &'static str, value: f64 },
}

#[derive(Serialize, Deserialize)]
struct SnapshotRecord {
    generated_at: String,
    current_state: CurrentStateRecord,
    #[serde(default)]
    scheduled_trucks: Vec<ScheduledTruck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    historical_stats: Option<HistoricalStatsRecord>,
}

#[derive(Serialize, Deserialize)]
struct CurrentStateRecord {
    #[serde(default)]
    current_bay_occupancy: f64,
    #[serde(default)]
    current_inside_yard: f64,
    #[serde(default)]
    current_outside_queue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_bays: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inside_yard_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    outside_queue_limit: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct HistoricalStatsRecord {
    avg_turnaround_min: Option<f64>,
    #[serde(default)]
    sample_size: usize,
}

pub fn load_snapshot_from_yaml_file(path: &str) -> Result<TerminalSnapshot, SnapshotYamlError> {
    let contents = std::fs::read_to_string(path)?;
    deserialize_snapshot_from_yaml_str(&contents)
}

/// Parses and validates a snapshot. JSON is valid YAML, so API dumps load
/// too as long as they use the snake_case field names.
pub fn deserialize_snapshot_from_yaml_str(contents: &str) -> Result<TerminalSnapshot, SnapshotYamlError> {
    let record: SnapshotRecord = serde_yaml::from_str(contents)?;
    let generated_at = parse_timestamp(&record.generated_at)?;

    let state = record.current_state;
    let counters = [
        ("current_bay_occupancy", state.current_bay_occupancy),
        ("current_inside_yard", state.current_inside_yard),
        ("current_outside_queue", state.current_outside_queue),
    ];
    for (name, value) in counters {
        if !value.is_finite() || value < 0.0 {
            return Err(SnapshotYamlError::NegativeCounter { name, value });
        }
    }

    if let Some(truck) = record.scheduled_trucks.iter().find(|truck| !truck.has_valid_slot()) {
        return Err(SnapshotYamlError::InvalidSlot {
            booking_id: truck.booking_id.clone(),
            start: truck.slot_start_minutes_from_now,
            end: truck.slot_end_minutes_from_now,
        });
    }

    Ok(TerminalSnapshot {
        generated_at,
        yard: YardState {
            current_bay_occupancy: state.current_bay_occupancy,
            current_inside_yard: state.current_inside_yard,
            current_outside_queue: state.current_outside_queue,
            total_bays: state.total_bays,
            inside_yard_limit: state.inside_yard_limit,
            outside_queue_limit: state.outside_queue_limit,
        },
        scheduled_trucks: record.scheduled_trucks,
        historical: record.historical_stats.map(|stats| HistoricalStats {
            avg_turnaround_min: stats.avg_turnaround_min,
            sample_size: stats.sample_size,
        }),
    })
}

pub fn serialize_snapshot_to_yaml<W: Write>(writer: &mut W, snapshot: &TerminalSnapshot) -> io::Result<()> {
    let record = SnapshotRecord {
        generated_at: snapshot.generated_at.to_rfc3339(),
        current_state: CurrentStateRecord {
            current_bay_occupancy: snapshot.yard.current_bay_occupancy,
            current_inside_yard: snapshot.yard.current_inside_yard,
            current_outside_queue: snapshot.yard.current_outside_queue,
            total_bays: snapshot.yard.total_bays,
            inside_yard_limit: snapshot.yard.inside_yard_limit,
            outside_queue_limit: snapshot.yard.outside_queue_limit,
        },
        scheduled_trucks: snapshot.scheduled_trucks.clone(),
        historical_stats: snapshot.historical.map(|stats| HistoricalStatsRecord {
            avg_turnaround_min: stats.avg_turnaround_min,
            sample_size: stats.sample_size,
        }),
    };

    let yaml = serde_yaml::to_string(&record).map_err(io::Error::other)?;
    writer.write_all(yaml.as_bytes())
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, SnapshotYamlError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map_err(|_| SnapshotYamlError::InvalidTimestamp(value.to_string()))
}

/// Loads a parameter set; fields left out keep their default values.
pub fn load_params_from_yaml_file(path: &str) -> Result<ForecastParams, SnapshotYamlError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}
