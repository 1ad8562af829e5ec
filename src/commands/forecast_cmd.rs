use thiserror::Error;
use tracing::info;

use crate::commands::base_commands::{Commands, OutputFormat, ScenarioArgs};
use crate::commands::report_format::format_forecast_report;
use crate::domain::forecast::{ForecastInput, ForecastResult};
use crate::domain::params::{ForecastParams, ParamsError};
use crate::domain::snapshot::TerminalSnapshot;
use crate::services::data_source::TerminalApiError;
use crate::services::forecast_engine::compute_forecast;
use crate::services::forecast_plot::ForecastPlotError;
use crate::services::snapshot_yaml::{
    SnapshotYamlError, deserialize_snapshot_from_yaml_str, load_params_from_yaml_file,
    parse_timestamp,
};
use crate::services::terminal_api::TerminalConfigError;

#[derive(Error, Debug)]
pub enum ForecastCommandError {
    #[error("{0}")]
    Snapshot(#[from] SnapshotYamlError),
    #[error("invalid parameters: {0}")]
    Params(#[from] ParamsError),
    #[error("{0}")]
    Config(#[from] TerminalConfigError),
    #[error("{0}")]
    Api(#[from] TerminalApiError),
    #[error("failed to serialize output: {0}")]
    Serialize(String),
    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),
    #[error("{0}")]
    Plot(#[from] ForecastPlotError),
}

pub async fn forecast_command(cmd: Commands) -> Result<(), ForecastCommandError> {
    if let Commands::Forecast {
        input,
        output,
        format,
        scenario,
    } = cmd
    {
        let snapshot = load_snapshot(&input).await?;
        let forecast_input = build_forecast_input(&snapshot, &scenario)?;
        let result = compute_forecast(&forecast_input);

        let contents = serialize_forecast(&result, format)?;
        tokio::fs::write(&output, contents).await?;
        info!(%output, score = result.congestion_score, "forecast written");

        println!("{}", format_forecast_report(&result, snapshot.historical.as_ref()));
        println!("Forecast written to {output}");
    }
    Ok(())
}

pub async fn load_snapshot(path: &str) -> Result<TerminalSnapshot, ForecastCommandError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(SnapshotYamlError::from)?;
    Ok(deserialize_snapshot_from_yaml_str(&contents)?)
}

/// Parameter file first, then individual flags on top. The result is
/// validated here so the engine only ever sees sane knobs.
pub fn resolve_params(scenario: &ScenarioArgs) -> Result<ForecastParams, ForecastCommandError> {
    let mut params = match &scenario.params {
        Some(path) => load_params_from_yaml_file(path)?,
        None => ForecastParams::default(),
    };
    if let Some(value) = scenario.slot_adherence {
        params.slot_adherence_pct = value;
    }
    if let Some(value) = scenario.rejection {
        params.rejection_pct = value;
    }
    if let Some(value) = scenario.docs_delay {
        params.docs_delay_pct = value;
    }
    if let Some(value) = scenario.loading_minutes {
        params.avg_loading_minutes = value;
    }
    params.validate()?;
    Ok(params)
}

pub fn build_forecast_input(
    snapshot: &TerminalSnapshot,
    scenario: &ScenarioArgs,
) -> Result<ForecastInput, ForecastCommandError> {
    let params = resolve_params(scenario)?;
    build_input_with_params(snapshot, scenario, params)
}

/// Same snapshot and limit overrides, explicit parameters. Used to run a
/// baseline next to a scenario.
pub fn build_input_with_params(
    snapshot: &TerminalSnapshot,
    scenario: &ScenarioArgs,
    params: ForecastParams,
) -> Result<ForecastInput, ForecastCommandError> {
    let now = scenario.now.as_deref().map(parse_timestamp).transpose()?;
    let mut input = snapshot.to_forecast_input(params, now);
    if scenario.total_bays.is_some() {
        input.total_bays = scenario.total_bays;
    }
    if scenario.inside_limit.is_some() {
        input.inside_yard_limit = scenario.inside_limit;
    }
    if scenario.outside_limit.is_some() {
        input.outside_queue_limit = scenario.outside_limit;
    }
    Ok(input)
}

pub fn serialize_forecast(
    result: &ForecastResult,
    format: OutputFormat,
) -> Result<String, ForecastCommandError> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(result)
            .map_err(|e| ForecastCommandError::Serialize(e.to_string())),
        OutputFormat::Json => serde_json::to_string_pretty(result)
            .map_err(|e| ForecastCommandError::Serialize(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::YardState;
    use crate::test_support::{fixed_now, make_truck};
    use assert_fs::prelude::*;

    fn snapshot() -> TerminalSnapshot {
        TerminalSnapshot {
            generated_at: fixed_now(),
            yard: YardState {
                current_bay_occupancy: 6.0,
                current_inside_yard: 4.0,
                current_outside_queue: 2.0,
                total_bays: Some(18),
                ..YardState::default()
            },
            scheduled_trucks: vec![make_truck("b1", 0.0, 30.0)],
            historical: None,
        }
    }

    #[test]
    fn resolve_params_applies_flags_over_defaults() {
        let scenario = ScenarioArgs {
            slot_adherence: Some(90.0),
            loading_minutes: Some(45.0),
            ..ScenarioArgs::default()
        };
        let params = resolve_params(&scenario).unwrap();
        assert_eq!(params.slot_adherence_pct, 90.0);
        assert_eq!(params.avg_loading_minutes, 45.0);
        assert_eq!(params.rejection_pct, 15.0);
    }

    #[test]
    fn resolve_params_reads_file_then_flags() {
        let file = assert_fs::NamedTempFile::new("params.yaml").unwrap();
        file.write_str("rejection_pct: 5\ndocs_delay_pct: 40\n").unwrap();
        let scenario = ScenarioArgs {
            params: Some(file.path().to_str().unwrap().to_string()),
            docs_delay: Some(10.0),
            ..ScenarioArgs::default()
        };
        let params = resolve_params(&scenario).unwrap();
        assert_eq!(params.rejection_pct, 5.0);
        assert_eq!(params.docs_delay_pct, 10.0);
        assert_eq!(params.slot_adherence_pct, 70.0);
    }

    #[test]
    fn resolve_params_rejects_out_of_range_values() {
        let scenario = ScenarioArgs {
            rejection: Some(120.0),
            ..ScenarioArgs::default()
        };
        let err = resolve_params(&scenario).unwrap_err();
        assert!(matches!(err, ForecastCommandError::Params(_)));
    }

    #[test]
    fn build_forecast_input_applies_overrides() {
        let scenario = ScenarioArgs {
            total_bays: Some(10),
            outside_limit: Some(30),
            now: Some("2025-01-15T12:00:00+02:00".to_string()),
            ..ScenarioArgs::default()
        };
        let input = build_forecast_input(&snapshot(), &scenario).unwrap();
        assert_eq!(input.total_bays, Some(10));
        assert_eq!(input.inside_yard_limit, None);
        assert_eq!(input.outside_queue_limit, Some(30));
        assert_eq!(input.now.to_rfc3339(), "2025-01-15T12:00:00+02:00");
        assert_eq!(input.current_bay_occupancy, 6.0);
        assert_eq!(input.scheduled_trucks.len(), 1);
    }

    #[test]
    fn build_forecast_input_defaults_now_to_snapshot_time() {
        let input = build_forecast_input(&snapshot(), &ScenarioArgs::default()).unwrap();
        assert_eq!(input.now, fixed_now());
    }

    #[test]
    fn build_forecast_input_rejects_bad_now() {
        let scenario = ScenarioArgs {
            now: Some("noon".to_string()),
            ..ScenarioArgs::default()
        };
        let err = build_forecast_input(&snapshot(), &scenario).unwrap_err();
        assert!(matches!(
            err,
            ForecastCommandError::Snapshot(SnapshotYamlError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn serialize_forecast_supports_both_formats() {
        let input = build_forecast_input(&snapshot(), &ScenarioArgs::default()).unwrap();
        let result = compute_forecast(&input);

        let yaml = serialize_forecast(&result, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("congestion_score:"));
        assert!(yaml.contains("risk_level:"));

        let json = serialize_forecast(&result, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["buckets"].as_array().unwrap().len(), 4);
        assert_eq!(value["generated_at"], "2025-01-15T10:00:00.000Z");
    }
}
