use tracing::info;

use crate::commands::base_commands::Commands;
use crate::commands::forecast_cmd::{
    ForecastCommandError, build_forecast_input, build_input_with_params, load_snapshot,
};
use crate::commands::report_format::format_what_if_report;
use crate::domain::params::ForecastParams;
use crate::services::forecast_engine::compute_forecast;

pub async fn what_if_command(cmd: Commands) -> Result<(), ForecastCommandError> {
    if let Commands::WhatIf { input, scenario } = cmd {
        let snapshot = load_snapshot(&input).await?;
        let scenario_input = build_forecast_input(&snapshot, &scenario)?;
        let baseline_input = build_input_with_params(&snapshot, &scenario, ForecastParams::default())?;

        let baseline = compute_forecast(&baseline_input);
        let result = compute_forecast(&scenario_input);
        info!(
            baseline = baseline.congestion_score,
            scenario = result.congestion_score,
            "what-if comparison computed"
        );

        println!("{}", format_what_if_report(&baseline, &result));
    }
    Ok(())
}
