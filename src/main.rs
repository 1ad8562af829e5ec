use std::io;

use clap::{CommandFactory, Parser};
use terminal_forecast::commands::base_commands::{CliArgs, Commands};
use terminal_forecast::commands::forecast_cmd::forecast_command;
use terminal_forecast::commands::get_snapshot_cmd::get_snapshot_command;
use terminal_forecast::commands::plot_forecast_cmd::plot_forecast_command;
use terminal_forecast::commands::what_if_cmd::what_if_command;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();
    let (action, result) = match args.command {
        cmd @ Commands::GetSnapshot { .. } => ("fetch snapshot", get_snapshot_command(cmd).await),
        cmd @ Commands::Forecast { .. } => ("compute forecast", forecast_command(cmd).await),
        cmd @ Commands::WhatIf { .. } => ("run what-if comparison", what_if_command(cmd).await),
        cmd @ Commands::PlotForecast { .. } => ("plot forecast", plot_forecast_command(cmd).await),
        Commands::Completions { shell } => {
            let mut command = CliArgs::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("Failed to {action}: {e}");
        std::process::exit(1);
    }
}
