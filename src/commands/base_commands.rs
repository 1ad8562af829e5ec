use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the current yard state and bookings from the terminal API into YAML
    GetSnapshot {
        /// Path to terminal API config YAML
        #[arg(short, long)]
        config: String,
        /// Output YAML file
        #[arg(short, long)]
        output: String,
    },
    /// Forecast congestion for the next two hours from a snapshot
    Forecast {
        /// Snapshot YAML file
        #[arg(short, long)]
        input: String,
        /// Output file for the forecast result
        #[arg(short, long)]
        output: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// Compare adjusted parameters against the default forecast
    WhatIf {
        /// Snapshot YAML file
        #[arg(short, long)]
        input: String,
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// Render the forecast buckets as a PNG chart
    PlotForecast {
        /// Snapshot YAML file
        #[arg(short, long)]
        input: String,
        /// Output PNG file
        #[arg(short, long)]
        output: String,
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Knobs shared by every command that runs the engine.
#[derive(Args, Clone, Debug, Default, PartialEq)]
pub struct ScenarioArgs {
    /// Parameter YAML file; flags below override its values
    #[arg(long)]
    pub params: Option<String>,
    /// Share of trucks arriving inside their slot, in percent
    #[arg(long, allow_negative_numbers = true)]
    pub slot_adherence: Option<f64>,
    /// Share of arrivals turned away at the gate, in percent
    #[arg(long, allow_negative_numbers = true)]
    pub rejection: Option<f64>,
    /// Share of trucks held on paperwork, in percent
    #[arg(long, allow_negative_numbers = true)]
    pub docs_delay: Option<f64>,
    /// Average loading time per truck in minutes
    #[arg(long, allow_negative_numbers = true)]
    pub loading_minutes: Option<f64>,
    /// Override the number of loading bays
    #[arg(long)]
    pub total_bays: Option<u32>,
    /// Override the inside yard capacity
    #[arg(long)]
    pub inside_limit: Option<u32>,
    /// Override the outside queue capacity
    #[arg(long)]
    pub outside_limit: Option<u32>,
    /// Forecast reference time (RFC 3339); defaults to the snapshot time
    #[arg(long)]
    pub now: Option<String>,
}
