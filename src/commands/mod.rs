pub mod base_commands;
pub mod forecast_cmd;
pub mod get_snapshot_cmd;
pub mod plot_forecast_cmd;
pub mod report_format;
pub mod what_if_cmd;
