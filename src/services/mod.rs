pub mod arrival_model;
pub mod bucket_aggregation;
pub mod congestion_scoring;
pub mod data_source;
pub mod flow_simulation;
pub mod forecast_engine;
pub mod forecast_plot;
pub mod recommendations;
pub mod snapshot_yaml;
pub mod terminal_api;
