use crate::commands::base_commands::Commands;
use crate::commands::forecast_cmd::ForecastCommandError;
use crate::services::data_source::SnapshotSource;
use crate::services::snapshot_yaml::serialize_snapshot_to_yaml;
use crate::services::terminal_api::{AuthData, TerminalApiClient, TerminalApiConfig};

pub async fn get_snapshot_command(cmd: Commands) -> Result<(), ForecastCommandError> {
    if let Commands::GetSnapshot { config, output } = cmd {
        let config = TerminalApiConfig::from_yaml_file(&config)?;
        let auth = AuthData::from_env()?;
        let client = TerminalApiClient::new(config, auth)?;
        write_snapshot(&client, &output).await?;
        println!("Snapshot written to {output}");
    }
    Ok(())
}

pub async fn write_snapshot<S: SnapshotSource>(
    source: &S,
    output: &str,
) -> Result<(), ForecastCommandError> {
    let snapshot = source.fetch_snapshot().await?;
    let mut buffer = Vec::new();
    serialize_snapshot_to_yaml(&mut buffer, &snapshot)?;
    tokio::fs::write(output, buffer).await?;
    Ok(())
}
