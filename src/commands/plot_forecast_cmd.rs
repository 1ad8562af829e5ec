use crate::commands::base_commands::Commands;
use crate::commands::forecast_cmd::{ForecastCommandError, build_forecast_input, load_snapshot};
use crate::services::forecast_engine::compute_forecast;
use crate::services::forecast_plot::plot_forecast_png;

pub async fn plot_forecast_command(cmd: Commands) -> Result<(), ForecastCommandError> {
    if let Commands::PlotForecast {
        input,
        output,
        scenario,
    } = cmd
    {
        let snapshot = load_snapshot(&input).await?;
        let forecast_input = build_forecast_input(&snapshot, &scenario)?;
        let result = compute_forecast(&forecast_input);
        plot_forecast_png(&output, &result, &forecast_input.limits()).await?;
        println!("Forecast chart written to {output}");
    }
    Ok(())
}
