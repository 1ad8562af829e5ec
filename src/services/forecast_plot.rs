use crate::domain::forecast::{ForecastBucket, ForecastResult};
use crate::domain::terminal::TerminalLimits;
use plotters::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastPlotError {
    #[error("forecast has no buckets")]
    EmptyForecast,
    #[error("failed to render forecast chart: {0}")]
    Plot(String),
}

const OUTSIDE_COLOR: RGBColor = RGBColor(214, 96, 77);
const INSIDE_COLOR: RGBColor = RGBColor(30, 122, 204);
const BAYS_COLOR: RGBColor = RGBColor(60, 60, 60);
const OVERFLOW_COLOR: RGBColor = RGBColor(180, 20, 20);

pub async fn plot_forecast_png(
    output_path: &str,
    forecast: &ForecastResult,
    limits: &TerminalLimits,
) -> Result<(), ForecastPlotError> {
    if forecast.buckets.is_empty() {
        return Err(ForecastPlotError::EmptyForecast);
    }
    let output_path = output_path.to_string();
    let buckets = forecast.buckets.clone();
    let caption = format!(
        "Congestion forecast: score {} ({})",
        forecast.congestion_score,
        forecast.risk_level.label()
    );
    let limits = *limits;
    tokio::task::spawn_blocking(move || render_forecast_png(&output_path, &caption, &buckets, &limits))
        .await
        .map_err(|e| ForecastPlotError::Plot(e.to_string()))??;
    Ok(())
}

fn render_forecast_png(
    output_path: &str,
    caption: &str,
    buckets: &[ForecastBucket],
    limits: &TerminalLimits,
) -> Result<(), ForecastPlotError> {
    let max_value = buckets
        .iter()
        .flat_map(|bucket| {
            [
                bucket.queue_outside,
                bucket.queue_inside,
                f64::from(bucket.bays_occupied),
            ]
        })
        .chain([limits.outside(), limits.inside(), limits.bays()])
        .fold(0.0_f64, f64::max);
    let max_y = (max_value * 1.1).ceil().max(1.0);
    let max_x = buckets.len() as f64;

    let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ForecastPlotError::Plot(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(caption, ("sans-serif", 28))
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(0.0..max_x, 0.0..max_y)
        .map_err(|e| ForecastPlotError::Plot(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Time window")
        .y_desc("Trucks")
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 22))
        .x_labels(buckets.len() * 2 + 1)
        .x_label_formatter(&|x| {
            // Labels sit at the centre of each bucket.
            let idx = (*x - 0.5).round();
            if idx < 0.0 || (*x - 0.5 - idx).abs() > 0.01 {
                return String::new();
            }
            buckets
                .get(idx as usize)
                .map(|bucket| bucket.label.clone())
                .unwrap_or_default()
        })
        .draw()
        .map_err(|e| ForecastPlotError::Plot(e.to_string()))?;

    let outside_style = ShapeStyle::from(&OUTSIDE_COLOR).filled();
    chart
        .draw_series(buckets.iter().enumerate().map(|(idx, bucket)| {
            let x = idx as f64;
            Rectangle::new([(x + 0.1, 0.0), (x + 0.45, bucket.queue_outside)], outside_style.clone())
        }))
        .map_err(|e| ForecastPlotError::Plot(e.to_string()))?
        .label("Outside queue")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], OUTSIDE_COLOR.filled()));

    let inside_style = ShapeStyle::from(&INSIDE_COLOR).filled();
    chart
        .draw_series(buckets.iter().enumerate().map(|(idx, bucket)| {
            let x = idx as f64;
            Rectangle::new([(x + 0.55, 0.0), (x + 0.9, bucket.queue_inside)], inside_style.clone())
        }))
        .map_err(|e| ForecastPlotError::Plot(e.to_string()))?
        .label("Inside yard")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], INSIDE_COLOR.filled()));

    chart
        .draw_series(LineSeries::new(
            buckets
                .iter()
                .enumerate()
                .map(|(idx, bucket)| (idx as f64 + 0.5, f64::from(bucket.bays_occupied))),
            BAYS_COLOR.stroke_width(3),
        ))
        .map_err(|e| ForecastPlotError::Plot(e.to_string()))?
        .label("Bays occupied")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], BAYS_COLOR.stroke_width(3)));

    for (limit, color) in [(limits.outside(), OUTSIDE_COLOR), (limits.inside(), INSIDE_COLOR)] {
        chart
            .draw_series(LineSeries::new([(0.0, limit), (max_x, limit)], color.stroke_width(1)))
            .map_err(|e| ForecastPlotError::Plot(e.to_string()))?;
    }

    // Overflowing windows get a marker above their bars.
    chart
        .draw_series(
            buckets
                .iter()
                .enumerate()
                .filter(|(_, bucket)| bucket.outside_overflow || bucket.inside_overflow)
                .map(|(idx, bucket)| {
                    let top = bucket.queue_outside.max(bucket.queue_inside);
                    TriangleMarker::new((idx as f64 + 0.5, top + max_y * 0.04), 8, OVERFLOW_COLOR.filled())
                }),
        )
        .map_err(|e| ForecastPlotError::Plot(e.to_string()))?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 16))
        .draw()
        .map_err(|e| ForecastPlotError::Plot(e.to_string()))?;

    root.present()
        .map_err(|e| ForecastPlotError::Plot(e.to_string()))?;
    Ok(())
}
