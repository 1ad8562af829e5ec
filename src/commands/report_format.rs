use crate::domain::forecast::{ForecastBucket, ForecastResult};
use crate::domain::snapshot::HistoricalStats;

pub fn format_forecast_report(result: &ForecastResult, historical: Option<&HistoricalStats>) -> String {
    let mut lines = Vec::new();
    lines.push("Congestion Forecast".to_string());
    lines.push(format!("Generated at: {}", result.generated_at));
    lines.push(format!(
        "Congestion score: {} ({})",
        result.congestion_score,
        result.risk_level.label()
    ));
    lines.push(format!(
        "Base turnaround: {} min",
        result.derived_stats.avg_base_turnaround_min
    ));
    lines.push(format!("Historical turnaround: {}", format_historical(historical)));
    lines.push(String::new());
    lines.push("Window | Arrivals | Outside | Inside | Bays | Occupancy | Turnaround | Overflow".to_string());
    lines.push("-------|----------|---------|--------|------|-----------|------------|---------".to_string());
    lines.extend(result.buckets.iter().map(format_bucket_row));

    if !result.congestion_drivers.is_empty() {
        lines.push(String::new());
        lines.push("Drivers:".to_string());
        for driver in &result.congestion_drivers {
            lines.push(format!(
                "- {} ({}%): {}",
                driver.factor, driver.contribution_pct, driver.detail
            ));
        }
    }

    lines.push(String::new());
    lines.push("Recommendations:".to_string());
    for rec in &result.recommendations {
        lines.push(format!(
            "- [{}] {}: {} ({})",
            rec.priority.as_str(),
            rec.title,
            rec.description,
            rec.impact
        ));
    }

    lines.join("\n")
}

fn format_historical(historical: Option<&HistoricalStats>) -> String {
    match historical {
        Some(HistoricalStats {
            avg_turnaround_min: Some(minutes),
            sample_size,
        }) => format!("{minutes:.0} min over {sample_size} trucks"),
        _ => "n/a".to_string(),
    }
}

fn format_bucket_row(bucket: &ForecastBucket) -> String {
    let overflow = match (bucket.outside_overflow, bucket.inside_overflow) {
        (true, true) => "outside+inside",
        (true, false) => "outside",
        (false, true) => "inside",
        (false, false) => "-",
    };
    format!(
        "{} | {:.1} | {:.1} | {:.1} | {} | {}% | {} min | {}",
        bucket.label,
        bucket.expected_arrivals,
        bucket.queue_outside,
        bucket.queue_inside,
        bucket.bays_occupied,
        bucket.bay_occupancy_pct,
        bucket.avg_turnaround_minutes,
        overflow
    )
}

/// Side-by-side comparison of a default-parameter run and a scenario run
/// on the same snapshot.
pub fn format_what_if_report(baseline: &ForecastResult, scenario: &ForecastResult) -> String {
    let mut lines = Vec::new();
    lines.push("What-if Comparison".to_string());

    let changes = scenario.params.changed_from_default();
    if changes.is_empty() {
        lines.push("Changed parameters: none (scenario uses defaults)".to_string());
    } else {
        lines.push("Changed parameters:".to_string());
        for (name, value, default) in changes {
            lines.push(format!("- {name}: {default} -> {value}"));
        }
    }

    lines.push(String::new());
    lines.push("Metric | Baseline | Scenario | Delta".to_string());
    lines.push("-------|----------|----------|------".to_string());
    lines.push(format!(
        "Congestion score | {} ({}) | {} ({}) | {:+}",
        baseline.congestion_score,
        baseline.risk_level.label(),
        scenario.congestion_score,
        scenario.risk_level.label(),
        i64::from(scenario.congestion_score) - i64::from(baseline.congestion_score)
    ));
    lines.push(format_delta_row(
        "Peak outside queue",
        baseline.derived_stats.peak_outside_queue,
        scenario.derived_stats.peak_outside_queue,
    ));
    lines.push(format_delta_row(
        "Peak inside yard",
        baseline.derived_stats.peak_inside_queue,
        scenario.derived_stats.peak_inside_queue,
    ));
    lines.push(format_delta_row(
        "Peak bay occupancy %",
        f64::from(baseline.derived_stats.peak_bay_occupancy_pct),
        f64::from(scenario.derived_stats.peak_bay_occupancy_pct),
    ));
    lines.push(format_delta_row(
        "Base turnaround min",
        f64::from(baseline.derived_stats.avg_base_turnaround_min),
        f64::from(scenario.derived_stats.avg_base_turnaround_min),
    ));

    lines.join("\n")
}

fn format_delta_row(label: &str, baseline: f64, scenario: f64) -> String {
    format!("{label} | {baseline:.1} | {scenario:.1} | {:+.1}", scenario - baseline)
}
