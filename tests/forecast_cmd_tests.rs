use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;

const SNAPSHOT_YAML: &str = r#"
generated_at: 2025-01-15T10:00:00Z
current_state:
  current_bay_occupancy: 14
  current_inside_yard: 6
  current_outside_queue: 9
  total_bays: 18
scheduled_trucks:
  - booking_id: BK-001
    slot_start_minutes_from_now: 0
    slot_end_minutes_from_now: 30
    product_category: LPG
  - booking_id: BK-002
    slot_start_minutes_from_now: 15
    slot_end_minutes_from_now: 45
  - booking_id: BK-003
    slot_start_minutes_from_now: 30
    slot_end_minutes_from_now: 60
    is_already_in_terminal: true
historical_stats:
  avg_turnaround_min: 95
  sample_size: 42
"#;

fn snapshot_file() -> assert_fs::NamedTempFile {
    let input_file = assert_fs::NamedTempFile::new("snapshot.yaml").unwrap();
    input_file.write_str(SNAPSHOT_YAML).unwrap();
    input_file
}

#[test]
fn forecast_writes_yaml_and_prints_report() {
    let input_file = snapshot_file();
    let output_file = assert_fs::NamedTempFile::new("forecast.yaml").unwrap();
    let input_arg = input_file.path().to_str().unwrap().to_string();
    let output_arg = output_file.path().to_str().unwrap().to_string();

    let mut cmd = assert_cmd::cargo_bin_cmd!("terminal-forecast");
    cmd.args(["forecast", "-i", &input_arg, "-o", &output_arg]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Congestion Forecast"))
        .stdout(predicate::str::contains("10:00–10:30 | "))
        .stdout(predicate::str::contains("Historical turnaround: 95 min over 42 trucks"))
        .stdout(predicate::str::contains("Forecast written to"));

    let output = fs::read_to_string(&output_arg).unwrap();
    assert!(output.contains("2025-01-15T10:00:00.000Z"));
    assert!(output.contains("congestion_score:"));
    assert!(output.contains("id: lpg_priority"));
    assert!(output.contains("docs_preclear"));
}

#[test]
fn forecast_writes_json_with_overrides() {
    let input_file = snapshot_file();
    let output_file = assert_fs::NamedTempFile::new("forecast.json").unwrap();
    let input_arg = input_file.path().to_str().unwrap().to_string();
    let output_arg = output_file.path().to_str().unwrap().to_string();

    let mut cmd = assert_cmd::cargo_bin_cmd!("terminal-forecast");
    cmd.args([
        "forecast",
        "-i",
        &input_arg,
        "-o",
        &output_arg,
        "--format",
        "json",
        "--docs-delay",
        "10",
        "--total-bays",
        "12",
        "--now",
        "2025-01-15T14:00:00+02:00",
    ]);
    cmd.assert().success();

    let output: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output_arg).unwrap()).unwrap();
    let buckets = output["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 4);
    assert_eq!(buckets[0]["label"], "14:00–14:30");
    assert!(buckets.iter().all(|b| b["bays_occupied"].as_u64().unwrap() <= 12));
    assert_eq!(output["params"]["docs_delay_pct"], 10.0);
    let recommendations = output["recommendations"].as_array().unwrap();
    assert!(recommendations.iter().all(|r| r["id"] != "docs_preclear"));
}

#[test]
fn forecast_reads_params_file() {
    let input_file = snapshot_file();
    let params_file = assert_fs::NamedTempFile::new("params.yaml").unwrap();
    params_file.write_str("slot_adherence_pct: 90\nrejection_pct: 5\n").unwrap();
    let output_file = assert_fs::NamedTempFile::new("forecast.yaml").unwrap();
    let output_arg = output_file.path().to_str().unwrap().to_string();

    let mut cmd = assert_cmd::cargo_bin_cmd!("terminal-forecast");
    cmd.args([
        "forecast",
        "-i",
        input_file.path().to_str().unwrap(),
        "-o",
        &output_arg,
        "--params",
        params_file.path().to_str().unwrap(),
    ]);
    cmd.assert().success();

    let output = fs::read_to_string(&output_arg).unwrap();
    assert!(output.contains("slot_adherence_pct: 90.0"));
    assert!(output.contains("rejection_pct: 5.0"));
    assert!(output.contains("docs_delay_pct: 25.0"));
}

#[test]
fn forecast_rejects_invalid_parameters() {
    let input_file = snapshot_file();
    let output_file = assert_fs::NamedTempFile::new("forecast.yaml").unwrap();

    let mut cmd = assert_cmd::cargo_bin_cmd!("terminal-forecast");
    cmd.args([
        "forecast",
        "-i",
        input_file.path().to_str().unwrap(),
        "-o",
        output_file.path().to_str().unwrap(),
        "--rejection",
        "150",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to compute forecast: invalid parameters"));
    output_file.assert(predicate::path::missing());
}

#[test]
fn forecast_rejects_reversed_slots() {
    let input_file = assert_fs::NamedTempFile::new("broken.yaml").unwrap();
    input_file
        .write_str(
            "generated_at: 2025-01-15T10:00:00Z\ncurrent_state: {}\nscheduled_trucks:\n  - booking_id: BAD\n    slot_start_minutes_from_now: 40\n    slot_end_minutes_from_now: 10\n",
        )
        .unwrap();
    let output_file = assert_fs::NamedTempFile::new("forecast.yaml").unwrap();

    let mut cmd = assert_cmd::cargo_bin_cmd!("terminal-forecast");
    cmd.args([
        "forecast",
        "-i",
        input_file.path().to_str().unwrap(),
        "-o",
        output_file.path().to_str().unwrap(),
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid slot for booking BAD"));
}
