use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;
use tokio::task;
use warp::Filter;
use warp::http::StatusCode;

fn forecast_data_response() -> serde_json::Value {
    serde_json::json!({
        "requestId": "req-42",
        "generatedAt": "2025-01-15T10:00:00.000Z",
        "currentState": {
            "currentBayOccupancy": 10,
            "currentInsideYard": 4,
            "currentOutsideQueue": 6,
            "totalBays": 18
        },
        "scheduledTrucks": [
            {
                "bookingId": "BK-001",
                "slotStartMinutesFromNow": -10,
                "slotEndMinutesFromNow": 20,
                "isAlreadyInTerminal": false,
                "productCategory": "LPG"
            },
            {
                "bookingId": "BK-002",
                "slotStartMinutesFromNow": 30,
                "slotEndMinutesFromNow": 60,
                "isAlreadyInTerminal": true,
                "productCategory": "POL"
            }
        ],
        "historicalStats": { "avgTurnaroundMin": 95, "sampleSize": 42 }
    })
}

fn write_config(socket_addr: std::net::SocketAddr) -> assert_fs::NamedTempFile {
    let config_yaml = format!("base_url: http://{socket_addr}\ntimeout_secs: 5\n");
    let config_file = assert_fs::NamedTempFile::new("terminal_config.yaml").unwrap();
    config_file.write_str(&config_yaml).unwrap();
    config_file
}

#[tokio::test]
async fn get_snapshot_writes_yaml() {
    // Arrange
    let response = forecast_data_response();
    let route = warp::path("api")
        .and(warp::path("forecast"))
        .and(warp::get())
        .and(warp::header::exact("authorization", "Bearer mocktoken"))
        .map(move || warp::reply::json(&response));
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    let config_file = write_config(addr);
    let output_file = assert_fs::NamedTempFile::new("snapshot.yaml").unwrap();
    let config_arg = config_file.path().to_str().unwrap().to_string();
    let output_arg = output_file.path().to_str().unwrap().to_string();

    // Act
    task::spawn_blocking(move || {
        let mut cmd = assert_cmd::cargo_bin_cmd!("terminal-forecast");
        cmd.env("TERMINAL_API_TOKEN", "mocktoken");
        cmd.args(["get-snapshot", "-c", &config_arg, "-o", &output_arg]);

        cmd.assert()
            .success()
            .stdout(predicate::str::contains("Snapshot written to"));
    })
    .await
    .unwrap();

    // Assert
    let output = fs::read_to_string(output_file.path()).unwrap();
    assert!(output.contains("current_bay_occupancy: 10.0"));
    assert!(output.contains("total_bays: 18"));
    assert!(output.contains("booking_id: BK-001"));
    assert!(output.contains("product_category: LPG"));
    assert!(output.contains("is_already_in_terminal: true"));
    assert!(output.contains("sample_size: 42"));
}

#[tokio::test]
async fn get_snapshot_reports_unauthorized() {
    let route = warp::path("api")
        .and(warp::path("forecast"))
        .map(|| warp::reply::with_status(warp::reply::json(&"no"), StatusCode::UNAUTHORIZED));
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    let config_file = write_config(addr);
    let output_file = assert_fs::NamedTempFile::new("snapshot.yaml").unwrap();
    let config_arg = config_file.path().to_str().unwrap().to_string();
    let output_arg = output_file.path().to_str().unwrap().to_string();

    task::spawn_blocking(move || {
        let mut cmd = assert_cmd::cargo_bin_cmd!("terminal-forecast");
        cmd.env("TERMINAL_API_TOKEN", "wrongtoken");
        cmd.args(["get-snapshot", "-c", &config_arg, "-o", &output_arg]);

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("Failed to fetch snapshot: unauthorized"));
    })
    .await
    .unwrap();

    output_file.assert(predicate::path::missing());
}

#[tokio::test]
async fn get_snapshot_requires_token() {
    let config_file = assert_fs::NamedTempFile::new("terminal_config.yaml").unwrap();
    config_file.write_str("base_url: http://127.0.0.1:9\n").unwrap();
    let config_arg = config_file.path().to_str().unwrap().to_string();

    task::spawn_blocking(move || {
        let mut cmd = assert_cmd::cargo_bin_cmd!("terminal-forecast");
        cmd.env_remove("TERMINAL_API_TOKEN");
        cmd.args(["get-snapshot", "-c", &config_arg, "-o", "unused.yaml"]);

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("unauthorized"));
    })
    .await
    .unwrap();
}
