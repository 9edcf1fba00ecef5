//! Tests for the `tp` binary

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

/// `tp` with an isolated config and log directory
fn tp(temp_dir: &TempDir) -> Command {
    let config_path = temp_dir.path().join("tripplanner.yml");
    std::fs::write(&config_path, "log-level: debug\n").expect("write config");

    let mut cmd = Command::cargo_bin("tp").expect("binary built");
    cmd.arg("--config")
        .arg(&config_path)
        .env("XDG_DATA_HOME", temp_dir.path())
        .env("HOME", temp_dir.path());
    cmd
}

#[test]
fn test_plan_json_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = tp(&temp_dir)
        .args([
            "plan", "-d", "Sri Lanka", "-n", "5", "-b", "500", "-i", "Surfing", "-i", "Heritage", "--seed", "42",
            "--format", "json",
        ])
        .output()
        .expect("run tp");
    assert!(output.status.success(), "plan should succeed: {:?}", output);

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(plan["days"].as_array().map(Vec::len), Some(5));
    assert_eq!(plan["totals"]["budget"], 500.0);
    assert_eq!(plan["seed"], 42);
    assert!(plan["fallbackLinks"]["agoda"].is_string());
}

#[test]
fn test_plan_text_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    tp(&temp_dir)
        .args(["plan", "-d", "Japan", "-n", "3", "-b", "900", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trip to Japan"))
        .stdout(predicate::str::contains("Day 3"))
        .stdout(predicate::str::contains("Seed: 1"));
}

#[test]
fn test_plan_unknown_destination_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    tp(&temp_dir)
        .args(["plan", "-d", "Nowhereland", "-n", "3", "-b", "300"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown destination"));
}

#[test]
fn test_destinations_lists_itineraries() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    tp(&temp_dir)
        .arg("destinations")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sri Lanka"))
        .stdout(predicate::str::contains("Japan"));
}

#[test]
fn test_hotels_search() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = tp(&temp_dir)
        .args(["hotels", "--city", "kandy", "--page-size", "2", "--format", "json"])
        .output()
        .expect("run tp");
    assert!(output.status.success());

    let page: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(page["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["total"], 4);
    assert_eq!(page["items"][0]["location"], "Kandy");
}

#[test]
fn test_hotel_lookup() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    tp(&temp_dir)
        .args(["hotel", "lk-ella-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ella"))
        .stdout(predicate::str::contains("Booking.com"));

    tp(&temp_dir).args(["hotel", "missing-id"]).assert().failure();
}

#[test]
fn test_prices_fall_back_without_endpoints() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = tp(&temp_dir)
        .args([
            "prices",
            "lk-ella-01",
            "--checkin",
            "2026-09-01",
            "--checkout",
            "2026-09-03",
            "--format",
            "json",
        ])
        .output()
        .expect("run tp");
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let providers: Vec<&str> = entries
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|e| e["provider"].as_str())
        .collect();
    assert_eq!(providers, vec!["agoda", "booking", "airbnb"]);
    assert!(entries.as_array().expect("array").iter().all(|e| e["status"] == "fallback"));
}
