//! End-to-end tests for the `ml` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Write a config that keeps all state inside `dir`
fn write_config(dir: &TempDir, extra: &str) -> String {
    let path = dir.path().join("milestones.yml");
    let state = dir.path().join("state.yml");
    let content = format!("state-path: {}\n{}", state.display(), extra);
    fs::write(&path, content).unwrap();
    path.display().to_string()
}

fn ml(config: &str) -> Command {
    let mut cmd = Command::cargo_bin("ml").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd.args(["--log-stderr", "--log-level", "error", "--config", config]);
    cmd
}

#[test]
fn test_level_prints_milestone() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");
    ml(&config)
        .args(["level", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gained level 50 in Agility!"))
        .stdout(predicate::str::contains("#ff981f"));
}

#[test]
fn test_level_uses_configured_templates() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        "levels:\n  text: \"$skill hit $level\"\n  color: null\n  show-on-levels: \"5\"\n",
    );
    ml(&config)
        .args(["level", "5", "herblore"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Herblore hit 5"))
        .stdout(predicate::str::contains("default"));
}

#[test]
fn test_level_rejects_non_milestone() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");
    ml(&config)
        .args(["level", "51"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Level 51 is not a milestone"));
}

#[test]
fn test_level_rejects_unknown_skill() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");
    ml(&config)
        .args(["level", "50", "dungeoneering"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown skill: dungeoneering"));
}

#[test]
fn test_config_prints_resolved_yaml() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "scheduler:\n  advance-on-close: true\n");
    ml(&config)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("advance-on-close: true"))
        .stdout(predicate::str::contains("open-on-enqueue: true"))
        .stdout(predicate::str::contains("show-virtual-levels: true"));
}

#[test]
fn test_missing_config_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.yml").display().to_string();
    ml(&missing).arg("config").assert().failure();
}

#[test]
fn test_announce_show_and_clear() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");
    ml(&config)
        .arg("announce")
        .assert()
        .success()
        .stdout(predicate::str::contains("No update notice shown yet"));

    fs::write(
        dir.path().join("state.yml"),
        "last-update-message: Milestone Levels v1.0.0\n",
    )
    .unwrap();
    ml(&config)
        .arg("announce")
        .assert()
        .success()
        .stdout(predicate::str::contains("Milestone Levels v1.0.0"));

    ml(&config).args(["announce", "--clear"]).assert().success();
    ml(&config)
        .arg("announce")
        .assert()
        .success()
        .stdout(predicate::str::contains("No update notice shown yet"));
}

#[test]
fn test_simulate_reports_shown_notifications() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");
    ml(&config)
        .args(["simulate", "--ticks", "80", "--tick-ms", "1", "--display-ticks", "2", "--burst", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bulk notification 1"))
        .stdout(predicate::str::contains("Milestone Levels v1.1.0"))
        .stdout(predicate::str::contains("Opened:"));
}
