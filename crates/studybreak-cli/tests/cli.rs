use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn studybreak(state_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("studybreak").unwrap();
    cmd.env_remove("STUDYBREAK_URL")
        .env("RUST_LOG", "off")
        .arg("--state-dir")
        .arg(state_dir.path());
    cmd
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("studybreak")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("monitor"))
        .stdout(predicate::str::contains("goal"))
        .stdout(predicate::str::contains("train"));
}

#[test]
fn goal_defaults_to_120_minutes() {
    let state_dir = TempDir::new().unwrap();
    studybreak(&state_dir)
        .args(["goal", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("120"));
}

#[test]
fn goal_set_persists_between_runs() {
    let state_dir = TempDir::new().unwrap();
    studybreak(&state_dir)
        .args(["goal", "set", "90"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session goal updated to 90 minutes"));

    studybreak(&state_dir)
        .args(["goal", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("90"));

    let state = std::fs::read_to_string(state_dir.path().join("ui-state.json")).unwrap();
    assert!(state.contains("\"session_goal\": 90"));
}

#[test]
fn out_of_range_goal_is_rejected() {
    let state_dir = TempDir::new().unwrap();
    studybreak(&state_dir)
        .args(["goal", "set", "500"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid goal"));

    studybreak(&state_dir)
        .args(["goal", "set", "0"])
        .assert()
        .failure();

    studybreak(&state_dir)
        .args(["goal", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("120"));
}

#[test]
fn notification_permission_is_persisted() {
    let state_dir = TempDir::new().unwrap();
    studybreak(&state_dir)
        .args(["notifications", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default"));

    studybreak(&state_dir)
        .args(["notifications", "deny"])
        .assert()
        .success();

    studybreak(&state_dir)
        .args(["notifications", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("denied"));
}

#[test]
fn invalid_preference_is_rejected_before_sending() {
    let state_dir = TempDir::new().unwrap();
    studybreak(&state_dir)
        .args(["prefs", "set", "--fatigue", "extreme", "--bias", "study"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid fatigue sensitivity"));
}

#[test]
fn unreachable_backend_fails_status() {
    let state_dir = TempDir::new().unwrap();
    studybreak(&state_dir)
        .args(["--url", "http://127.0.0.1:9", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not load status"));
}

#[test]
fn config_show_prints_resolved_url() {
    let state_dir = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("studybreak.yaml");
    std::fs::write(&config_path, "server:\n  base_url: http://10.1.2.3:5000\n").unwrap();

    studybreak(&state_dir)
        .arg("--config")
        .arg(&config_path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://10.1.2.3:5000"));
}

#[test]
fn act_help_points_to_monitor_for_cumulative_reward() {
    Command::cargo_bin("studybreak")
        .unwrap()
        .args(["act", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cumulative reward is tracked inside"));
}
