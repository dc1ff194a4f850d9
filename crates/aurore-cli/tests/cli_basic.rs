//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_aurore"))
        .args(args)
        .env("AURORE_DATA_DIR", data_dir)
        .env_remove("AURORE_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    stdout
}

#[test]
fn test_fresh_install_starts_at_welcome() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(dir.path(), &["route", "start"]).trim(), "/welcome");
    assert!(run_ok(dir.path(), &["route", "check", "/profile"]).contains("redirect /welcome"));
}

#[test]
fn test_onboarding_flow() {
    let dir = tempfile::tempdir().unwrap();
    let d = dir.path();

    assert!(run_ok(d, &["onboard", "welcome"]).contains("Next: /questionnaire"));
    assert!(run_ok(d, &["route", "check", "/"]).contains("redirect /questionnaire"));

    let out = run_ok(
        d,
        &[
            "onboard",
            "questionnaire",
            "-a",
            "name=Ana",
            "-a",
            "bedtime=11:00 pm",
            "-a",
            "sleepGoal=deep",
        ],
    );
    assert!(out.contains("Next: /(tabs)"));

    assert_eq!(run_ok(d, &["route", "start"]).trim(), "/(tabs)");

    let profile: serde_json::Value =
        serde_json::from_str(&run_ok(d, &["profile", "show", "--json"])).unwrap();
    assert_eq!(profile["name"], "Ana");
    assert_eq!(profile["wakeupTime"], "6:00 am");
    assert_eq!(profile["sleepGoal"], "deep");
    assert_eq!(profile["hasCompletedOnboarding"], true);

    let flags: serde_json::Value =
        serde_json::from_str(&run_ok(d, &["onboard", "status"])).unwrap();
    assert_eq!(flags["onboarding_completed"], true);
}

#[test]
fn test_logout_sends_user_to_onboarding() {
    let dir = tempfile::tempdir().unwrap();
    let d = dir.path();
    run_ok(d, &["onboard", "welcome"]);
    run_ok(d, &["onboard", "questionnaire", "-a", "name=Ana"]);

    assert!(run_ok(d, &["profile", "logout"]).contains("Next: /onboarding"));
    assert!(run_ok(d, &["route", "check", "/(tabs)/sleep"]).contains("redirect /onboarding"));

    run_ok(d, &["onboard", "complete", "--wake", "7:00 am"]);
    assert_eq!(run_ok(d, &["route", "start"]).trim(), "/(tabs)");
}

#[test]
fn test_unknown_question_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["onboard", "questionnaire", "-a", "shoe=42"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: unknown question 'shoe'"));
}

#[test]
fn test_sleep_tracking_records_night() {
    let dir = tempfile::tempdir().unwrap();
    let d = dir.path();
    run_ok(d, &["sleep", "start", "--at", "2025-03-01 22:30"]);
    assert!(run_ok(d, &["sleep", "status"]).contains("Tracking since 2025-03-01 22:30"));

    let (_, stderr, code) = run_cli(d, &["sleep", "start", "--at", "2025-03-01 23:00"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("already started"));

    let out = run_ok(d, &["sleep", "stop", "--at", "2025-03-02 06:45"]);
    assert!(out.contains("2025-03-02: 8.3 hours (Excellent)"));

    let log: serde_json::Value =
        serde_json::from_str(&run_ok(d, &["sleep", "log", "--month", "2025-03", "--json"]))
            .unwrap();
    assert_eq!(log.as_array().unwrap().len(), 1);
    assert_eq!(log[0]["bedtime"], "22:30");
}

#[test]
fn test_template_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let d = dir.path();
    run_ok(
        d,
        &["template", "add", "Weekday", "--bedtime", "10:00 pm", "--wake", "6:00 am"],
    );

    let list: serde_json::Value =
        serde_json::from_str(&run_ok(d, &["template", "list", "--json"])).unwrap();
    let template = &list[0];
    assert_eq!(template["type"], "Restorative sleep");
    assert_eq!(template["hours"], 8.0);
    let id = template["id"].as_str().unwrap().to_string();

    let updated: serde_json::Value = serde_json::from_str(&run_ok(
        d,
        &["template", "update", &id, "--kind", "lucid"],
    ))
    .unwrap();
    assert_eq!(updated["type"], "Lucid dreams");

    run_ok(d, &["template", "delete", &id]);
    let (_, stderr, code) = run_cli(d, &["template", "delete", &id]);
    assert_eq!(code, 1);
    assert!(stderr.contains("template not found"));
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let d = dir.path();
    assert_eq!(run_ok(d, &["config", "get", "form.navigation"]).trim(), "one-way");
    run_ok(d, &["config", "set", "form.navigation", "back-enabled"]);
    assert_eq!(
        run_ok(d, &["config", "get", "form.navigation"]).trim(),
        "back-enabled"
    );

    let (_, _, code) = run_cli(d, &["config", "set", "form.navigation", "sideways"]);
    assert_eq!(code, 1);
    let (_, _, code) = run_cli(d, &["config", "get", "form.nope"]);
    assert_eq!(code, 1);
}

#[test]
fn test_home_summary() {
    let dir = tempfile::tempdir().unwrap();
    let d = dir.path();
    let dash: serde_json::Value =
        serde_json::from_str(&run_ok(d, &["home", "--json"])).unwrap();
    assert_eq!(dash["templateCount"], 0);
    assert_eq!(dash["tracking"]["isTracking"], false);
}
