use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn consent(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("consent-cli").unwrap();
    cmd.current_dir(dir.path())
        .env("CONSENT_BANNER_DELAY_MS", "0")
        .env_remove("CONSENT_APP_ID")
        .env_remove("CONSENT_LOG");
    cmd
}

fn record_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join(".consent/cookie_consent_lscf_main")
}

fn stored(dir: &TempDir) -> Value {
    let raw = fs::read_to_string(record_path(dir)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn fresh_visit_shows_banner() {
    let dir = TempDir::new().unwrap();
    consent(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicates::str::contains("phase: banner"));
    assert!(!record_path(&dir).exists());
}

#[test]
fn accept_all_persists_record() {
    let dir = TempDir::new().unwrap();
    consent(&dir)
        .arg("accept-all")
        .assert()
        .success()
        .stdout(predicates::str::contains("analytics enabled"));

    let record = stored(&dir);
    assert_eq!(record["analytics"], true);
    let date = record["date"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(date).is_ok());
}

#[test]
fn reload_after_decision_skips_banner() {
    let dir = TempDir::new().unwrap();
    consent(&dir).arg("accept-all").assert().success();

    let output = consent(&dir).args(["status", "--json"]).output().unwrap();
    assert!(output.status.success());
    let state: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["phase"], "resolved");
    assert_eq!(state["banner_visible"], false);
    assert_eq!(state["decision"]["analytics"], true);
}

#[test]
fn configure_commits_checkbox_value() {
    let dir = TempDir::new().unwrap();
    consent(&dir)
        .args(["configure", "--analytics", "false"])
        .assert()
        .success()
        .stdout(predicates::str::contains("analytics disabled"));

    assert_eq!(stored(&dir)["analytics"], false);

    consent(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicates::str::contains("analytics: blocked"));
}

#[test]
fn configure_replaces_previous_decision() {
    let dir = TempDir::new().unwrap();
    consent(&dir).arg("accept-all").assert().success();
    consent(&dir)
        .args(["configure", "--analytics", "false"])
        .assert()
        .success();
    assert_eq!(stored(&dir)["analytics"], false);
}

#[test]
fn corrupt_record_falls_back_to_banner() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join(".consent")).unwrap();
    fs::write(record_path(&dir), "this is not json").unwrap();

    consent(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicates::str::contains("phase: banner"));
}

#[test]
fn record_with_unknown_fields_is_accepted() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join(".consent")).unwrap();
    fs::write(
        record_path(&dir),
        r#"{"date":"2024-11-05T08:00:12.345Z","analytics":false,"marketing":true}"#,
    )
    .unwrap();

    consent(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicates::str::contains("phase: resolved"))
        .stdout(predicates::str::contains("2024-11-05T08:00:12.345Z"));
}

#[test]
fn categories_before_and_after_decision() {
    let dir = TempDir::new().unwrap();
    consent(&dir)
        .arg("categories")
        .assert()
        .success()
        .stdout(predicates::str::contains("always active"))
        .stdout(predicates::str::contains("not decided"));

    consent(&dir)
        .args(["configure", "--analytics", "false"])
        .assert()
        .success();

    let output = consent(&dir)
        .args(["categories", "--json"])
        .output()
        .unwrap();
    let rows: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["category"], "necessary");
    assert_eq!(rows[0]["allowed"], true);
    assert_eq!(rows[0]["adjustable"], false);
    assert_eq!(rows[1]["category"], "analytics");
    assert_eq!(rows[1]["allowed"], false);
}

#[test]
fn reset_forgets_decision() {
    let dir = TempDir::new().unwrap();
    consent(&dir).arg("accept-all").assert().success();
    consent(&dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicates::str::contains("cookie_consent_lscf_main"));
    assert!(!record_path(&dir).exists());

    consent(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicates::str::contains("phase: banner"));
}

#[test]
fn app_id_selects_storage_key() {
    let dir = TempDir::new().unwrap();
    consent(&dir)
        .args(["--app-id", "portfolio_dark", "accept-all"])
        .assert()
        .success();
    assert!(dir.path().join(".consent/cookie_consent_portfolio_dark").exists());
    assert!(!record_path(&dir).exists());

    consent(&dir)
        .env("CONSENT_APP_ID", "portfolio_dark")
        .arg("status")
        .assert()
        .success()
        .stdout(predicates::str::contains("phase: resolved"));
}

#[test]
fn invalid_app_id_fails() {
    let dir = TempDir::new().unwrap();
    consent(&dir)
        .args(["--app-id", "../escape", "status"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid app id"));
}

#[test]
fn explicit_store_directory() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("profile");
    consent(&dir)
        .arg("--store")
        .arg(&store)
        .arg("accept-all")
        .assert()
        .success();
    assert!(store.join("cookie_consent_lscf_main").exists());
}

#[test]
fn unwritable_store_still_resolves_session() {
    let dir = TempDir::new().unwrap();
    // A regular file where the storage directory should be
    fs::write(dir.path().join(".consent"), "").unwrap();

    consent(&dir)
        .args(["accept-all", "--json"])
        .assert()
        .success()
        .stderr(predicates::str::contains("could not be stored"))
        .stdout(predicates::str::contains("\"saved\": false"));
}
