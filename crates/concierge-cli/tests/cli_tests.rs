use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color flag for testing
fn concierge_cmd() -> Command {
    let mut cmd = Command::cargo_bin("concierge").expect("Failed to find concierge binary");
    cmd.arg("--no-color");
    cmd.env_remove("CONCIERGE_SESSION");
    cmd.env_remove("CONCIERGE_SERVICE_URL");
    cmd.env_remove("CONCIERGE_SERVICE_TOKEN");
    cmd
}

#[test]
fn test_cli_catalog_planning_flight() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    concierge_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "catalog",
            "planning",
            "flight",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checking session"))
        .stdout(predicate::str::contains("Preparing proposal"));
}

#[test]
fn test_cli_catalog_booking_ride_omits_flight_steps() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    concierge_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "catalog",
            "booking",
            "ride",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Confirming booking"))
        .stdout(predicate::str::contains("Assigning seats").not());
}

#[test]
fn test_cli_catalog_rejects_unknown_kind() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    concierge_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "catalog",
            "planning",
            "train",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported booking type"));
}

#[test]
fn test_cli_plan_without_session_fails_at_authenticate() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    // No session token: the run must fail at the first step, before any
    // request reaches the resolution service.
    concierge_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "plan",
            "two tickets to Tokyo in October",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗ Checking session"))
        .stderr(predicate::str::contains("no active session"));
}

#[test]
fn test_cli_book_missing_record_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    concierge_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "book",
            "bk-does-not-exist",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_show_missing_record_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    concierge_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "show",
            "bk-missing",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
