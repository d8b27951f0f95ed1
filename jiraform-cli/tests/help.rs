use assert_cmd::cargo::{self};
use predicates::str::contains;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("jiraform");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("jiraform"));
}

#[test]
fn schema_requires_a_database_id() {
    let mut cmd = cargo::cargo_bin_cmd!("jiraform");
    cmd.arg("schema").assert().failure();
}

#[test]
fn missing_token_reports_authentication() {
    let mut cmd = cargo::cargo_bin_cmd!("jiraform");
    cmd.env_remove("JIRA_PRIVATE_SECRET")
        .arg("databases")
        .assert()
        .failure()
        .stderr(contains("authentication required"));
}

#[test]
fn debug_log_reports_loaded_options() {
    let mut cmd = cargo::cargo_bin_cmd!("jiraform");
    cmd.env_remove("JIRA_PRIVATE_SECRET")
        .env("RUST_LOG", "debug")
        .arg("projects")
        .assert()
        .failure()
        .stderr(contains("options loaded"));
}
