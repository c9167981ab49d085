use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// `sb` with plain output against the given database
fn sb_cmd(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sb").expect("Failed to find sb binary");
    cmd.arg("--no-color")
        .arg("--database-file")
        .arg(db_path);
    cmd
}

/// `sb` acting as a specific user
fn sb_as(db_path: &Path, actor: &str, role: &str) -> Command {
    let mut cmd = sb_cmd(db_path);
    cmd.args(["--actor", actor, "--role", role]);
    cmd
}

/// Runs a command that must succeed and returns its stdout
fn run(mut cmd: Command, args: &[&str]) -> String {
    let output = cmd.args(args).assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("Invalid UTF-8")
}

/// Extracts the ID from a "Created <kind> with ID: <id>" line
fn extract_id_from_output(output: &str) -> String {
    let start = output
        .find("with ID: ")
        .map(|pos| pos + "with ID: ".len())
        .expect("No ID in output");
    output[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

#[test]
fn test_cli_create_topic_success() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    sb_cmd(&db_path)
        .args([
            "topic",
            "create",
            "Auth Module",
            "--description",
            "Login and sessions",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created topic with ID:"))
        .stdout(predicate::str::contains("## Auth Module"))
        .stdout(predicate::str::contains("Login and sessions"))
        .stdout(predicate::str::contains("0/0 completed"));
}

#[test]
fn test_cli_list_empty_topics() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    sb_cmd(&db_path)
        .args(["topic", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No topics found."));

    // No subcommand falls back to the topic list.
    sb_cmd(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Topics"));
}

#[test]
fn test_cli_subtopics_drive_progress() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    let output = run(sb_cmd(&db_path), &["topic", "create", "Billing"]);
    let topic_id = extract_id_from_output(&output);

    let output = run(sb_cmd(&db_path), &["subtopic", "add", &topic_id, "Invoices"]);
    let first = extract_id_from_output(&output);
    run(sb_cmd(&db_path), &["subtopic", "add", &topic_id, "Refunds"]);

    sb_cmd(&db_path)
        .args(["subtopic", "toggle", &topic_id, &first])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked completed"))
        .stdout(predicate::str::contains("50%"))
        .stdout(predicate::str::contains("in_progress"));

    sb_cmd(&db_path)
        .args(["topic", "show", &topic_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("1/2 completed"))
        .stdout(predicate::str::contains("✓ Completed Invoices"))
        .stdout(predicate::str::contains("○ Pending Refunds"));

    sb_cmd(&db_path)
        .args(["topic", "recompute", &topic_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress recomputed from 2 subtopics"));
}

#[test]
fn test_cli_delete_topic_requires_confirmation() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    let output = run(sb_cmd(&db_path), &["topic", "create", "Doomed"]);
    let topic_id = extract_id_from_output(&output);
    run(sb_cmd(&db_path), &["subtopic", "add", &topic_id, "Child"]);

    sb_cmd(&db_path)
        .args(["topic", "delete", &topic_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("--confirm"));

    sb_cmd(&db_path)
        .args(["topic", "delete", &topic_id, "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted topic 'Doomed'"));

    sb_cmd(&db_path)
        .args(["topic", "show", &topic_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    sb_cmd(&db_path)
        .args(["subtopic", "list", &topic_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("No subtopics yet."));
}

#[test]
fn test_cli_task_verification_gate() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    let output = run(
        sb_as(&db_path, "core", "core-employee"),
        &["task", "create", "Write docs", "--to", "emp", "--priority", "high"],
    );
    let task_id = extract_id_from_output(&output);

    run(sb_as(&db_path, "emp", "normal-employee"), &["task", "start", &task_id]);
    sb_as(&db_path, "emp", "normal-employee")
        .args(["task", "submit", &task_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("◎ Review"));

    sb_as(&db_path, "emp", "normal-employee")
        .args(["task", "verify", &task_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not allowed to verify tasks"));

    sb_as(&db_path, "core", "core-employee")
        .args(["--actor-name", "Ada", "task", "verify", &task_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Completed"))
        .stdout(predicate::str::contains("Verified by**: Ada"));

    sb_as(&db_path, "emp", "normal-employee")
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write docs"));
}

#[test]
fn test_cli_groups_and_resources() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    run(
        sb_cmd(&db_path),
        &["user", "add", "Linus", "--id", "emp", "--role", "normal-employee"],
    );
    let output = run(
        sb_cmd(&db_path),
        &["group", "create", "Backend", "--members", "emp,core", "--lead", "core"],
    );
    let group_id = extract_id_from_output(&output);

    sb_as(&db_path, "core", "core-employee")
        .args(["resource", "share", "Style guide", "--all-my-groups"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created resource with ID:"))
        .stdout(predicate::str::contains(group_id.as_str()));

    sb_as(&db_path, "emp", "normal-employee")
        .args(["resource", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Style guide"));

    sb_as(&db_path, "core", "core-employee")
        .args(["group", "eligible", &group_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Linus"));

    sb_as(&db_path, "loner", "intern")
        .args(["--reject-empty-fanout", "resource", "share", "Notes", "--all-my-groups"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("do not belong to any group"));
}

#[test]
fn test_cli_share_without_audience_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    sb_cmd(&db_path)
        .args(["resource", "share", "Orphan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("select at least one member"));
}
