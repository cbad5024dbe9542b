use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("ownchat").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: ownchat <COMMAND>"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("--version"));
}

#[test]
fn test_cli_serve_help() {
    let mut cmd = Command::cargo_bin("ownchat").unwrap();
    cmd.arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: ownchat serve"))
        .stdout(predicate::str::contains("--port <PORT>"))
        .stdout(predicate::str::contains("--persona <PERSONA>"))
        .stdout(predicate::str::contains("--env-file <ENV_FILE>"))
        .stdout(predicate::str::contains("counselor"));
}

#[test]
fn test_cli_chat_help() {
    let mut cmd = Command::cargo_bin("ownchat").unwrap();
    cmd.arg("chat")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: ownchat chat"));
}

#[test]
fn test_cli_no_command() {
    let mut cmd = Command::cargo_bin("ownchat").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage: ownchat <COMMAND>"));
}

#[test]
fn test_cli_missing_env_file_fails() {
    let mut cmd = Command::cargo_bin("ownchat").unwrap();
    cmd.args(["chat", "--env-file", "/definitely/not/here/.env"])
        .env_remove("OWNCHAT_ENV_FILE")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not load .env file"));
}

#[test]
fn test_cli_empty_api_key_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let env_path = dir.path().join(".env");
    std::fs::write(&env_path, "OPENAI_MODEL=gpt-test\n").unwrap();

    let mut cmd = Command::cargo_bin("ownchat").unwrap();
    cmd.arg("chat")
        .arg("--env-file")
        .arg(&env_path)
        .env("OPENAI_API_KEY", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY is not set"));
}
