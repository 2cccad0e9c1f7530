#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RUFF_BLACK_PYPROJECT: &str = r#"
[project]
name = "demo"

[tool.ruff]
line-length = 100

[tool.black]
line-length = 88
"#;

fn sgs(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sgs-audit").unwrap();
    cmd.current_dir(dir.path())
        .arg("--project-root")
        .arg(dir.path())
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("ANTHROPIC_BASE_URL")
        .env_remove("SGS_AUDIT_MODEL")
        .env_remove("SGS_PROJECT_ROOT")
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) {
    std::fs::write(dir.path().join(name), content).unwrap();
}

fn report(dir: &TempDir) -> String {
    std::fs::read_to_string(dir.path().join("tool-config-audit.md")).unwrap()
}

// ---------------------------------------------------------------------------
// dry run
// ---------------------------------------------------------------------------

#[test]
fn dry_run_reports_ruff_black_conflict() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pyproject.toml", RUFF_BLACK_PYPROJECT);

    sgs(&dir)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 tool configurations"))
        .stdout(predicate::str::contains("Report written to"));

    let md = report(&dir);
    assert!(md.contains("Tool Configuration Audit Report"));
    assert!(md.contains("ruff"));
    assert!(md.contains("black"));
    assert!(md.contains("**Model:** dry-run-mock"));
    assert!(md.contains("- ruff (tool.ruff)"));
}

#[test]
fn dry_run_on_empty_project_still_reports_mock_conflict() {
    let dir = TempDir::new().unwrap();

    sgs(&dir).arg("--dry-run").assert().success();

    let md = report(&dir);
    assert!(md.contains("_No configurations discovered._"));
    assert!(md.contains("Line length mismatch between ruff and black"));
    assert!(!md.contains("**Affected configurations:**"));
}

#[test]
fn dry_run_ignores_real_key() {
    let dir = TempDir::new().unwrap();
    sgs(&dir)
        .env("ANTHROPIC_API_KEY", "sk-not-used")
        .env("ANTHROPIC_BASE_URL", "http://127.0.0.1:9")
        .arg("--dry-run")
        .assert()
        .success();
}

#[test]
fn output_flag_overrides_default_path() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("reports")).unwrap();

    sgs(&dir)
        .args(["--dry-run", "--output", "reports/audit.md"])
        .assert()
        .success();

    assert!(dir.path().join("reports/audit.md").exists());
    assert!(!dir.path().join("tool-config-audit.md").exists());
}

#[test]
fn existing_report_is_overwritten() {
    let dir = TempDir::new().unwrap();
    write(&dir, "tool-config-audit.md", "stale");

    sgs(&dir).arg("--dry-run").assert().success();

    assert!(report(&dir).starts_with("# Tool Configuration Audit Report"));
}

#[test]
fn json_flag_prints_result() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pyproject.toml", RUFF_BLACK_PYPROJECT);

    let out = sgs(&dir)
        .args(["--dry-run", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["model_used"], "dry-run-mock");
    assert_eq!(value["discovered_configs"].as_array().unwrap().len(), 2);
    assert_eq!(value["conflicts"][0]["tools"][0], "ruff");
    let ruff = value["discovered_configs"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["tool_name"] == "ruff")
        .unwrap();
    assert_eq!(ruff["config_section"], "tool.ruff");
    assert_eq!(ruff["config_data"]["line-length"], 100);
}

#[test]
fn flake8_multiline_ignore_reaches_json_output() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        ".flake8",
        "[flake8]\nmax-line-length = 88\nextend-ignore =\n    E203,\n    W503\nexclude = .git,__pycache__\n",
    );

    let out = sgs(&dir)
        .args(["--dry-run", "--json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning:").not())
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let flake8 = &value["discovered_configs"][0]["config_data"]["flake8"];
    assert_eq!(flake8["extend-ignore"], "E203,\nW503");
    assert_eq!(flake8["exclude"], ".git,__pycache__");
    assert_eq!(flake8.as_object().unwrap().len(), 3);
}

#[test]
fn verbose_lists_discovered_configs() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pyproject.toml", RUFF_BLACK_PYPROJECT);
    write(&dir, ".flake8", "[flake8]\nmax-line-length = 79\n");

    sgs(&dir)
        .args(["--dry-run", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- ruff (tool.ruff)"))
        .stdout(predicate::str::contains("- flake8 (root)"));
}

#[test]
fn apply_fixes_only_prints_notice() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pyproject.toml", RUFF_BLACK_PYPROJECT);

    sgs(&dir)
        .args(["--dry-run", "--apply-fixes"])
        .assert()
        .success()
        .stderr(predicate::str::contains("not implemented"));

    assert_eq!(
        std::fs::read_to_string(dir.path().join("pyproject.toml")).unwrap(),
        RUFF_BLACK_PYPROJECT
    );
}

#[test]
fn malformed_config_warns_but_succeeds() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pyproject.toml", "[tool.ruff\n");
    write(&dir, "mypy.ini", "[mypy]\nstrict = True\n");

    sgs(&dir)
        .arg("--dry-run")
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning:"))
        .stderr(predicate::str::contains("invalid TOML"));

    assert!(report(&dir).contains("- mypy (root)"));
}

// ---------------------------------------------------------------------------
// failures
// ---------------------------------------------------------------------------

#[test]
fn missing_api_key_fails_before_discovery() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pyproject.toml", "[tool.ruff\n");

    sgs(&dir)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: ANTHROPIC_API_KEY"))
        .stderr(predicate::str::contains("Warning:").not());

    assert!(!dir.path().join("tool-config-audit.md").exists());
}

#[test]
fn missing_output_directory_fails() {
    let dir = TempDir::new().unwrap();

    sgs(&dir)
        .args(["--dry-run", "--output", "no/such/dir/report.md"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: failed to write report"));
}

#[test]
fn invalid_settings_fail() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".sgs")).unwrap();
    write(&dir, ".sgs/audit.yaml", "max_tokens: 0\n");

    sgs(&dir)
        .arg("--dry-run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("max_tokens"));
}

#[test]
fn settings_output_is_used() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".sgs")).unwrap();
    write(&dir, ".sgs/audit.yaml", "output: custom-audit.md\n");

    sgs(&dir).arg("--dry-run").assert().success();

    assert!(dir.path().join("custom-audit.md").exists());
}

// ---------------------------------------------------------------------------
// live analysis against a mock API
// ---------------------------------------------------------------------------

fn messages_body(text: &str) -> String {
    serde_json::json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-5",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 900, "output_tokens": 150}
    })
    .to_string()
}

#[test]
fn live_run_uses_api_response() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pyproject.toml", RUFF_BLACK_PYPROJECT);

    let mut server = mockito::Server::new();
    let text = r#"{"conflicts": [
        {"severity": "LOW", "tools": ["black"], "description": "Minor thing"},
        {"severity": "HIGH", "tools": ["ruff", "black"], "description": "Line length differs"}
    ]}"#;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "sk-test")
        .with_status(200)
        .with_body(messages_body(text))
        .create();

    sgs(&dir)
        .env("ANTHROPIC_API_KEY", "sk-test")
        .env("ANTHROPIC_BASE_URL", server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 conflicts (HIGH 1, MEDIUM 0, LOW 1)"));

    mock.assert();
    let md = report(&dir);
    let high = md.find("[HIGH] Line length differs").unwrap();
    let low = md.find("[LOW] Minor thing").unwrap();
    assert!(high < low);
    assert!(md.contains("1050 (900 input, 150 output)"));
}

#[test]
fn live_run_fails_on_api_error() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(401)
        .with_body(r#"{"type":"error","error":{"type":"authentication_error"}}"#)
        .create();

    sgs(&dir)
        .env("ANTHROPIC_API_KEY", "sk-bad")
        .env("ANTHROPIC_BASE_URL", server.url())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: conflict analysis failed"))
        .stderr(predicate::str::contains("401"));

    assert!(!dir.path().join("tool-config-audit.md").exists());
}

#[test]
fn live_run_with_prose_answer_reports_no_conflicts() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(messages_body("No conflicts found."))
        .create();

    sgs(&dir)
        .env("ANTHROPIC_API_KEY", "sk-test")
        .env("ANTHROPIC_BASE_URL", server.url())
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning:"));

    assert!(report(&dir).contains("No conflicts detected"));
}
