use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn overmark_cmd() -> Command {
    Command::cargo_bin("overmark").expect("binary exists")
}

#[test]
fn help_prints_usage() {
    overmark_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Screen overlay annotation tool with a floating, auto-hiding toolbar",
        ));
}

#[test]
fn no_flags_prints_quick_start() {
    let temp = TempDir::new().unwrap();
    overmark_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .env("HOME", temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("overmark --daemon"))
        .stdout(predicate::str::contains("pkill -SIGUSR1 overmark"));
}

#[test]
fn replay_requires_output() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("script.json");
    std::fs::write(&script, "[]").unwrap();

    overmark_cmd()
        .arg("--replay")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn daemon_conflicts_with_replay() {
    overmark_cmd()
        .args(["--daemon", "--replay", "a.json", "--output", "a.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn replay_writes_png() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("script.json");
    let output = temp.path().join("out.png");
    std::fs::write(
        &script,
        r#"{
            "screen": [320, 200],
            "show_toolbar": true,
            "steps": [
                {"tool": "rectangle"},
                {"drag": [[10, 60], [120, 150]]},
                {"tool": "pen"},
                {"drag": [[150, 80], [300, 180]]}
            ]
        }"#,
    )
    .unwrap();

    overmark_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .env("HOME", temp.path())
        .arg("--replay")
        .arg(&script)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered 2 annotation(s)"));

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
}

#[test]
fn replay_reports_bad_script() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("script.json");
    std::fs::write(&script, r#"[{"teleport": [1, 2]}]"#).unwrap();

    overmark_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .env("HOME", temp.path())
        .arg("--replay")
        .arg(&script)
        .arg("--output")
        .arg(temp.path().join("out.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse replay script"));
}

#[test]
fn invalid_config_file_is_reported() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "[drawing\n").unwrap();

    overmark_cmd()
        .arg("--config-path")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}
