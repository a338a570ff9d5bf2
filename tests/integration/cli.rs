//! Tests that run the `session-logger` binary

use session_logger::host::NO_LOG_YET;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

struct CliEnv {
    temp: TempDir,
    config: PathBuf,
    log: PathBuf,
}

fn cli_env() -> CliEnv {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(
        &config,
        r#"
[[runners]]
extensions = ["sh"]
program = "sh"
"#,
    )
    .unwrap();
    let log = temp.path().join("docs").join("Activity-Session-Log.txt");
    CliEnv { temp, config, log }
}

fn command(env: &CliEnv, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_session-logger"));
    cmd.arg("--config")
        .arg(&env.config)
        .arg("--log-file")
        .arg(&env.log)
        .args(args)
        .env("USER", "cli-user")
        .env_remove("SESSION_LOGGER_LOG");
    cmd
}

fn watch(env: &CliEnv, focus: Option<&Path>, events: &str) -> Output {
    let mut args = vec!["watch"];
    let focus_arg;
    if let Some(path) = focus {
        focus_arg = path.display().to_string();
        args.extend(["--focus", focus_arg.as_str()]);
    }
    let mut child = command(env, &args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn session-logger");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(events.as_bytes())
        .unwrap();
    child.wait_with_output().expect("wait for session-logger")
}

#[cfg(unix)]
#[test]
fn test_watch_records_full_session() {
    let env = cli_env();
    let a = env.temp.path().join("a.sh");
    let b = env.temp.path().join("b.sh");
    std::fs::write(&b, "echo from b\n").unwrap();

    let events = format!(
        "{{\"event\":\"focus_changed\",\"path\":\"{a}\"}}\n\
         {{\"event\":\"focus_changed\",\"path\":\"{b}\"}}\n\
         {{\"event\":\"document_changed\",\"path\":\"{b}\",\"changes\":1}}\n\
         {{\"event\":\"document_saved\",\"path\":\"{b}\"}}\n\
         {{\"event\":\"shutdown\"}}\n",
        a = a.display(),
        b = b.display()
    );
    let output = watch(&env, Some(&a), &events);
    assert!(output.status.success(), "{output:?}");

    let content = std::fs::read_to_string(&env.log).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert!(lines[0].starts_with("Session started at:"));
    assert!(lines[1].starts_with(&format!(
        "cli-user has switched into the following file: {}, at this time: ",
        b.display()
    )));
    assert!(lines[2].starts_with(&format!("cli-user has edited the file {}", b.display())));
    assert!(lines[3].starts_with(&format!(
        "cli-user ran file: {} in normal mode with result: success at ",
        b.display()
    )));
    assert!(lines[5].starts_with("Session ended at:"));
    assert!(content.ends_with(&format!("{}\n\n", "=".repeat(50))));
}

#[test]
fn test_watch_ends_session_on_eof() {
    let env = cli_env();
    let output = watch(&env, None, "not even json\n");
    assert!(output.status.success());

    let content = std::fs::read_to_string(&env.log).unwrap();
    assert!(content.starts_with("Session started at:"));
    assert!(content.contains("\nSession ended at:"));
}

#[test]
fn test_watch_open_log_notifies_path() {
    let env = cli_env();
    let output = watch(&env, None, "{\"event\":\"open_log\"}\n");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let note: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(note["level"], "info");
    assert_eq!(note["path"], env.log.display().to_string());
}

#[test]
fn test_open_without_log() {
    let env = cli_env();
    let output = command(&env, &["open"]).env("NO_COLOR", "1").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(NO_LOG_YET));
    assert!(!env.log.exists());
}

#[test]
fn test_open_prints_existing_log() {
    let env = cli_env();
    std::fs::create_dir_all(env.log.parent().unwrap()).unwrap();
    std::fs::write(&env.log, "Session started at:2025/01/01 00:00:00\n").unwrap();

    let output = command(&env, &["open"]).output().unwrap();
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "Session started at:2025/01/01 00:00:00\n"
    );
}

#[test]
fn test_path_prints_log_location() {
    let env = cli_env();
    let output = command(&env, &["path"]).output().unwrap();
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim(),
        env.log.display().to_string()
    );
}

#[test]
fn test_bad_config_fails_before_session() {
    let env = cli_env();
    std::fs::write(&env.config, "run_timeout_ms = \"soon\"\n").unwrap();
    let output = watch(&env, None, "");
    assert!(!output.status.success());
    assert!(!env.log.exists());
}
