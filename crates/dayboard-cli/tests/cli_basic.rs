//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with a throwaway config directory and
//! verify its outputs. Nothing here touches the network.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(config_home: &Path, args: &[&str], stdin: Option<&str>) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_dayboard"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("DAYBOARD_ENV")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    {
        let mut pipe = child.stdin.take().expect("stdin is piped");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
    }

    let output = child.wait_with_output().expect("wait for CLI");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output.status.code().unwrap_or(-1), stdout, stderr)
}

fn run(args: &[&str]) -> (i32, String, String) {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), args, None)
}

#[test]
fn test_calc_remaining() {
    let (code, out, _) = run(&["calc", "--today", "2025-01-01", "--date", "2025-01-15"]);
    assert_eq!(code, 0);
    assert!(out.contains("14 days remaining."), "{out}");
    assert!(out.contains("Target date: 2025-01-15"), "{out}");
}

#[test]
fn test_calc_passed() {
    let (code, out, _) = run(&["calc", "--today", "2025-01-10", "--date", "-3"]);
    assert_eq!(code, 0);
    assert!(out.contains("passed 3 days ago"), "{out}");
}

#[test]
fn test_calc_elapsed_start_day() {
    let (code, out, _) = run(&[
        "calc", "--today", "2025-05-05", "--date", "today", "--mode", "elapsed", "--title", "Gym",
    ]);
    assert_eq!(code, 0);
    assert!(out.contains("Today is the start day of Gym."), "{out}");
}

#[test]
fn test_calc_default_json() {
    let (code, out, _) = run(&["calc", "--today", "2025-05-05", "--json"]);
    assert_eq!(code, 0);
    let view: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(view["target_date"], "2025-06-04");
    assert_eq!(view["outcome"]["kind"], "remaining");
    assert_eq!(view["outcome"]["days"], 30);
    assert_eq!(view["mode"], "remaining");
}

#[test]
fn test_calc_bad_date() {
    let (code, _, err) = run(&["calc", "--date", "next friday"]);
    assert_ne!(code, 0);
    assert!(err.contains("error:"), "{err}");
}

#[test]
fn test_list_add_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let (code, out, _) = run_cli(
        dir.path(),
        &["list", "--today", "2025-03-01"],
        Some("add --date +14 Exam\nadd\nshow\nquit\n"),
    );
    assert_eq!(code, 0);
    assert!(out.contains("[1] Exam"), "{out}");
    assert!(out.contains("D-14 (2 weeks left)"), "{out}");
    assert!(out.contains("[2] New D-day"), "{out}");
    assert!(out.contains("D-7 (1 week left)"), "{out}");
}

#[test]
fn test_list_edit_save_delete() {
    let dir = tempfile::tempdir().unwrap();
    let script = "add Trip\nedit 1\nsave 1 --date today Beach trip\ndelete 1\nsave 1 Ghost\n";
    let (code, out, err) = run_cli(dir.path(), &["list", "--today", "2025-03-01", "--json"], Some(script));
    assert_eq!(code, 0);

    let frames: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(frames.len(), 4);
    assert!(frames[1]["view"]["editing"].is_string());
    let saved = &frames[2]["view"]["columns"][0][0];
    assert_eq!(saved["title"], "Beach trip");
    assert_eq!(saved["label"], "D-Day");
    assert!(frames[2]["view"]["editing"].is_null());
    assert_eq!(frames[3]["view"]["total"], 0);
    assert!(err.contains("no item at position 1"), "{err}");
}

#[test]
fn test_list_bad_line_keeps_session() {
    let dir = tempfile::tempdir().unwrap();
    let (code, out, err) = run_cli(
        dir.path(),
        &["list", "--today", "2025-03-01"],
        Some("frobnicate\nadd Still here\n"),
    );
    assert_eq!(code, 0);
    assert!(!err.is_empty());
    assert!(out.contains("Still here"), "{out}");
}

#[test]
fn test_prompt_requires_api_key() {
    let (code, out, err) = run(&["prompt", "--description", "a fox in snow", "--style", "anime"]);
    assert_eq!(code, 1);
    assert!(out.is_empty(), "{out}");
    assert!(err.contains("API key"), "{err}");
}

#[test]
fn test_prompt_options() {
    let (code, out, _) = run(&["prompt", "--options"]);
    assert_eq!(code, 0);
    assert!(out.contains("styles:"));
    assert!(out.contains("anime"));
}

#[test]
fn test_timer_rejects_unknown_duration() {
    let (code, _, err) = run(&["timer", "7"]);
    assert_eq!(code, 1);
    assert!(err.contains("not a preset duration"), "{err}");
}

#[test]
fn test_config_set_get() {
    let dir = tempfile::tempdir().unwrap();
    let (code, out, _) = run_cli(dir.path(), &["config", "get", "prompt.model"], None);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "gpt-4o-mini");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "timer.presets", "[1, 2]"], None);
    assert_eq!(code, 0);
    let (_, out, _) = run_cli(dir.path(), &["config", "get", "timer.presets"], None);
    assert_eq!(out.trim(), "[1,2]");

    let (code, _, err) = run_cli(dir.path(), &["config", "get", "timer.nope"], None);
    assert_eq!(code, 1);
    assert!(err.contains("unknown key"), "{err}");
}

#[test]
fn test_completions() {
    let (code, out, _) = run(&["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(out.contains("dayboard"));
}
