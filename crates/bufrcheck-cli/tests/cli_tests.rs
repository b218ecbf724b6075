use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn bufrcheck(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bufrcheck"))
        .args(args)
        .arg("--no-color")
        .current_dir(dir)
        .env("HOME", dir)
        .output()
        .expect("failed to run bufrcheck")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_clean_template_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ok.txt"), "102002 001001 001002\n").unwrap();

    let out = bufrcheck(dir.path(), &["check", "ok.txt"]);

    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("ok ok.txt"));
}

#[test]
fn test_diagnostics_exit_one() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("short.txt"), "102003 001001\n").unwrap();

    let out = bufrcheck(dir.path(), &["check", "short.txt"]);

    assert_eq!(out.status.code(), Some(1));
    let text = stdout(&out);
    assert!(text.contains("iteration error: expected 2, got 1"));
    assert!(text.contains("--> short.txt:1:1"));
}

#[test]
fn test_missing_file_exits_two() {
    let dir = tempfile::tempdir().unwrap();

    let out = bufrcheck(dir.path(), &["check", "nope.txt"]);

    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to open nope.txt"));
    assert!(out.stdout.is_empty());
}

#[test]
fn test_json_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "001001 ?? 102002 001001\n").unwrap();

    let out = bufrcheck(dir.path(), &["check", "--format", "json", "a.txt"]);
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert_eq!(json["clean"], false);
    assert_eq!(json["reports"][0]["name"], "a.txt");
    assert_eq!(json["reports"][0]["syntax"].as_array().unwrap().len(), 1);
    assert_eq!(json["reports"][0]["iteration"].as_array().unwrap().len(), 1);
}

#[test]
fn test_quiet_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("short.txt"), "103001 001001").unwrap();

    let out = bufrcheck(dir.path(), &["check", "-q", "short.txt"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
}

#[test]
fn test_rc_file_selects_json() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".bufrcheckrc"), "[output]\nformat = \"json\"\n").unwrap();
    fs::write(dir.path().join("ok.txt"), "001001").unwrap();

    let out = bufrcheck(dir.path(), &["check", "ok.txt"]);
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

    assert_eq!(json["clean"], true);
}

#[test]
fn test_tree_and_tokens() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("t.txt"), "101002 001001 001002").unwrap();

    let tree = bufrcheck(dir.path(), &["tree", "t.txt"]);
    assert_eq!(tree.status.code(), Some(0));
    assert!(stdout(&tree).contains("101002 replication width=1 count=2"));

    let tokens = bufrcheck(dir.path(), &["tokens", "t.txt"]);
    assert_eq!(stdout(&tokens).lines().count(), 4);
}

#[test]
fn test_config_init() {
    let dir = tempfile::tempdir().unwrap();

    let first = bufrcheck(dir.path(), &["config", "--init"]);
    assert_eq!(first.status.code(), Some(0));
    assert!(dir.path().join(".bufrcheckrc").is_file());

    let second = bufrcheck(dir.path(), &["config", "--init"]);
    assert_eq!(second.status.code(), Some(1));

    let show = bufrcheck(dir.path(), &["config"]);
    assert!(stdout(&show).contains("output.format = text"));
}

#[test]
fn test_several_files_on_workers() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "001001").unwrap();
    fs::write(dir.path().join("b.txt"), "101000 031001 001002").unwrap();

    let out = bufrcheck(dir.path(), &["check", "-j", "2", "a.txt", "b.txt"]);
    let text = stdout(&out);

    assert_eq!(out.status.code(), Some(0));
    assert!(text.find("ok a.txt").unwrap() < text.find("ok b.txt").unwrap());
    assert!(text.contains("2 checked, 0 with errors, 0 errors"));
}

#[test]
fn test_one_unreadable_file_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "102003 001001").unwrap();

    let out = bufrcheck(dir.path(), &["check", "a.txt", "missing.txt"]);

    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to open missing.txt"));
}
