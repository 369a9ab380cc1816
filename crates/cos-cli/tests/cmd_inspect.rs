//! Integration tests for `cos inspect` and `cos version`.
#![allow(clippy::expect_used)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Path to the compiled `cos` binary.
fn cos_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("cos");
    path
}

fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(name);
    path.to_str().expect("utf-8 path").to_owned()
}

fn cos(args: &[&str]) -> Output {
    Command::new(cos_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run cos")
}

#[test]
fn inspect_human_shows_totals_and_outline() {
    let out = cos(&["inspect", &fixture("mini_league.json")]);
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("league:    Mini Football League"), "stdout: {text}");
    assert!(text.contains("season:    2023"), "stdout: {text}");
    assert!(text.contains("teams:     6"), "stdout: {text}");
    // g6 names an unknown team and is dropped.
    assert!(text.contains("games:     5 decided, 2 upcoming"), "stdout: {text}");
    assert!(
        text.contains("  Mini Football League > West Conference: 3 teams, 1 decided, 2 upcoming"),
        "stdout: {text}"
    );
    assert!(text.contains("Mini Football League (MFL)"), "stdout: {text}");
    assert!(text.contains("* Week 4 DRA vs ANC: 7-35"), "stdout: {text}");
    assert!(text.contains("? Week 7 Falcons vs DRA"), "stdout: {text}");
}

#[test]
fn inspect_json_is_one_object() {
    let out = cos(&["inspect", "-f", "json", &fixture("mini_league.json")]);
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(value["league"], "Mini Football League");
    assert_eq!(value["decided"], 5);
    assert_eq!(value["upcoming"], 2);
    let groups = value["groups"].as_array().expect("groups");
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0]["decided"], 1);
    assert_eq!(groups[1]["path"], serde_json::json!(["Mini Football League", "East Conference"]));
}

#[test]
fn inspect_malformed_json_exit_2() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"league\": ").expect("write");
    let out = cos(&["inspect", path.to_str().expect("utf-8 path")]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid season snapshot"), "stderr: {stderr}");
}

#[test]
fn version_prints_core_version() {
    let out = cos(&["version"]);
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert_eq!(text.trim().split('.').count(), 3, "stdout: {text}");
}
