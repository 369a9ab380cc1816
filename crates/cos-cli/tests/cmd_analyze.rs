//! Integration tests for `cos analyze`.
#![allow(clippy::expect_used)]

use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Path to the compiled `cos` binary.
fn cos_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    // current_exe is .../deps/cmd_analyze-<hash>; the binary is one level up.
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
        .env_remove("COS_CACHE_DIR")
        .env_remove("COS_MAX_TEAMS")
        .env_remove("COS_MAX_TEAMS_ALL")
        .env_remove("COS_STEP_BUDGET")
        .output()
        .expect("run cos")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// human mode
// ---------------------------------------------------------------------------

#[test]
fn confirmed_circle_in_conference() {
    let out = cos(&["analyze", &fixture("mini_league.json")]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(
        text.contains(
            "== Mini Football League > East Conference ==\n\
             Circle of Suck (3 teams):\n\
             Sep 2, 2023 Anchors -> Bears: 24-10\n\
             Sep 9, 2023 Bears -> Comets: 20-13\n\
             Sep 16, 2023 Comets -> Anchors: 31-28\n"
        ),
        "stdout: {text}"
    );
}

#[test]
fn potential_circle_marks_games_still_to_play() {
    let out = cos(&["analyze", &fixture("mini_league.json")]);
    let text = stdout(&out);
    assert!(
        text.contains(
            "== Mini Football League > West Conference ==\n\
             1 potential circle:\n\
             Potential circle 1 (2 games to play):\n\
             Sep 2, 2023 Dragons -> Eagles: 17-3\n\
             ********Oct 7, 2023 Eagles must defeat Falcons********\n\
             ********Oct 14, 2023 Falcons must defeat Dragons********\n"
        ),
        "stdout: {text}"
    );
}

#[test]
fn league_level_has_no_circle() {
    let out = cos(&["analyze", &fixture("mini_league.json")]);
    assert!(
        stdout(&out).starts_with("== Mini Football League ==\nNo circle of suck.\n"),
        "stdout: {}",
        stdout(&out)
    );
}

#[test]
fn no_circle_is_still_success() {
    let out = cos(&["analyze", &fixture("undefeated.json")]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "== Solo Conference ==\nNo circle of suck.\n");
}

#[test]
fn no_potential_flag_skips_extension() {
    let out = cos(&[
        "analyze",
        "--group",
        "West Conference",
        "--no-potential",
        &fixture("mini_league.json"),
    ]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "== Mini Football League > West Conference ==\nNo circle of suck.\n"
    );
}

#[test]
fn zero_potential_cap_keeps_the_count() {
    let out = cos(&[
        "analyze",
        "--group",
        "West Conference",
        "--max-potential",
        "0",
        &fixture("mini_league.json"),
    ]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "== Mini Football League > West Conference ==\n1 potential circle (showing 0):\n"
    );
}

#[test]
fn small_ceiling_skips_group() {
    let out = cos(&[
        "analyze",
        "--group",
        "Mini Football League",
        "--max-teams",
        "4",
        &fixture("mini_league.json"),
    ]);
    assert!(out.status.success());
    assert!(
        stdout(&out).contains("Skipped: 6 teams exceed the search limit of 4."),
        "stdout: {}",
        stdout(&out)
    );
}

#[test]
fn reads_snapshot_from_stdin() {
    let content = std::fs::read(fixture("mini_league.json")).expect("read fixture");
    let mut child = Command::new(cos_bin())
        .args(["analyze", "--group", "East Conference", "-"])
        .env_remove("RUST_LOG")
        .env_remove("COS_CACHE_DIR")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn cos");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(&content)
        .expect("write stdin");
    let out = child.wait_with_output().expect("wait");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("Circle of Suck (3 teams):"));
}

// ---------------------------------------------------------------------------
// json mode
// ---------------------------------------------------------------------------

#[test]
fn json_reports_every_group() {
    let out = cos(&["analyze", "--format", "json", &fixture("mini_league.json")]);
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    let reports = value.as_array().expect("array");
    let statuses: Vec<&str> = reports
        .iter()
        .map(|r| r["result"]["status"].as_str().expect("status"))
        .collect();
    assert_eq!(statuses, vec!["no_circle", "circle", "potential"]);

    let circle = &reports[1]["result"]["circle"];
    assert_eq!(circle["group_name"], "East Conference");
    let teams: Vec<&str> = circle["teams"]
        .as_array()
        .expect("teams")
        .iter()
        .map(|t| t["id"].as_str().expect("id"))
        .collect();
    assert_eq!(teams, vec!["1", "2", "3"]);
    assert_eq!(circle["games"][0]["home_abbreviation"], "ANC");
    assert!(circle.get("decided_game_ids").is_none());

    let potential = &reports[2]["result"]["circles"][0];
    assert_eq!(potential["decided_game_ids"], serde_json::json!(["g4"]));
    assert_eq!(potential["games"][1]["required_winner"], "5");
    assert!(potential["games"][1]["home_score"].is_null());
    // Falcons carry no abbreviation and fall back to their name.
    assert_eq!(potential["games"][1]["away_abbreviation"], "Falcons");
}

// ---------------------------------------------------------------------------
// cache directory
// ---------------------------------------------------------------------------

#[test]
fn cache_dir_stores_confirmed_circles() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = dir.path().to_str().expect("utf-8 path");
    let first = cos(&["analyze", "--cache-dir", cache, &fixture("mini_league.json")]);
    assert!(first.status.success(), "stderr: {}", stderr(&first));

    let stored = dir
        .path()
        .join("mini_football_league/2023/east_conference.json");
    let record: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&stored).expect("cached file")).expect("json");
    assert_eq!(record["status"], "circle");
    assert!(
        !dir.path()
            .join("mini_football_league/2023/west_conference.json")
            .exists()
    );

    let second = cos(&["analyze", "--cache-dir", cache, &fixture("mini_league.json")]);
    assert_eq!(stdout(&first), stdout(&second));
}

// ---------------------------------------------------------------------------
// logging and errors
// ---------------------------------------------------------------------------

#[test]
fn skipped_games_are_logged_unless_quiet() {
    let out = cos(&["analyze", &fixture("mini_league.json")]);
    assert!(stderr(&out).contains("skipping game g6"), "stderr: {}", stderr(&out));

    let out = cos(&["analyze", "-q", &fixture("mini_league.json")]);
    assert!(stderr(&out).is_empty(), "stderr: {}", stderr(&out));
}

#[test]
fn unknown_group_exit_1() {
    let out = cos(&["analyze", "--group", "North", &fixture("mini_league.json")]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("no group named 'North'"));
}

#[test]
fn missing_file_exit_2() {
    let out = cos(&["analyze", "/nonexistent/cos/season.json"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("file not found"));
}

#[test]
fn tied_score_is_invalid_snapshot() {
    let out = cos(&["analyze", &fixture("tied_score.json")]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("invalid season snapshot"), "stderr: {}", stderr(&out));
}

#[test]
fn oversized_input_exit_2() {
    let out = cos(&["analyze", "--max-file-size", "16", &fixture("mini_league.json")]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("file too large"));
}
