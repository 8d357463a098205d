#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("zamena-cli").unwrap();
    cmd.env_remove("ZAMENA_GROUP").env_remove("ZAMENA_CONFIG");
    cmd
}

fn write_baseline(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("baseline.json");
    fs::write(
        &path,
        r#"{"group": "РС02-24", "schedule": [
            {"day": "Monday", "pair": "1", "raw_time": "08:00-09:40", "room": "101", "subject": "Math"},
            {"day": "Monday", "pair": "2", "raw_time": "09:50-11:30", "room": "204", "subject": "History"},
            {"day": "Thursday", "pair": "1", "raw_time": "08:00-09:40", "room": "101", "subject": "Physics"}
        ]}"#,
    )
    .unwrap();
    path
}

#[test]
fn split_prints_both_halves() {
    cli()
        .args(["split", "08:00-09:40"])
        .assert()
        .success()
        .stdout("08:00 - 08:45\n08:55 - 09:40\n");
}

#[test]
fn check_url_reports_change_once() {
    let dir = tempdir().unwrap();
    let marker = dir.path().to_str().unwrap();
    let url = "https://example.org/zamena-16-10.docx";

    cli()
        .args(["check-url", url, "--marker-dir", marker])
        .assert()
        .success()
        .stdout("changed\n");
    cli()
        .args(["check-url", url, "--marker-dir", marker])
        .assert()
        .success()
        .stdout("unchanged\n");

    let stored = fs::read_to_string(dir.path().join("last_docx_url.txt")).unwrap();
    assert_eq!(stored, url);
}

#[test]
fn days_on_saturday_bridge_to_monday() {
    cli()
        .args(["--locale", "en", "days", "--today", "2026-10-17"])
        .assert()
        .success()
        .stdout("Saturday\nMonday\n");
}

#[test]
fn show_merges_replacements() {
    let dir = tempdir().unwrap();
    let baseline = write_baseline(dir.path());
    let replacements = dir.path().join("zamena.json");
    fs::write(
        &replacements,
        r#"{"group": "РС02-24", "schedule": [
            {"day": "Monday", "pair": "2", "to": {"subject": "Chemistry", "teacher": "Petrova"}}
        ]}"#,
    )
    .unwrap();
    let out_json = dir.path().join("out.json");

    cli()
        .args(["--locale", "en", "show", "--today", "2026-10-18"])
        .arg("--baseline")
        .arg(&baseline)
        .arg("--replacements")
        .arg(&replacements)
        .arg("--out-json")
        .arg(&out_json)
        .assert()
        .success()
        .stdout(predicate::str::contains("== Monday =="))
        .stdout(predicate::str::contains(
            "2 | 09:50-11:30 | 204 | Chemistry (Petrova) [instead of: History]",
        ));

    let written = fs::read_to_string(&out_json).unwrap();
    assert!(written.contains("\"replaced_subject\": \"History\""));
}

#[test]
fn show_without_periods_exits_with_two() {
    let dir = tempdir().unwrap();
    let baseline = write_baseline(dir.path());

    // Mardi : demain mercredi, absent du planning.
    cli()
        .args(["--locale", "en", "show", "--today", "2026-10-13"])
        .arg("--baseline")
        .arg(&baseline)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("No classes on Wednesday."));
}

#[test]
fn show_with_missing_baseline_warns() {
    let dir = tempdir().unwrap();
    cli()
        .args(["--locale", "en", "show", "--today", "2026-10-13"])
        .arg("--baseline")
        .arg(dir.path().join("absent.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Warning"))
        .stdout(predicate::str::contains("Schedule unavailable for group РС02-24."));
}

#[test]
fn invalid_date_is_rejected() {
    cli()
        .args(["days", "--today", "17/10/2026"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}
