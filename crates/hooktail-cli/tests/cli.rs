//! End-to-end tests of the hooktail binary.
//!
//! These run the real binary. Live-stream modes need a `juju` on PATH, so
//! everything here sticks to `--dry-run` and `--file` sources.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn emit_line(unit: &str, event: &str) -> String {
    let dashed = unit.replace('/', "-");
    format!("unit-{dashed}: 12:17:50 DEBUG unit.{unit}.juju-log Emitting Juju event {event}.")
}

fn hooktail() -> Command {
    Command::cargo_bin("hooktail").unwrap()
}

#[test]
fn help_lists_the_main_flags() {
    hooktail()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--show-defer"))
        .stdout(predicate::str::contains("--replay"))
        .stdout(predicate::str::contains("--printer"));
}

#[test]
fn dry_run_prints_the_log_command() {
    hooktail()
        .args(["--dry-run", "-m", "prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "juju debug-log -m prod --tail --level DEBUG",
        ));
}

#[test]
fn dry_run_without_watch_drops_the_tail_flag() {
    hooktail()
        .args(["--dry-run", "--no-watch", "--level", "warning"])
        .assert()
        .success()
        .stdout(predicate::str::contains("juju debug-log --level WARNING"))
        .stdout(predicate::str::contains("--tail").not());
}

#[test]
fn file_mode_tails_a_dump_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{}", emit_line("myapp/0", "install")).unwrap();
    writeln!(file, "{}", emit_line("myapp/0", "start")).unwrap();
    file.flush().unwrap();

    hooktail()
        .args(["--file", file.path().to_str().unwrap(), "--printer", "raw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("captured 2 events in 1 units."));
}

#[test]
fn file_mode_writes_the_requested_dump() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{}", emit_line("myapp/0", "install")).unwrap();
    file.flush().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("history.txt");

    hooktail()
        .args([
            "--file",
            file.path().to_str().unwrap(),
            "-o",
            dump.to_str().unwrap(),
        ])
        .assert()
        .success();

    let history = std::fs::read_to_string(&dump).unwrap();
    assert!(history.contains("install"));
    assert!(history.contains("Captured:"));
}

#[test]
fn untracked_units_never_reach_the_frame() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{}", emit_line("myapp/0", "install")).unwrap();
    writeln!(file, "{}", emit_line("noise/3", "update_status")).unwrap();
    file.flush().unwrap();

    hooktail()
        .args([
            "myapp/0",
            "--file",
            file.path().to_str().unwrap(),
            "--printer",
            "raw",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("noise/3").not())
        .stdout(predicate::str::contains("captured 1 events in 1 units."));
}

#[test]
fn missing_file_fails_with_an_open_error() {
    hooktail()
        .args(["--file", "/no/such/file.log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open log file"));
}
