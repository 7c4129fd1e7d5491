extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

#[test]
fn zoom_twice_and_pan_right() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("frame.ppm");
    Command::cargo_bin("mandeltile")
        .unwrap()
        .args(&["--size", "120x80", "--keys", "==d", "-q", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("scale: 4 x: 5 y: 0"));

    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"P6"));
}

#[test]
fn space_quits_before_later_keys() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("frame.ppm");
    Command::cargo_bin("mandeltile")
        .unwrap()
        .args(&["--size", "60x40", "--grid", "2x2", "--keys", "= =", "-q", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("scale: 2 x: 0 y: 0"));
}

#[test]
fn empty_frames_are_a_setup_failure() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("mandeltile")
        .unwrap()
        .args(&["--size", "0x40", "-q", "-o"])
        .arg(dir.path().join("frame.ppm"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Setup failure"));
}

#[test]
fn bad_grids_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("mandeltile")
        .unwrap()
        .args(&["--grid", "5x0", "-o"])
        .arg(dir.path().join("frame.ppm"))
        .assert()
        .failure();
}

#[test]
fn unwritable_output_is_a_render_failure() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("mandeltile")
        .unwrap()
        .args(&["--size", "20x20", "-q", "-o"])
        .arg(dir.path().join("missing").join("frame.ppm"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Render failure"));
}

#[test]
fn iteration_cap_is_bounded() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("mandeltile")
        .unwrap()
        .args(&["--iterations", "0", "-o"])
        .arg(dir.path().join("frame.ppm"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Iteration count must be between 1 and 200000"));
}
