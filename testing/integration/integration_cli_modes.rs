//! End-to-end tests of the `lametest` binary
//!
//! Each test runs the built binary inside a scratch directory holding fake
//! encoder scripts, then checks stdout, the exit status and the files left
//! behind.

#![cfg(unix)]

use std::path::Path;
use std::process::{Command, Output};
use util::{write_fake_encoder, write_input, write_options_file, FakeEncoder};

fn lametest(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lametest"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run lametest")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_no_arguments_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let output = lametest(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0), "usage errors are an ordinary exit");
    let text = stdout(&output);
    assert!(text.starts_with("Not enough arguments.\n"));
    assert!(text.contains("Mode 1. Compare output of 'lame1' and 'lame2':"));
    assert!(text.contains("-w   convert mp3's to wav's before comparison"));
}

#[test]
fn test_too_many_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let output = lametest(dir.path(), &["a", "b", "c", "d", "e"]);

    assert_eq!(output.status.code(), Some(0), "usage errors are an ordinary exit");
    assert!(stdout(&output).starts_with("Too many arguments.\n"));
}

#[test]
fn test_make_reference_rejects_second_encoder() {
    let dir = tempfile::tempdir().unwrap();
    let output = lametest(dir.path(), &["-m", "opts", "song.wav", "lame1", "lame2"]);

    assert_eq!(output.status.code(), Some(0), "usage errors are an ordinary exit");
    assert!(
        stdout(&output)
            .starts_with("\nGenerating reference output\nToo many arguments for -m mode.\n"),
        "the -m banner comes before argument checking: {}",
        stdout(&output)
    );
}

#[test]
fn test_unknown_flag_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let output = lametest(dir.path(), &["-x", "opts", "song.wav", "lame1"]);

    assert_eq!(output.status.code(), Some(0), "usage errors are an ordinary exit");
    let text = stdout(&output);
    assert!(text.starts_with("ERROR: "));
    assert!(text.contains("Usage:"));
}

#[test]
fn test_unreadable_input_stops_before_encoding() {
    let dir = tempfile::tempdir().unwrap();
    write_options_file(dir.path(), "options", &["-b 128"]).unwrap();
    write_fake_encoder(dir.path(), "lame1", FakeEncoder::Deterministic("v1")).unwrap();

    let output = lametest(dir.path(), &["-m", "options", "missing.wav", "lame1"]);

    assert_eq!(output.status.code(), Some(0), "usage errors are an ordinary exit");
    assert!(
        stdout(&output).starts_with("\nGenerating reference output\nmissing.wav not readable\n"),
        "unexpected report: {}",
        stdout(&output)
    );
    assert!(!dir.path().join("missing.options.1ref.mp3").exists());
}

#[test]
fn test_encoder_not_executable() {
    let dir = tempfile::tempdir().unwrap();
    write_options_file(dir.path(), "options", &["-b 128"]).unwrap();
    write_input(dir.path(), "song.wav").unwrap();

    let output = lametest(dir.path(), &["options", "song.wav", "no-such-lame-build"]);

    assert_eq!(output.status.code(), Some(0), "usage errors are an ordinary exit");
    assert!(
        stdout(&output).starts_with("no-such-lame-build is not executable\n"),
        "unexpected report: {}",
        stdout(&output)
    );
}

#[test]
fn test_reference_round_trip_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_options_file(dir.path(), "options", &["-b 128", "-b 320"]).unwrap();
    write_input(dir.path(), "song.wav").unwrap();
    // Found through the current directory, not PATH
    write_fake_encoder(dir.path(), "lame1", FakeEncoder::Deterministic("v1")).unwrap();

    let output = lametest(dir.path(), &["-m", "options", "song.wav", "lame1"]);
    assert!(output.status.success(), "makeref failed: {}", stdout(&output));
    let text = stdout(&output);
    assert!(text.contains("Generating reference output"));
    assert!(!text.contains("Number of tests"));
    assert!(dir.path().join("song.options.1ref.mp3").exists());
    assert!(dir.path().join("song.options.2ref.mp3").exists());

    let output = lametest(dir.path(), &["options", "song.wav", "./lame1"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("output identical:  diff=0"));
    assert!(text.contains("Number of tests which passed:  2\n"));
    assert!(text.contains("Number of tests which failed:  0\n"));
    assert!(dir.path().join("song.options.1.mp3").exists());
}

#[test]
fn test_compare_mode_with_decode_reports_difference() {
    let dir = tempfile::tempdir().unwrap();
    write_options_file(dir.path(), "options", &["-V2"]).unwrap();
    write_input(dir.path(), "song.wav").unwrap();
    write_fake_encoder(dir.path(), "lame1", FakeEncoder::Deterministic("one")).unwrap();
    write_fake_encoder(dir.path(), "lame2", FakeEncoder::Deterministic("two")).unwrap();

    let output = lametest(dir.path(), &["-w", "options", "song.wav", "lame1", "lame2"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("executable2:  lame2"));
    assert!(text.contains("converting mp3 to wav for comparison..."));
    assert!(text.contains("output different: "));
    assert!(text.contains("Number of tests which passed:  0\n"));
    assert!(text.contains("Number of tests which failed:  1\n"));
    assert!(dir.path().join("song.options.1.mp3.wav").exists());
}
