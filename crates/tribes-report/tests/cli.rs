use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn tribes_report(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tribes-report"))
        .args(args)
        .output()
        .expect("spawn tribes-report")
}

#[test]
fn test_no_arguments_prints_usage_and_exits_2() {
    let out = tribes_report(&[]);

    assert_eq!(out.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("tribes-report"));
}

#[test]
fn test_single_argument_does_not_process() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("members.csv");
    std::fs::write(&input, "Date,Triber Username,Tier Price,Tier\n").unwrap();

    let out = tribes_report(&[&input]);

    assert_eq!(out.status.code(), Some(2));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_writes_report() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("members.csv");
    let output = dir.path().join("report.csv");
    std::fs::write(
        &input,
        "Tier,Date,Tier Price,Triber Username\n\
         Gold,2024-01-05,10,alice\n\
         Silver,2024-02-05,4,bob\n",
    )
    .unwrap();

    let out = tribes_report(&[&input, &output]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stdout.is_empty());
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "Tier,January 2024,February 2024\nGold,1,0\nSilver,0,1\n"
    );
}

#[test]
fn test_extra_arguments_are_ignored() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("members.csv");
    let output = dir.path().join("report.csv");
    std::fs::write(
        &input,
        "Date,Triber Username,Tier Price,Tier\n2024-03-01,alice,10,Gold\n",
    )
    .unwrap();

    let out = tribes_report(&[&input, &output, Path::new("unused")]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "Tier,March 2024\nGold,1\n"
    );
}

#[test]
fn test_bad_row_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("members.csv");
    let output = dir.path().join("report.csv");
    std::fs::write(
        &input,
        "Date,Triber Username,Tier Price,Tier\nnot-a-date,alice,10,Gold\n",
    )
    .unwrap();

    let out = tribes_report(&[&input, &output]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("not-a-date"));
    assert!(!output.exists());
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("absent.csv");
    let output = dir.path().join("report.csv");

    let out = tribes_report(&[&input, &output]);

    assert_eq!(out.status.code(), Some(1));
    assert!(!output.exists());
}
