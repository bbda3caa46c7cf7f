//! End-to-end tests of the `rr` binary: raw stdout/stderr bytes and exit
//! codes, the way the differential harness drives it.

use std::io::Write;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn process_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn rr(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rr"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn reference_workload_stdout_bytes() {
    let file = process_file("4\n1, 10, 70\n2, 20, 40\n3, 40, 10\n4, 50, 40\n");
    let output = rr(&[file.path().to_str().unwrap(), "10"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "Average wait time: 70.00\nAverage response time: 12.25\n"
    );
    assert_eq!(output.stderr, b"");
}

#[test]
fn reruns_are_byte_identical() {
    let file = process_file("5\n1, 0, 9\n2, 3, 4\n3, 3, 4\n4, 11, 2\n5, 30, 1\n");
    let path = file.path().to_str().unwrap();
    let first = rr(&[path, "3"]);
    let second = rr(&[path, "3"]);

    assert_eq!(first.stdout, second.stdout);
    assert_eq!(first.stderr, second.stderr);
}

#[test]
fn median_keyword_is_accepted() {
    let file = process_file("4\n1, 10, 70\n2, 20, 40\n3, 40, 10\n4, 50, 40\n");
    let output = rr(&[file.path().to_str().unwrap(), "median"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "Average wait time: 55.00\nAverage response time: 41.75\n"
    );
}

#[test]
fn missing_quantum_argument_is_a_usage_error() {
    let file = process_file("3\n1, 10, 70\n");
    let output = rr(&[file.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8(output.stderr).unwrap(),
        format!("usage: {} file quantum\n", env!("CARGO_BIN_EXE_rr"))
    );
    assert_eq!(output.stdout, b"");
}

#[test]
fn zero_processes_is_rejected() {
    let file = process_file("0\n1, 10, 70\n");
    let output = rr(&[file.path().to_str().unwrap(), "3"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8(output.stderr).unwrap(), "no processes\n");
    assert_eq!(output.stdout, b"");
}

#[test]
fn truncated_table_is_rejected() {
    let file = process_file("3\n1, 10, 70\n");
    let output = rr(&[file.path().to_str().unwrap(), "3"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8(output.stderr).unwrap(),
        "missing integer\n"
    );
    assert_eq!(output.stdout, b"");
}

#[test]
fn unreadable_file_is_reported() {
    let output = rr(&["/nonexistent/processes.txt", "3"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(output.stdout, b"");
    assert!(!output.stderr.is_empty());
}
