//! End-to-end checks: trace file -> report file -> report comparison.

use opcode_coverage::{
    diff_files, scan_file, write_report, DiffMode, JsonFormatter, Opcode, ScanOptions,
    TextFormatter, SPACE_SIZE,
};
use pretty_assertions::assert_eq;
use std::path::Path;

fn report_for(dir: &Path, name: &str, trace: &[u8]) -> std::path::PathBuf {
    let trace_path = dir.join(format!("{name}.log"));
    let report_path = dir.join(format!("{name}.txt"));
    std::fs::write(&trace_path, trace).unwrap();

    let coverage = scan_file(&trace_path, &ScanOptions::new()).unwrap();
    write_report(&coverage, &TextFormatter::new(), &report_path).unwrap();
    report_path
}

#[test]
fn test_report_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let trace = [0x3E, 0x01, 0xCB, 0x47, 0xC3, 0xCB, 0xCB, 0x00];

    let first = report_for(dir.path(), "run1", &trace);
    let second = report_for(dir.path(), "run2", &trace);

    assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
}

#[test]
fn test_report_line_count() {
    let dir = tempfile::tempdir().unwrap();
    let trace = [0x00, 0x00, 0x10, 0xCB, 0x10, 0xCB, 0x11, 0xFF];
    let report = report_for(dir.path(), "trace", &trace);

    // base {0x00, 0x10, 0xFF}, extended {0x10, 0x11}
    let text = std::fs::read_to_string(report).unwrap();
    assert_eq!(text.lines().count(), (SPACE_SIZE - 3) + (SPACE_SIZE - 2));
    assert!(text.lines().all(|line| Opcode::parse(line).is_some()));
}

#[test]
fn test_report_order() {
    let dir = tempfile::tempdir().unwrap();
    let report = report_for(dir.path(), "trace", &[0xCB, 0x10, 0x20]);
    let text = std::fs::read_to_string(report).unwrap();
    let lines: Vec<_> = text.lines().collect();

    assert_eq!(&lines[..4], ["0x00", "CB 0x00", "0x01", "CB 0x01"]);
    let at = lines.iter().position(|&l| l == "0x10").unwrap();
    assert_eq!(&lines[at..at + 3], ["0x10", "0x11", "CB 0x11"]);
    let at = lines.iter().position(|&l| l == "0x1F").unwrap();
    assert_eq!(&lines[at..at + 3], ["0x1F", "CB 0x1F", "CB 0x20"]);
    assert_eq!(lines.last(), Some(&"CB 0xFF"));
}

#[test]
fn test_diff_reports() {
    let dir = tempfile::tempdir().unwrap();
    // run A executes 0x00 and CB 0x00, run B executes only 0x00
    let run_a = report_for(dir.path(), "a", &[0x00, 0xCB, 0x00]);
    let run_b = report_for(dir.path(), "b", &[0x00]);

    let mut out = Vec::new();
    let count = diff_files(&run_a, &run_b, DiffMode::UnseenInFirst, &mut out).unwrap();
    assert_eq!(count, 1);
    assert_eq!(String::from_utf8(out).unwrap(), "CB 0x00\n");

    let mut out = Vec::new();
    let count = diff_files(&run_a, &run_b, DiffMode::UnseenInSecond, &mut out).unwrap();
    assert_eq!(count, 0);
    assert!(out.is_empty());
}

#[test]
fn test_diff_repeated_lines() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");
    std::fs::write(&first, "A\nB\nC\n").unwrap();
    std::fs::write(&second, "A\nD\nD\n").unwrap();

    let mut out = Vec::new();
    diff_files(&first, &second, DiffMode::UnseenInFirst, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "D\nD\n");
}

#[test]
fn test_diff_empty_first() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");
    std::fs::write(&first, "").unwrap();
    std::fs::write(&second, "0x01\nCB 0x02\n0x01\n").unwrap();

    let mut out = Vec::new();
    diff_files(&first, &second, DiffMode::UnseenInFirst, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "0x01\nCB 0x02\n0x01\n");
}

#[test]
fn test_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let trace_path = dir.path().join("log.txt");
    let report_path = dir.path().join("report.json");
    std::fs::write(&trace_path, [0x00u8, 0xCB, 0x00]).unwrap();

    let coverage = scan_file(&trace_path, &ScanOptions::new()).unwrap();
    write_report(&coverage, &JsonFormatter::new(), &report_path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(report_path).unwrap()).unwrap();
    assert_eq!(value["trace_len"], 3);
    assert_eq!(value["summary"]["base_seen"], 1);
    assert_eq!(value["summary"]["extended_seen"], 1);
    assert_eq!(value["missing"][0], "0x01");
    assert_eq!(value["missing"].as_array().unwrap().len(), 510);
}
