//! Output formatters for coverage reports.
//!
//! The text format is one missing-opcode identifier per line and is what the
//! differ consumes. The JSON format adds the coverage summary.

use crate::error::Result;
use crate::types::{Coverage, CoverageSummary};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Trait for rendering a scan result.
pub trait ReportFormatter {
    /// Render the complete report.
    fn format_report(&self, coverage: &Coverage) -> String;
}

/// Plain-text formatter: one identifier per line, every line terminated.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter;

impl TextFormatter {
    /// Create a new text formatter.
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for TextFormatter {
    fn format_report(&self, coverage: &Coverage) -> String {
        let mut out = String::new();
        for opcode in coverage.missing() {
            let _ = writeln!(out, "{opcode}");
        }
        out
    }
}

/// JSON output formatter.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    /// Pretty-print the JSON output
    pub pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonFormatter {
    /// Create a new JSON formatter with pretty printing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compact JSON formatter.
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_report(&self, coverage: &Coverage) -> String {
        #[derive(Serialize)]
        struct JsonOutput {
            trace_len: usize,
            trailing_prefix_ignored: bool,
            summary: CoverageSummary,
            missing: Vec<String>,
        }

        let output = JsonOutput {
            trace_len: coverage.trace_len,
            trailing_prefix_ignored: coverage.trailing_prefix_ignored,
            summary: coverage.summary(),
            missing: coverage.missing().iter().map(ToString::to_string).collect(),
        };

        let mut json = if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
        };
        json.push('\n');
        json
    }
}

/// Render `coverage` with `formatter` and write it to `path`.
///
/// An existing file at `path` is overwritten.
pub fn write_report<F, P>(coverage: &Coverage, formatter: &F, path: P) -> Result<()>
where
    F: ReportFormatter + ?Sized,
    P: AsRef<Path>,
{
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(formatter.format_report(coverage).as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;
    use crate::types::ScanOptions;
    use pretty_assertions::assert_eq;

    fn nearly_full() -> Coverage {
        let mut trace: Vec<u8> = (0..=u8::MAX).filter(|&v| v != 0xCB && v != 0x42).collect();
        for value in 0..=u8::MAX {
            if value != 0x07 {
                trace.extend([0xCB, value]);
            }
        }
        scan(&trace, &ScanOptions::new()).unwrap()
    }

    #[test]
    fn test_text_formatter() {
        let output = TextFormatter::new().format_report(&nearly_full());
        assert_eq!(output, "CB 0x07\n0x42\n0xCB\n");
    }

    #[test]
    fn test_text_formatter_full_coverage() {
        let coverage = Coverage {
            seen: (0..=u8::MAX).collect(),
            seen_extended: (0..=u8::MAX).collect(),
            ..Coverage::default()
        };
        assert_eq!(TextFormatter::new().format_report(&coverage), "");
    }

    #[test]
    fn test_json_formatter() {
        let output = JsonFormatter::new().format_report(&nearly_full());

        assert!(output.contains("\"base_missing\": 2"));
        assert!(output.contains("\"extended_missing\": 1"));
        assert!(output.contains("\"CB 0x07\""));

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["missing"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_json_formatter_compact() {
        let output = JsonFormatter::compact().format_report(&Coverage::default());
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("\"trace_len\":0"));
    }

    #[test]
    fn test_write_report_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        std::fs::write(&path, "stale contents that are longer than the report\n").unwrap();

        write_report(&nearly_full(), &TextFormatter::new(), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "CB 0x07\n0x42\n0xCB\n");
    }
}
