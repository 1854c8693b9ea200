//! Opcode Coverage - Execution Trace Analysis for ISA Reverse-Engineering
//!
//! This library answers one question about an instruction set under study:
//! which opcodes has a program run never executed? It works on a raw byte
//! trace of executed opcodes, where the prefix marker `0xCB` introduces a
//! second, extended opcode space.
//!
//! # Features
//!
//! - **Trace Scanning**: Records base and extended opcodes seen in a trace
//! - **Missing-Opcode Reports**: Lists every unseen opcode in a stable order
//! - **Report Diffing**: Compares two reports line by line
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use opcode_coverage::{scan_file, write_report, ScanOptions, TextFormatter};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let coverage = scan_file("log.txt", &ScanOptions::new())?;
//!     println!("Coverage: {}", coverage.summary());
//!
//!     write_report(&coverage, &TextFormatter::new(), "missing.txt")?;
//!     Ok(())
//! }
//! ```
//!
//! # Report Format
//!
//! A report lists, for each value from `0x00` to `0xFF`, the base opcode
//! (`0x1A`) if it was never seen, then the extended opcode (`CB 0x1A`) if it
//! was never seen.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod differ;
pub mod error;
pub mod formatter;
pub mod scanner;
pub mod types;

pub use differ::{diff_files, diff_to_writer, unmatched_lines, LineSet};
pub use error::{CoverageError, Result};
pub use formatter::{write_report, JsonFormatter, ReportFormatter, TextFormatter};
pub use scanner::{scan, scan_file, DEFAULT_TRACE_PATH};
pub use types::{
    Coverage, CoverageSummary, DiffMode, Opcode, OpcodeSet, OpcodeSpace, ScanOptions,
    TrailingPrefix, EXTENDED_PREFIX, SPACE_SIZE,
};

/// Get version information for this library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
    }

    #[test]
    fn test_scan_and_render() {
        let coverage = scan(&[0x00, 0xCB, 0x00], &ScanOptions::new()).unwrap();
        let report = TextFormatter::new().format_report(&coverage);

        assert!(report.starts_with("0x01\nCB 0x01\n0x02\n"));
        assert_eq!(report.lines().count(), coverage.missing_count());
    }
}
