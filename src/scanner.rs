//! Trace scanning.
//!
//! A trace is the raw byte log of every opcode a CPU executed, in order.
//! Each byte is a base opcode, except the [`EXTENDED_PREFIX`] marker, which
//! says the byte after it is an extended opcode.

use crate::error::{CoverageError, Result};
use crate::types::{Coverage, ScanOptions, TrailingPrefix, EXTENDED_PREFIX};
use std::path::Path;

/// Trace file read when no input path is given.
pub const DEFAULT_TRACE_PATH: &str = "log.txt";

/// Scan a trace and record which opcodes it executed.
///
/// # Errors
///
/// Returns [`CoverageError::InvalidTrace`] if the last byte is a prefix
/// marker and `options.trailing_prefix` is [`TrailingPrefix::Error`].
///
/// # Example
///
/// ```rust
/// use opcode_coverage::{scan, ScanOptions};
///
/// let coverage = scan(&[0xCB, 0x10, 0x20], &ScanOptions::new())?;
/// assert!(coverage.seen.contains(0x20));
/// assert!(coverage.seen_extended.contains(0x10));
/// assert!(!coverage.seen.contains(0xCB));
/// # Ok::<(), opcode_coverage::CoverageError>(())
/// ```
pub fn scan(trace: &[u8], options: &ScanOptions) -> Result<Coverage> {
    let mut coverage = Coverage {
        trace_len: trace.len(),
        ..Coverage::default()
    };

    let mut bytes = trace.iter().copied().enumerate();
    while let Some((offset, byte)) = bytes.next() {
        if byte != EXTENDED_PREFIX {
            coverage.seen.insert(byte);
            continue;
        }

        match bytes.next() {
            Some((_, extended)) => {
                coverage.seen_extended.insert(extended);
            }
            None => match options.trailing_prefix {
                TrailingPrefix::Error => {
                    return Err(CoverageError::InvalidTrace {
                        offset,
                        len: trace.len(),
                    })
                }
                TrailingPrefix::Ignore => coverage.trailing_prefix_ignored = true,
            },
        }
    }

    Ok(coverage)
}

/// Read a trace file and scan it.
///
/// The whole file is read into memory before scanning.
pub fn scan_file<P: AsRef<Path>>(path: P, options: &ScanOptions) -> Result<Coverage> {
    let trace = std::fs::read(path)?;
    scan(&trace, options)
}
