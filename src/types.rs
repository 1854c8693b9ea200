//! Core types for opcode coverage analysis.
//!
//! This module defines the two opcode spaces, the sets used to record which
//! opcodes a trace executed, and the options and results of a scan.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix marker selecting the extended opcode space.
///
/// The byte after this marker is an extended opcode. The marker itself is
/// never counted as an opcode.
pub const EXTENDED_PREFIX: u8 = 0xCB;

/// Number of opcodes in each space.
pub const SPACE_SIZE: usize = 256;

/// The opcode space a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpcodeSpace {
    /// Single-byte opcodes.
    Base,
    /// Opcodes following the [`EXTENDED_PREFIX`] marker.
    Extended,
}

impl fmt::Display for OpcodeSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpcodeSpace::Base => write!(f, "base"),
            OpcodeSpace::Extended => write!(f, "extended"),
        }
    }
}

/// A single opcode in one of the two spaces.
///
/// Displays as `0x1A` for base opcodes and `CB 0x1A` for extended ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Opcode {
    /// Space the opcode lives in
    pub space: OpcodeSpace,
    /// Opcode byte
    pub value: u8,
}

impl Opcode {
    /// A base-space opcode.
    pub const fn base(value: u8) -> Self {
        Self {
            space: OpcodeSpace::Base,
            value,
        }
    }

    /// An extended-space opcode.
    pub const fn extended(value: u8) -> Self {
        Self {
            space: OpcodeSpace::Extended,
            value,
        }
    }

    /// Parse a report identifier (`0x1A` or `CB 0x1A`).
    ///
    /// Returns `None` for anything that is not exactly one of the two forms.
    pub fn parse(s: &str) -> Option<Self> {
        let (space, hex) = match s.strip_prefix("CB ") {
            Some(rest) => (OpcodeSpace::Extended, rest),
            None => (OpcodeSpace::Base, s),
        };
        let digits = hex.strip_prefix("0x")?;
        if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u8::from_str_radix(digits, 16).ok()?;
        Some(Self { space, value })
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.space {
            OpcodeSpace::Base => write!(f, "0x{:02X}", self.value),
            OpcodeSpace::Extended => write!(f, "CB 0x{:02X}", self.value),
        }
    }
}

/// Membership set over all 256 byte values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpcodeSet {
    bits: [u64; 4],
}

impl OpcodeSet {
    /// Create an empty set.
    pub const fn new() -> Self {
        Self { bits: [0; 4] }
    }

    /// Record `value`. Returns `true` if it was not present before.
    pub fn insert(&mut self, value: u8) -> bool {
        let (word, mask) = Self::slot(value);
        let fresh = self.bits[word] & mask == 0;
        self.bits[word] |= mask;
        fresh
    }

    /// Check whether `value` has been recorded.
    pub fn contains(&self, value: u8) -> bool {
        let (word, mask) = Self::slot(value);
        self.bits[word] & mask != 0
    }

    /// Number of distinct values recorded.
    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// Recorded values in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(move |&v| self.contains(v))
    }

    fn slot(value: u8) -> (usize, u64) {
        (usize::from(value >> 6), 1u64 << (value & 0x3F))
    }
}

impl FromIterator<u8> for OpcodeSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

/// What to do when the prefix marker is the final byte of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingPrefix {
    /// Fail with [`CoverageError::InvalidTrace`](crate::CoverageError::InvalidTrace).
    #[default]
    Error,
    /// Drop the dangling marker and keep the rest of the scan.
    Ignore,
}

/// Options controlling a trace scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Policy for a dangling prefix marker
    pub trailing_prefix: TrailingPrefix,
}

impl ScanOptions {
    /// Create options with default settings (strict trailing-prefix check).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options that ignore a dangling prefix marker.
    pub fn lenient() -> Self {
        Self {
            trailing_prefix: TrailingPrefix::Ignore,
        }
    }
}

/// Which side of a report comparison gets printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffMode {
    /// Lines of the second report that the first report does not contain.
    #[default]
    UnseenInFirst,
    /// Lines of the first report that the second report does not contain.
    UnseenInSecond,
}

/// Result of scanning a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coverage {
    /// Opcodes executed directly
    pub seen: OpcodeSet,
    /// Opcodes executed after the prefix marker
    pub seen_extended: OpcodeSet,
    /// Length of the scanned trace in bytes
    pub trace_len: usize,
    /// A dangling prefix marker at the end was dropped
    pub trailing_prefix_ignored: bool,
}

impl Coverage {
    /// Every opcode never seen, in report order.
    ///
    /// For each value from `0x00` to `0xFF` the base opcode comes first,
    /// then the extended one, so the two spaces are interleaved.
    pub fn missing(&self) -> Vec<Opcode> {
        let mut missing = Vec::with_capacity(self.missing_count());
        for value in 0..=u8::MAX {
            if !self.seen.contains(value) {
                missing.push(Opcode::base(value));
            }
            if !self.seen_extended.contains(value) {
                missing.push(Opcode::extended(value));
            }
        }
        missing
    }

    /// Number of opcodes never seen across both spaces.
    pub fn missing_count(&self) -> usize {
        (SPACE_SIZE - self.seen.len()) + (SPACE_SIZE - self.seen_extended.len())
    }

    /// Number of opcodes seen across both spaces.
    pub fn covered_count(&self) -> usize {
        self.seen.len() + self.seen_extended.len()
    }

    /// Check whether a particular opcode was seen.
    pub fn is_covered(&self, opcode: Opcode) -> bool {
        match opcode.space {
            OpcodeSpace::Base => self.seen.contains(opcode.value),
            OpcodeSpace::Extended => self.seen_extended.contains(opcode.value),
        }
    }

    /// Per-space counts.
    pub fn summary(&self) -> CoverageSummary {
        let covered = self.covered_count();
        CoverageSummary {
            base_seen: self.seen.len(),
            extended_seen: self.seen_extended.len(),
            base_missing: SPACE_SIZE - self.seen.len(),
            extended_missing: SPACE_SIZE - self.seen_extended.len(),
            percent: covered as f64 * 100.0 / (2 * SPACE_SIZE) as f64,
        }
    }
}

/// Per-space coverage counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Distinct base opcodes seen
    pub base_seen: usize,
    /// Distinct extended opcodes seen
    pub extended_seen: usize,
    /// Base opcodes never seen
    pub base_missing: usize,
    /// Extended opcodes never seen
    pub extended_missing: usize,
    /// Share of both spaces covered, 0.0 - 100.0
    pub percent: f64,
}

impl fmt::Display for CoverageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "base {}/{}, extended {}/{} ({:.1}%)",
            self.base_seen, SPACE_SIZE, self.extended_seen, SPACE_SIZE, self.percent
        )
    }
}
