//! Line-based comparison of two coverage reports.
//!
//! One report's lines go into a [`LineSet`]. The other report is walked in
//! order and every line missing from the set is emitted. Repeated lines are
//! emitted every time they occur.

use crate::error::Result;
use crate::types::DiffMode;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// Set of unique lines from one report.
#[derive(Debug, Clone, Default)]
pub struct LineSet<'a> {
    lines: HashSet<&'a str>,
}

impl<'a> LineSet<'a> {
    /// Build a set from the lines of `text`. Duplicates collapse.
    pub fn from_lines(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
        }
    }

    /// Check whether `line` occurs in the set.
    pub fn contains(&self, line: &str) -> bool {
        self.lines.contains(line)
    }

    /// Number of unique lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if the source text had no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Lines of one report that the other report does not contain.
///
/// With [`DiffMode::UnseenInFirst`] the lines of `second` absent from `first`
/// are yielded in `second`'s order; [`DiffMode::UnseenInSecond`] swaps the
/// roles.
///
/// ```rust
/// use opcode_coverage::{unmatched_lines, DiffMode};
///
/// let lines: Vec<_> = unmatched_lines("A\nB\nC\n", "A\nD\nD\n", DiffMode::UnseenInFirst).collect();
/// assert_eq!(lines, ["D", "D"]);
/// ```
pub fn unmatched_lines<'a>(
    first: &'a str,
    second: &'a str,
    mode: DiffMode,
) -> impl Iterator<Item = &'a str> + 'a {
    let (reference, candidates) = match mode {
        DiffMode::UnseenInFirst => (first, second),
        DiffMode::UnseenInSecond => (second, first),
    };
    let set = LineSet::from_lines(reference);
    candidates.lines().filter(move |line| !set.contains(line))
}

/// Write every unmatched line to `writer`, one per line.
///
/// Lines are written as they are found. Returns how many were written.
pub fn diff_to_writer<W: Write>(
    first: &str,
    second: &str,
    mode: DiffMode,
    writer: &mut W,
) -> Result<usize> {
    let mut count = 0;
    for line in unmatched_lines(first, second, mode) {
        writeln!(writer, "{line}")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Read two reports and write their unmatched lines to `writer`.
///
/// Both files are read fully before any output is produced.
pub fn diff_files<P, Q, W>(first: P, second: Q, mode: DiffMode, writer: &mut W) -> Result<usize>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    W: Write,
{
    let first = std::fs::read_to_string(first)?;
    let second = std::fs::read_to_string(second)?;
    diff_to_writer(&first, &second, mode, writer)
}
