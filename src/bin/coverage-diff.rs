//! Opcode Coverage Differ CLI
//!
//! Compares two coverage reports line by line and prints the lines one has
//! that the other lacks.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use opcode_coverage::{cli, diff_to_writer, DiffMode};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

/// Print report lines missing from another report.
///
/// By default prints every line of SECOND that does not occur in FIRST,
/// in SECOND's order, repeats included.
#[derive(Parser, Debug)]
#[command(name = "coverage-diff")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Report whose lines form the reference set
    first: PathBuf,

    /// Report whose lines are checked against FIRST
    second: PathBuf,

    /// Which side's unmatched lines to print
    #[arg(short, long, default_value = "unseen-in-first")]
    mode: Mode,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Comparison direction.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Lines of SECOND absent from FIRST
    UnseenInFirst,
    /// Lines of FIRST absent from SECOND
    UnseenInSecond,
}

impl From<Mode> for DiffMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::UnseenInFirst => DiffMode::UnseenInFirst,
            Mode::UnseenInSecond => DiffMode::UnseenInSecond,
        }
    }
}

fn main() -> ExitCode {
    let args = match cli::parse_args::<Args>() {
        Ok(args) => args,
        Err(code) => return code,
    };

    cli::init_logging(args.verbose, &["opcode_coverage", "coverage_diff"]);

    match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) if is_broken_pipe(&e) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(cli::exit_code(&e))
        }
    }
}

fn run(args: &Args) -> anyhow::Result<usize> {
    let first = read_report(&args.first)?;
    let second = read_report(&args.second)?;
    let mode = DiffMode::from(args.mode);
    debug!(
        first_lines = first.lines().count(),
        second_lines = second.lines().count(),
        ?mode,
        "comparing reports"
    );

    let stdout = std::io::stdout();
    let count = diff_to_writer(&first, &second, mode, &mut stdout.lock())?;
    debug!(unmatched = count, "comparison done");
    Ok(count)
}

fn read_report(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading report {}", path.display()))
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<opcode_coverage::CoverageError>() {
        Some(opcode_coverage::CoverageError::Io(io)) => io.kind() == ErrorKind::BrokenPipe,
        _ => false,
    }
}
