//! Opcode Coverage Scanner CLI
//!
//! Reads a raw opcode trace and writes the list of opcodes it never executed.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use opcode_coverage::{
    cli, scan_file, write_report, Coverage, CoverageError, JsonFormatter, ReportFormatter,
    ScanOptions, TextFormatter, TrailingPrefix, DEFAULT_TRACE_PATH,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, warn};

/// Report opcodes never executed in a trace.
///
/// Every byte of the trace is a base opcode, except the 0xCB prefix marker,
/// whose following byte is an extended opcode.
#[derive(Parser, Debug)]
#[command(name = "coverage-scan")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Report file to write (overwritten if it exists)
    output: PathBuf,

    /// Trace file to scan
    #[arg(short, long, env = "COVERAGE_TRACE", default_value = DEFAULT_TRACE_PATH)]
    input: PathBuf,

    /// What to do when the trace ends with a prefix marker
    #[arg(long, default_value = "error")]
    trailing_prefix: TrailingPrefixArg,

    /// Report format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Quiet mode (no summary, no error messages)
    #[arg(short, long)]
    quiet: bool,
}

/// Dangling prefix marker policy.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TrailingPrefixArg {
    /// Fail with an invalid-trace error
    Error,
    /// Drop the marker and report the rest
    Ignore,
}

impl From<TrailingPrefixArg> for TrailingPrefix {
    fn from(arg: TrailingPrefixArg) -> Self {
        match arg {
            TrailingPrefixArg::Error => TrailingPrefix::Error,
            TrailingPrefixArg::Ignore => TrailingPrefix::Ignore,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One identifier per line
    Text,
    /// JSON with summary
    Json,
}

fn main() -> ExitCode {
    let args = match cli::parse_args::<Args>() {
        Ok(args) => args,
        Err(code) => return code,
    };

    cli::init_logging(args.verbose, &["opcode_coverage", "coverage_scan"]);

    match run(&args) {
        Ok(coverage) => {
            if !args.quiet {
                println!(
                    "{}: {} missing, {}",
                    args.output.display(),
                    coverage.missing_count(),
                    coverage.summary()
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if !args.quiet {
                eprintln!("Error: {e:#}");
            }
            ExitCode::from(cli::exit_code(&e))
        }
    }
}

fn run(args: &Args) -> anyhow::Result<Coverage> {
    if args.input == args.output {
        return Err(CoverageError::ConfigError {
            message: format!(
                "output {} would overwrite the trace being scanned",
                args.output.display()
            ),
        }
        .into());
    }

    let options = ScanOptions {
        trailing_prefix: args.trailing_prefix.into(),
    };
    debug!(input = %args.input.display(), ?options, "scanning trace");

    let coverage = scan_file(&args.input, &options)
        .with_context(|| format!("scanning trace {}", args.input.display()))?;

    if coverage.trailing_prefix_ignored {
        warn!(
            offset = coverage.trace_len - 1,
            "trace ends with a prefix marker, ignored"
        );
    }
    debug!(
        bytes = coverage.trace_len,
        base_seen = coverage.seen.len(),
        extended_seen = coverage.seen_extended.len(),
        "trace scanned"
    );

    let formatter: Box<dyn ReportFormatter> = match args.format {
        OutputFormat::Text => Box::new(TextFormatter::new()),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
    };
    write_report(&coverage, formatter.as_ref(), &args.output)
        .with_context(|| format!("writing report {}", args.output.display()))?;

    info!(
        output = %args.output.display(),
        missing = coverage.missing_count(),
        percent = coverage.summary().percent,
        "report written"
    );
    Ok(coverage)
}
