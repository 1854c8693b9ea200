//! Shared plumbing for the command-line tools.
//!
//! Argument parsing that reports absent required arguments as
//! [`CoverageError::MissingArgument`], plus logging setup.

use crate::error::CoverageError;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Parser;
use std::process::ExitCode;

/// Parse process arguments into `T`.
///
/// Help and version requests, and usage errors other than a missing
/// argument, are handled by clap and exit the process.
pub fn parse_args<T: Parser>() -> Result<T, ExitCode> {
    match T::try_parse() {
        Ok(args) => Ok(args),
        Err(err) => match missing_argument(&err) {
            Some(missing) => {
                eprintln!("error: {missing}");
                eprintln!();
                eprintln!("For more information, try '--help'.");
                Err(ExitCode::from(missing.exit_code()))
            }
            None => err.exit(),
        },
    }
}

/// Convert a clap missing-argument error into [`CoverageError::MissingArgument`].
pub fn missing_argument(err: &clap::Error) -> Option<CoverageError> {
    if err.kind() != ErrorKind::MissingRequiredArgument {
        return None;
    }
    let name = match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::Strings(names)) => names.join(", "),
        Some(ContextValue::String(name)) => name.clone(),
        _ => "required argument".to_string(),
    };
    Some(CoverageError::MissingArgument { name })
}

/// Install a stderr `fmt` subscriber at debug level for `targets`.
///
/// Does nothing unless `verbose` is set.
pub fn init_logging(verbose: bool, targets: &[&str]) {
    if !verbose {
        return;
    }
    let filter = targets
        .iter()
        .map(|target| format!("{target}=debug"))
        .collect::<Vec<_>>()
        .join(",");
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Process exit code for an error surfaced through `anyhow`.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<CoverageError>()
        .map_or(1, CoverageError::exit_code)
}
