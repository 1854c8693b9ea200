//! Error types for opcode coverage analysis.
//!
//! Every failure is fatal: the tools either finish their single pass or
//! abort with one of these errors.

use thiserror::Error;

/// Primary error type for the coverage tools.
#[derive(Debug, Error)]
pub enum CoverageError {
    /// IO error while reading a trace or report, or writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required command-line argument was not supplied.
    #[error("Missing argument: {name}")]
    MissingArgument { name: String },

    /// The trace ends with a prefix marker that has no opcode after it.
    #[error("Invalid trace: prefix marker 0xCB at offset {offset} is the last of {len} bytes")]
    InvalidTrace { offset: usize, len: usize },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl CoverageError {
    /// Process exit code for this error.
    ///
    /// Usage errors exit with 2 (matching clap), everything else with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            CoverageError::MissingArgument { .. } | CoverageError::ConfigError { .. } => 2,
            CoverageError::Io(_) | CoverageError::InvalidTrace { .. } => 1,
        }
    }
}

/// Result type alias for coverage operations.
pub type Result<T> = std::result::Result<T, CoverageError>;
