use std::io;
use std::path::PathBuf;

use tact_cst::ParseError;

/// Everything that can stop a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("could not read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("could not parse config '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("'{}' is {size} bytes, over the limit of {limit} bytes", path.display())]
    InputTooLarge {
        path: PathBuf,
        size: usize,
        limit: usize,
    },

    #[error("{}:{line}:{column}: no rule matched here\n{excerpt}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        excerpt: String,
        source: ParseError,
    },

    #[error("'{}' does not print back to its source (first difference at byte {offset})", path.display())]
    RoundTrip { path: PathBuf, offset: usize },

    #[error("grammars disagree on '{}'", path.display())]
    Disagreement { path: PathBuf },

    #[error("stack_size_mib = {mib} is too large")]
    StackSize { mib: usize },

    #[error("could not start the parser thread: {0}")]
    Thread(#[source] io::Error),

    #[error("the parser thread panicked")]
    ParserPanicked,

    #[error("could not serialize the tree: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code: 1 when the input was read but rejected, 2 for
    /// everything that went wrong before or around parsing.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Parse { .. } | CliError::RoundTrip { .. } | CliError::Disagreement { .. } => 1,
            _ => 2,
        }
    }
}
