//! Optional `tact-cst.toml` settings.
//!
//! ```toml
//! [parser]
//! grammar = "v2"
//!
//! [limits]
//! max_source_bytes = 1048576
//! stack_size_mib = 64
//! ```

use std::path::Path;

use serde::Deserialize;
use tact_cst::Variant;

use crate::error::CliError;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tact-cst.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub parser: ParserSettings,
    pub limits: Limits,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserSettings {
    pub grammar: Variant,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Larger inputs are rejected before parsing.
    pub max_source_bytes: usize,
    /// Stack of the thread the parser runs on. Nesting depth of the input
    /// is bounded by it.
    pub stack_size_mib: usize,
}

impl Limits {
    /// Parser thread stack in bytes, at least 1 MiB. `None` if it does not
    /// fit in `usize`.
    pub fn stack_bytes(&self) -> Option<usize> {
        self.stack_size_mib.max(1).checked_mul(1024 * 1024)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_source_bytes: 1024 * 1024,
            stack_size_mib: 64,
        }
    }
}

pub fn read_config(path: &Path) -> Result<Config, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Read `explicit` if given, else the default file if it exists, else use
/// built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<Config, CliError> {
    match explicit {
        Some(path) => read_config(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.is_file() {
                read_config(path)
            } else {
                Ok(Config::default())
            }
        }
    }
}
