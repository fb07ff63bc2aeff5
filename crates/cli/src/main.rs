mod config;
mod error;
mod report;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tact_cst::{Cst, ParseError, Variant};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::error::CliError;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Grammar table selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Grammar {
    V1,
    V2,
}

impl From<Grammar> for Variant {
    fn from(grammar: Grammar) -> Self {
        match grammar {
            Grammar::V1 => Variant::V1,
            Grammar::V2 => Variant::V2,
        }
    }
}

/// Lossless parser for Tact contract sources.
#[derive(Parser)]
#[command(name = "tact-cst", version, about = "Lossless parser for Tact contract sources")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Settings file (default: ./tact-cst.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and print its concrete syntax tree
    Parse {
        /// Path to the .tact source file
        file: PathBuf,
        /// Grammar table to parse with (overrides the config file)
        #[arg(long, value_enum)]
        grammar: Option<Grammar>,
        /// Only parse the leading imports
        #[arg(long)]
        imports_only: bool,
    },

    /// Check that a file parses and prints back to the same bytes
    Roundtrip {
        /// Path to the .tact source file
        file: PathBuf,
        /// Grammar table to parse with (overrides the config file)
        #[arg(long, value_enum)]
        grammar: Option<Grammar>,
    },

    /// Parse a file with both grammar tables and compare the trees
    Compare {
        /// Path to the .tact source file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "tact_cst=warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        report_error(&e, cli.output);
        process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = config::load(cli.config.as_deref())?;
    debug!(?config, "loaded settings");

    match &cli.command {
        Commands::Parse {
            file,
            grammar,
            imports_only,
        } => {
            let variant = grammar.map_or(config.parser.grammar, Variant::from);
            cmd_parse(file, variant, *imports_only, &config, cli.output)
        }
        Commands::Roundtrip { file, grammar } => {
            let variant = grammar.map_or(config.parser.grammar, Variant::from);
            cmd_roundtrip(file, variant, &config, cli.output)
        }
        Commands::Compare { file } => cmd_compare(file, &config, cli.output),
    }
}

// ── Commands ─────────────────────────────────────────────────────────

fn cmd_parse(
    file: &Path,
    variant: Variant,
    imports_only: bool,
    config: &Config,
    output: OutputFormat,
) -> Result<(), CliError> {
    let source = read_source(file, config)?;
    let path = file.display().to_string();
    let tree = on_parser_thread(config, || {
        if imports_only {
            Ok(tact_cst::parse_imports(&source, &path, variant))
        } else {
            tact_cst::parse(&source, &path, variant)
        }
    })?
    .map_err(|e| parse_failure(file, &source, e))?;

    match output {
        OutputFormat::Text => print!("{}", tree),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
    }
    Ok(())
}

fn cmd_roundtrip(
    file: &Path,
    variant: Variant,
    config: &Config,
    output: OutputFormat,
) -> Result<(), CliError> {
    let source = read_source(file, config)?;
    let path = file.display().to_string();
    let tree = on_parser_thread(config, || tact_cst::parse(&source, &path, variant))?
        .map_err(|e| parse_failure(file, &source, e))?;

    let printed = tree.text();
    if printed != source {
        return Err(CliError::RoundTrip {
            path: file.to_path_buf(),
            offset: report::first_difference(&printed, &source),
        });
    }
    info!(path = %file.display(), bytes = source.len(), "round trip ok");

    match output {
        OutputFormat::Text => println!(
            "ok: {} ({} bytes, {} leaves, grammar {})",
            file.display(),
            source.len(),
            tree.leaf_count(),
            variant
        ),
        OutputFormat::Json => {
            let result = serde_json::json!({
                "file": file.display().to_string(),
                "grammar": variant,
                "bytes": source.len(),
                "leaves": tree.leaf_count(),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct VariantOutcome {
    grammar: Variant,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct Comparison {
    file: String,
    results: Vec<VariantOutcome>,
    same_shape: bool,
}

fn cmd_compare(file: &Path, config: &Config, output: OutputFormat) -> Result<(), CliError> {
    let source = read_source(file, config)?;
    let path = file.display().to_string();
    let trees: Vec<(Variant, Result<Cst, ParseError>)> = on_parser_thread(config, || {
        Variant::ALL
            .iter()
            .map(|&variant| (variant, tact_cst::parse(&source, &path, variant)))
            .collect()
    })?;

    let same_shape = match trees.as_slice() {
        [(_, Ok(first)), rest @ ..] => rest
            .iter()
            .all(|(_, tree)| tree.as_ref().map_or(false, |t| t.same_shape(first))),
        _ => false,
    };
    let comparison = Comparison {
        file: path,
        results: trees
            .iter()
            .map(|(variant, tree)| VariantOutcome {
                grammar: *variant,
                ok: tree.is_ok(),
                error: tree.as_ref().err().map(|e| {
                    let (line, column) = report::line_column(&source, e.position());
                    format!("no rule matched at {}:{}", line, column)
                }),
            })
            .collect(),
        same_shape,
    };

    match output {
        OutputFormat::Text => {
            for outcome in &comparison.results {
                match &outcome.error {
                    None => println!("{}: ok", outcome.grammar),
                    Some(e) => println!("{}: {}", outcome.grammar, e),
                }
            }
            println!(
                "trees: {}",
                if same_shape { "same shape" } else { "differ" }
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
    }

    if same_shape {
        Ok(())
    } else {
        Err(CliError::Disagreement {
            path: file.to_path_buf(),
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn read_source(file: &Path, config: &Config) -> Result<String, CliError> {
    let source = std::fs::read_to_string(file).map_err(|source| CliError::Read {
        path: file.to_path_buf(),
        source,
    })?;
    let limit = config.limits.max_source_bytes;
    if source.len() > limit {
        return Err(CliError::InputTooLarge {
            path: file.to_path_buf(),
            size: source.len(),
            limit,
        });
    }
    Ok(source)
}

/// Run `f` on a thread whose stack is sized by the config, so deeply nested
/// input does not overflow the main thread.
fn on_parser_thread<T, F>(config: &Config, f: F) -> Result<T, CliError>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    let stack = config
        .limits
        .stack_bytes()
        .ok_or(CliError::StackSize {
            mib: config.limits.stack_size_mib,
        })?;
    std::thread::scope(|scope| {
        let handle = std::thread::Builder::new()
            .name("parser".into())
            .stack_size(stack)
            .spawn_scoped(scope, f)
            .map_err(CliError::Thread)?;
        handle.join().map_err(|_| CliError::ParserPanicked)
    })
}

fn parse_failure(file: &Path, source: &str, error: ParseError) -> CliError {
    let (line, column) = report::line_column(source, error.position());
    CliError::Parse {
        path: file.to_path_buf(),
        line,
        column,
        excerpt: report::excerpt(source, error.position()),
        source: error,
    }
}

fn report_error(error: &CliError, output: OutputFormat) {
    match output {
        OutputFormat::Text => eprintln!("error: {}", error),
        OutputFormat::Json => {
            let mut body = serde_json::json!({ "error": error.to_string() });
            if let CliError::Parse {
                line,
                column,
                source,
                ..
            } = error
            {
                body["line"] = (*line).into();
                body["column"] = (*column).into();
                body["offset"] = source.position().into();
            }
            eprintln!("{}", body);
        }
    }
}
