mod config;
mod runner;
mod tap;

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use eflint_interchange::{from_interchange, handshake, to_interchange, Outcome};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// eFLINT to phrases JSON translator.
#[derive(Parser)]
#[command(name = "eflint", version, about = "eFLINT to phrases JSON translator")]
struct Cli {
    /// Output format for errors (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log pipeline progress to stderr
    #[arg(long, global = true)]
    verbose: bool,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate an eFLINT source file to phrases JSON
    Translate {
        /// Path to the source file (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Decode a phrases JSON document and report it in an output envelope
    Decode {
        /// Path to the JSON document (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Print the reasoner handshake
    Handshake,

    /// Run the conformance test suite
    Test {
        /// Path to the conformance suite directory
        #[arg(default_value = "conformance")]
        suite_dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(msg) => {
            report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Translate { file } => {
            cmd_translate(file.as_deref(), &config, cli.output, cli.quiet);
        }
        Commands::Decode { file } => {
            cmd_decode(file.as_deref(), cli.output, cli.quiet);
        }
        Commands::Handshake => {
            print_json(&handshake(&config.reasoner));
        }
        Commands::Test { suite_dir } => {
            cmd_test(&suite_dir, cli.output, cli.quiet);
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the default `warn`
/// level; `--verbose` forces `debug`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Read `file`, or stdin when no file is given. Returns the display name
/// used in error positions along with the contents.
fn read_input(file: Option<&Path>) -> Result<(String, String), String> {
    match file {
        Some(path) => {
            let src = std::fs::read_to_string(path)
                .map_err(|e| format!("error reading file '{}': {}", path.display(), e))?;
            Ok((path.display().to_string(), src))
        }
        None => {
            let mut src = String::new();
            std::io::stdin()
                .read_to_string(&mut src)
                .map_err(|e| format!("error reading stdin: {}", e))?;
            Ok(("<stdin>".to_owned(), src))
        }
    }
}

fn cmd_translate(file: Option<&Path>, config: &Config, output: OutputFormat, quiet: bool) {
    let (name, src) = match read_input(file) {
        Ok(input) => input,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    match eflint_core::translate_with_version(&src, &name, &config.document.version) {
        Ok(doc) => {
            tracing::info!(file = %name, phrases = doc.phrases.len(), "translated");
            print_json(&to_interchange(&doc));
        }
        Err(e) => {
            match output {
                OutputFormat::Json => {
                    let err_json = serde_json::to_string_pretty(&e.to_json_value())
                        .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
                    eprintln!("{}", err_json);
                }
                OutputFormat::Text => {
                    if !quiet {
                        eprintln!("{} error: {}", e.stage.as_str(), e);
                    }
                }
            }
            process::exit(1);
        }
    }
}

fn cmd_decode(file: Option<&Path>, output: OutputFormat, quiet: bool) {
    let (name, src) = match read_input(file) {
        Ok(input) => input,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let mut outcome = Outcome::new();
    match serde_json::from_str::<serde_json::Value>(&src) {
        Ok(value) => outcome.record(from_interchange(&value).map(|doc| to_interchange(&doc))),
        Err(e) => outcome.push_error(format!("error parsing JSON in '{}': {}", name, e)),
    }

    let success = outcome.is_success();
    tracing::info!(file = %name, success, "decoded");
    match serde_json::to_value(outcome.into_output()) {
        Ok(envelope) => print_json(&envelope),
        Err(e) => {
            report_error(&format!("serialization error: {}", e), output, quiet);
            process::exit(1);
        }
    }
    if !success {
        process::exit(1);
    }
}

fn cmd_test(suite_dir: &Path, output: OutputFormat, quiet: bool) {
    if !suite_dir.exists() {
        let msg = format!(
            "error: conformance suite directory not found: {}",
            suite_dir.display()
        );
        report_error(&msg, output, quiet);
        process::exit(1);
    }

    // TAP output is the primary output; quiet has no effect on the report
    let result = runner::run_suite(suite_dir);
    if result.failed > 0 {
        process::exit(1);
    }
}

fn print_json(value: &serde_json::Value) {
    let pretty =
        serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}
