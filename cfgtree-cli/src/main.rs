//! Command-line interface for cfgtree
//! Converts configuration files between formats and looks up single entries.
//!
//! Usage:
//!   cfgtree convert `<path|->` [--from `<fmt>`] [--to `<fmt>`] [--strict] [-o `<file>`]
//!   cfgtree get `<path|->` `<section/key>`
//!   cfgtree formats

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cfgtree")]
#[command(version, about = "Inspect and convert INI-style configuration files")]
struct Cli {
    /// Extra configuration file layered over the defaults and the user file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a file with one format and write it with another
    Convert(ConvertArgs),
    /// Print the value (or tree) found at a slash separated path
    Get(GetArgs),
    /// List the available formats
    Formats,
}

#[derive(Args)]
struct ConvertArgs {
    /// Input file, `-` for stdin
    input: String,

    /// Input format (default: from the file extension, then the config)
    #[arg(long)]
    from: Option<String>,

    /// Output format (default: from the output extension, then the config)
    #[arg(long)]
    to: Option<String>,

    /// Characters that start an ini comment line; empty disables comments
    #[arg(long, value_name = "CHARS")]
    comment: Option<String>,

    /// Fail with exit code 3 instead of repairing malformed ini input
    #[arg(long)]
    strict: bool,

    /// Write to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct GetArgs {
    /// Input file, `-` for stdin
    input: String,

    /// Node path such as `server/tls/cert`
    path: String,

    /// Input format (default: from the file extension, then the config)
    #[arg(long)]
    from: Option<String>,
}

/// Exit status when `--strict` rejects input that needed repairs.
const EXIT_STRICT: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(rejection) = err.downcast_ref::<commands::StrictRejection>() {
                for diagnostic in &rejection.diagnostics {
                    eprintln!("{}", diagnostic);
                }
                eprintln!("Error: {}", rejection);
                return ExitCode::from(EXIT_STRICT);
            }
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let comment = match &cli.command {
        Command::Convert(args) => args.comment.as_deref(),
        _ => None,
    };
    let config = commands::load_config(cli.config.as_deref(), comment)?;
    init_logging(&config.log.filter, cli.verbose);

    let context = commands::Context::new(config);
    match cli.command {
        Command::Convert(args) => commands::convert(
            &context,
            &commands::ConvertRequest {
                input: &args.input,
                from: args.from.as_deref(),
                to: args.to.as_deref(),
                strict: args.strict,
                output: args.output.as_deref(),
            },
        ),
        Command::Get(args) => commands::get(&context, &args.input, &args.path, args.from.as_deref()),
        Command::Formats => {
            commands::list_formats(&context);
            Ok(())
        }
    }
}

/// `RUST_LOG` wins over the configured filter; `--verbose` wins over both.
fn init_logging(default_filter: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
