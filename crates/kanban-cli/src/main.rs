#![forbid(unsafe_code)]

mod cmd;
mod output;
mod source;

use clap::{CommandFactory, Parser, Subcommand};
use kanban_core::config::resolve_config;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "kb: render tickets as a configurable kanban board",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format: pretty, text, or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (shorthand for --format json).
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "Render the ticket board",
        long_about = "Fetch tickets, group them into columns and order each column.",
        after_help = "EXAMPLES:\n    # Board grouped by status, ordered by priority (defaults)\n    kb board\n\n    # Group by owner, order by title\n    kb board --group-by userId --order-by title\n\n    # Render a saved payload\n    kb board --input tickets.json --group-by priority\n\n    # Emit machine-readable output\n    kb board --json"
    )]
    Board(cmd::board::BoardArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Inspect configuration",
        after_help = "EXAMPLES:\n    # Show the effective configuration\n    kb config show\n\n    # Show only the project file\n    kb config show --project"
    )]
    Config(cmd::config::ConfigArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    kb completions bash\n\n    # Generate zsh completions\n    kb completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose || env::var("DEBUG").is_ok() {
        "kb=debug,kanban_core=debug,info"
    } else {
        "kb=info,kanban_core=info,warn"
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("KANBAN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

    let format = env::var("KANBAN_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let project_root = env::current_dir()?;

    match &cli.command {
        Commands::Board(args) => {
            let config = resolve_config(&project_root)?;
            let output = resolve_output_mode(cli.format, cli.json, config.output.as_deref());
            debug!(?output, "resolved output mode");
            cmd::board::run_board(args, &config, output)
        }
        Commands::Config(args) => {
            let config = resolve_config(&project_root)?;
            let output = resolve_output_mode(cli.format, cli.json, config.output.as_deref());
            cmd::config::run_config(args, &config, &project_root, output)
        }
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let output = resolve_output_mode(cli.format, cli.json, None);
            if render_error(output, &CliError::from_anyhow(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
