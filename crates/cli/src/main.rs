mod cmd;
mod output;
mod reporter;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// ship - Incremental build orchestrator for desktop applications with web frontends
#[derive(Parser)]
#[command(name = "ship")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Project directory containing project.json
  #[arg(short = 'C', long = "project", global = true, default_value = ".")]
  project: PathBuf,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the frontend and compile the application
  Build {
    /// Build in debug mode (keeps symbol tables)
    #[arg(short, long)]
    debug: bool,

    /// Reinstall frontend dependencies and rebuild everything
    #[arg(short, long)]
    force: bool,

    /// Run the packaging command after compiling
    #[arg(short, long)]
    package: bool,
  },

  /// Build in debug mode with the dev-server bridge and run the application
  Serve {
    /// Reinstall frontend dependencies and rebuild everything
    #[arg(short, long)]
    force: bool,

    /// Delay before printing the frontend dev server reminder (e.g. "5s", "500ms") [default: 2s]
    #[arg(long, value_parser = humantime::parse_duration)]
    reminder_delay: Option<Duration>,
  },

  /// Show what a build would do without running anything
  Plan {
    #[arg(short, long)]
    debug: bool,

    #[arg(short, long)]
    force: bool,

    #[arg(short, long)]
    package: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Show platform and plugin information
  Info,
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Build { debug, force, package } => cmd::cmd_build(&cli.project, debug, force, package),
    Commands::Serve { force, reminder_delay } => cmd::cmd_serve(&cli.project, force, reminder_delay),
    Commands::Plan {
      debug,
      force,
      package,
      output,
    } => cmd::cmd_plan(&cli.project, debug, force, package, output),
    Commands::Info => cmd::cmd_info(cli.verbose),
  };

  if let Err(err) = result {
    output::print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}
