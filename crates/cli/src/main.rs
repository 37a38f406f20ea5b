//! Agendai CLI: the main entry point.
//!
//! Commands:
//! - `serve`   Start the HTTP API
//! - `analyze` Run one analysis from a JSON file and print the envelope
//! - `agenda`  Print the configured calendar's events
//! - `doctor`  Diagnose configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "agendai",
    about = "Agendai: task prioritization backed by a language model",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.agendai/config.toml)
    #[arg(short, long, global = true, env = "AGENDAI_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Analyze the tasks in a JSON file shaped like the /analisar body
    Analyze {
        /// Path to the request file, or `-` for stdin
        file: PathBuf,
    },

    /// Show the events of the configured calendar source
    Agenda,

    /// Diagnose configuration
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Serve { port } => commands::serve::run(config, port).await?,
        Commands::Analyze { file } => commands::analyze::run(config, &file).await?,
        Commands::Agenda => commands::agenda::run(config).await?,
        Commands::Doctor => commands::doctor::run(config).await?,
    }

    Ok(())
}
