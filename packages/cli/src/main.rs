mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    init, inspect, layouts, migrate, new_page, InitArgs, InspectArgs, MigrateArgs, NewArgs,
};

/// Folio CLI - block page builder
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Folio project
    Init(InitArgs),

    /// Create an empty page
    New(NewArgs),

    /// Import a legacy HTML page
    Migrate(MigrateArgs),

    /// Print a page outline and validate it
    Inspect(InspectArgs),

    /// List the available section layouts
    Layouts,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "Running command");

    let result = match std::env::current_dir() {
        Ok(dir) => {
            let cwd = dir.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::New(args) => new_page(args, &cwd).await,
                Command::Migrate(args) => migrate(args, &cwd).await,
                Command::Inspect(args) => inspect(args, &cwd).await,
                Command::Layouts => layouts(),
            }
        }
        Err(e) => Err(anyhow::anyhow!("Cannot get current directory: {}", e)),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
