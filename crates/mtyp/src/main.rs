//! mtyp CLI - Mermaid diagrams in Typst documents.
//!
//! Provides commands for:
//! - `render`: Render the diagrams of a document given on the command line
//! - `browse`: Pick a document interactively, then render it

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BrowseArgs, RenderArgs};
use error::CliError;
use output::Output;

/// mtyp - Render Mermaid diagrams in Typst documents.
#[derive(Parser)]
#[command(name = "mtyp", version, about)]
struct Cli {
    /// Enable verbose output (renderer version, cache hits).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render diagrams in a Typst document.
    Render(RenderArgs),
    /// Browse the filesystem for a Typst document to render.
    Browse(BrowseArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Browse(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&error_message(&err));
        std::process::exit(1);
    }
}

/// Line printed before exiting with status 1.
fn error_message(err: &CliError) -> String {
    format!("Error: {err}")
}
