//! MDS CLI - Markdown site compiler.
//!
//! Provides commands for:
//! - `build`: Compile a content directory into a persisted site index
//! - `compile`: Compile one markdown file to an HTML fragment
//! - `query`: Look up, filter, or export a built site index

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CompileArgs, QueryArgs};
use output::Output;

/// MDS - Markdown site compiler.
#[derive(Parser)]
#[command(name = "mds", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site index from a content directory.
    Build(BuildArgs),
    /// Compile a single markdown file and print the HTML.
    Compile(CompileArgs),
    /// Query a built site index.
    Query(QueryArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Build(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Compile(args) => args.execute(),
        Commands::Query(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
