//! lf CLI - HTML post-processing pipeline.
//!
//! Provides the `process` command, which rewrites footnotes into sidenotes
//! and renders formula spans in generated HTML files at the end of a site
//! build.

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::ProcessArgs;
use output::Output;

/// lf - post-processing for generated HTML.
#[derive(Parser)]
#[command(name = "lf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the post-processing transforms to generated HTML files.
    Process(ProcessArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Process(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Process(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
