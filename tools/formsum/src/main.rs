mod commands;
mod policy;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{recompute::RecomputeArgs, schema::SchemaArgs, validate::ValidateArgs};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formsum", about = "Inspect form schemas and check stored submissions")]
struct Cli {
    /// Log more detail to stderr (-v: debug, -vv: trace); overrides RUST_LOG
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a schema and its evaluation plan
    Schema(SchemaArgs),
    /// Check stored submissions against their schema
    Validate(ValidateArgs),
    /// Reopen a submission, apply edits and re-encode it
    Recompute(RecomputeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Schema(args) => args.run(),
        Commands::Validate(args) => args.run(),
        Commands::Recompute(args) => args.run(),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
