//! viewtree CLI
//!
//! Command-line interface for building component trees from templates

use clap::{Parser, Subcommand, ValueEnum};
use viewtree_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "viewtree")]
#[command(about = "viewtree - template to component tree reconciliation", long_about = None)]
struct Cli {
    /// Emit engine logs on stderr
    #[arg(long, global = true, value_enum)]
    log: Option<LogProfile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogProfile {
    Development,
    Production,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build a template one or more times against a single view
    Build(commands::build::BuildArgs),
}

fn main() {
    let cli = Cli::parse();

    match cli.log {
        Some(LogProfile::Development) => init(Profile::Development),
        Some(LogProfile::Production) => init(Profile::Production),
        None => {}
    }

    let result = match cli.command {
        Commands::Build(args) => commands::build::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
