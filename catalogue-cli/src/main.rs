//! Catalogue — EODH workflow-catalogue record pipeline CLI.
//!
//! # Usage
//!
//! ```text
//! catalogue sync --files catalogue/workflows/*.json [--deleted-ids <id>...]
//!                [--skip-ades] [--skip-publish] [--json]
//! catalogue validate --files catalogue/workflows/*.json
//! ```
//!
//! Exit code 0 when every item succeeded (skips allowed), 1 otherwise.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{sync::SyncArgs, validate::ValidateArgs};

#[derive(Parser, Debug)]
#[command(
    name = "catalogue",
    version,
    about = "Validate, register and publish EODH workflow-catalogue records",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register/delete records in the catalogue service and publish
    /// workflows to the execution backend.
    Sync(SyncArgs),

    /// Structurally validate record files without touching the network.
    Validate(ValidateArgs),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Validate(args) => args.run(),
    }
}
