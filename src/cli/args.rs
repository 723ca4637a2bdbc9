//! CLI argument definitions using clap
//!
//! Commands:
//! - insightdb add <id> --kind <kind> --file <records.json>
//! - insightdb remove <id>
//! - insightdb list
//! - insightdb query <query.json>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// insightdb - deterministic queries over campus course and room datasets
#[derive(Parser, Debug)]
#[command(name = "insightdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding one JSON file per loaded dataset
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a file of already-parsed records as a new dataset
    Add {
        /// Dataset id (no underscores, not all-whitespace)
        id: String,

        /// Record kind: sections or rooms
        #[arg(long)]
        kind: String,

        /// Path to a JSON array of records
        #[arg(long)]
        file: PathBuf,
    },

    /// Remove a loaded dataset
    Remove {
        /// Dataset id
        id: String,
    },

    /// List loaded datasets
    List,

    /// Execute a query document and print the result rows
    Query {
        /// Path to a query JSON file
        file: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
