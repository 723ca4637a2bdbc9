//! CLI module for insightdb
//!
//! Provides the command-line surface over the dataset registry and the query
//! engine:
//! - add: load a file of parsed records as a new dataset
//! - remove: drop a loaded dataset
//! - list: show loaded dataset summaries
//! - query: execute a query document

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{run, run_command};
pub use errors::{CliError, CliResult};
