//! CLI command implementations.
//!
//! Datasets persist as one JSON file per id under the data directory; every
//! command loads the directory into a fresh registry, acts, and (for add and
//! remove) writes the change back. Ingestion proper (archive unpacking,
//! per-record parsing) happens upstream; these files hold already-parsed
//! records.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::catalog::{DatasetRegistry, Record};
use crate::executor::QueryExecutor;
use crate::schema::DatasetKind;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// On-disk form of one dataset
#[derive(Debug, Serialize, Deserialize)]
struct DatasetFile {
    id: String,
    kind: DatasetKind,
    rows: Vec<Record>,
}

/// Entry point called by main
pub fn run() -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse_args();
    run_command(cli)
}

/// Dispatches a parsed command line
pub fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Add { id, kind, file } => add(&cli.data_dir, &id, &kind, &file),
        Command::Remove { id } => remove(&cli.data_dir, &id),
        Command::List => list(&cli.data_dir),
        Command::Query { file } => query(&cli.data_dir, &file),
    }
}

fn add(data_dir: &Path, id: &str, kind: &str, file: &Path) -> CliResult<()> {
    let kind = DatasetKind::parse(kind)
        .ok_or_else(|| CliError::data(format!("unknown kind {kind:?}, expected sections or rooms")))?;
    let text = fs::read_to_string(file)?;
    let rows: Vec<Record> = serde_json::from_str(&text)?;

    let registry = load_registry(data_dir)?;
    registry.add(id, kind, rows.clone())?;

    fs::create_dir_all(data_dir)?;
    let stored = DatasetFile {
        id: id.to_string(),
        kind,
        rows,
    };
    fs::write(dataset_path(data_dir, id), serde_json::to_string(&stored)?)?;
    println!("added dataset {id:?} ({} rows)", stored.rows.len());
    Ok(())
}

fn remove(data_dir: &Path, id: &str) -> CliResult<()> {
    let registry = load_registry(data_dir)?;
    registry.remove(id)?;
    fs::remove_file(dataset_path(data_dir, id))?;
    println!("removed dataset {id:?}");
    Ok(())
}

fn list(data_dir: &Path) -> CliResult<()> {
    let registry = load_registry(data_dir)?;
    println!("{}", serde_json::to_string_pretty(&registry.list())?);
    Ok(())
}

fn query(data_dir: &Path, file: &Path) -> CliResult<()> {
    let text = fs::read_to_string(file)?;
    let document: serde_json::Value = serde_json::from_str(&text)?;

    let registry = load_registry(data_dir)?;
    let executor = QueryExecutor::new(&registry);
    let result = executor.execute(&document)?;
    println!("{}", serde_json::to_string_pretty(&result.rows)?);
    Ok(())
}

/// Loads every `<id>.json` in the data directory into a fresh registry
fn load_registry(data_dir: &Path) -> CliResult<DatasetRegistry> {
    let registry = DatasetRegistry::new();
    if !data_dir.exists() {
        return Ok(registry);
    }

    for entry in fs::read_dir(data_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let text = fs::read_to_string(&path)?;
        let stored: DatasetFile = serde_json::from_str(&text)
            .map_err(|e| CliError::data(format!("malformed dataset file {path:?}: {e}")))?;
        debug!(dataset = %stored.id, rows = stored.rows.len(), "loaded dataset file");
        registry.add(&stored.id, stored.kind, stored.rows)?;
    }
    Ok(registry)
}

fn dataset_path(data_dir: &Path, id: &str) -> PathBuf {
    data_dir.join(format!("{id}.json"))
}
