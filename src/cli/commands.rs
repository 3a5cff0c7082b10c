//! CLI command implementations
//!
//! Settings come from the environment once at startup; command-line flags
//! override individual values. The loader always runs before the server
//! accepts traffic, and a failed import is logged but does not prevent the
//! server from starting.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::dataset::{self, LoadReport};
use crate::http_server::HttpServer;
use crate::observability::Logger;
use crate::store::Store;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parse arguments and dispatch to the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Command::Load { data_dir, db } => load(data_dir, db),
        Command::Serve {
            data_dir,
            db,
            host,
            port,
        } => serve(data_dir, db, host, port),
    }
}

/// Import the dataset files into the store and exit
pub fn load(data_dir: Option<PathBuf>, db: Option<PathBuf>) -> CliResult<()> {
    let mut settings = Settings::from_env();
    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }
    if let Some(path) = db {
        settings.db_path = path;
    }

    let store = Store::open(&settings.db_path).map_err(|e| CliError::load_failed(e.to_string()))?;
    let report = dataset::load_dir(&store, &settings.data_dir)
        .map_err(|e| CliError::load_failed(e.to_string()))?;
    log_report(&report);

    Ok(())
}

/// Import the dataset files, then serve the HTTP API
pub fn serve(
    data_dir: Option<PathBuf>,
    db: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> CliResult<()> {
    let mut settings = Settings::from_env();
    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }
    if let Some(path) = db {
        settings.db_path = path;
    }
    if let Some(host) = host {
        settings.host = host;
    }
    if let Some(port) = port {
        settings.port = port;
    }

    let store =
        Arc::new(Store::open(&settings.db_path).map_err(|e| CliError::serve_failed(e.to_string()))?);

    // Populate before accepting traffic; an import failure is logged and
    // the API serves whatever the store already holds.
    match dataset::load_dir(&store, &settings.data_dir) {
        Ok(report) => log_report(&report),
        Err(e) => Logger::error("DATASET_LOAD_FAILED", &[("error", &e.to_string())]),
    }

    let server = HttpServer::new(&settings, store);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(server.start())
        .map_err(|e| CliError::serve_failed(e.to_string()))
}

fn log_report(report: &LoadReport) {
    Logger::info(
        "DATASET_READY",
        &[
            ("inserted", &report.inserted().to_string()),
            ("total", &report.total().to_string()),
            ("airports", &report.airports.total.to_string()),
            ("comments_discarded", &report.comments_discarded.to_string()),
        ],
    );
}
