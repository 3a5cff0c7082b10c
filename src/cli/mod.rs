//! CLI module for OpenFlight
//!
//! Provides command-line interface for:
//! - load: Import the dataset files into the store and exit
//! - serve: Import, then serve the HTTP API

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{load, run, serve};
pub use errors::{CliError, CliResult};
