//! CLI argument definitions using clap
//!
//! Commands:
//! - openflight load [--data-dir <path>] [--db <path>]
//! - openflight serve [--data-dir <path>] [--db <path>] [--host <host>] [--port <port>]
//!
//! Flags override the corresponding environment-driven settings.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// OpenFlight - public aviation reference data over a JSON API
#[derive(Parser, Debug)]
#[command(name = "openflight")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import the dataset files into the store and exit
    Load {
        /// Directory holding the downloaded dataset files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Import the dataset files, then serve the HTTP API
    Serve {
        /// Directory holding the downloaded dataset files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
