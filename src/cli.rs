//! Command-line interface components.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ecofi-ace")]
#[command(about = "Translate Ecofi weather databases into ACE weather datasets")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory containing the mdbtools executables (default: search PATH)
    #[arg(long, global = true, value_name = "DIR")]
    pub mdbtools_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate a database and write the ACE dataset as JSON
    Convert {
        /// Ecofi database (.accdb or .mdb)
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// Output file (default: the database path with a .json extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Translate a database and report what it contains
    Check {
        #[arg(value_name = "DATABASE")]
        database: PathBuf,
    },

    /// List the tables of a database
    Tables {
        #[arg(value_name = "DATABASE")]
        database: PathBuf,
    },
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Default output path: the database path with its extension replaced by `.json`
pub fn default_output_path(database: &Path) -> PathBuf {
    database.with_extension("json")
}
