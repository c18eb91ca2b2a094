//! Error handling for Ecofi database access and ACE translation.
//!
//! Provides error types with context for opening Access files, running
//! the mdbtools executables, typed cell access and dataset serialization.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EcofiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unable to open file: {path}, Reason: {reason}")]
    FileUnreadable { path: PathBuf, reason: String },

    #[error("Not a Microsoft Access database: {path}")]
    NotAccessDatabase { path: PathBuf },

    #[error("Table not found: {table}")]
    TableNotFound { table: String },

    #[error("Invalid lookup on table {table}: column {column} does not exist")]
    InvalidLookup { table: String, column: String },

    #[error("Column {column} holds {found}, expected {expected}")]
    CellType {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{tool} could not be started: {source}")]
    ToolMissing {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed with status {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },
}

pub type Result<T> = std::result::Result<T, EcofiError>;
