//! Reader configuration.
//!
//! The translator itself has no tunables: rename tables and the wind factor
//! are constants. What can vary is where the mdbtools executables live and
//! how `mdb-export` renders timestamps, which is also how they are read back.

use crate::constants::{
    DEFAULT_EXPORT_DATETIME_FORMAT, MDB_EXPORT, MDB_TABLES, WEATHER_DATE_COLUMN,
};
use std::path::PathBuf;

/// Location and output format of the mdbtools executables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdbToolsConfig {
    /// Directory holding `mdb-tables` and `mdb-export`; `None` resolves them on `PATH`
    pub tools_dir: Option<PathBuf>,

    /// strftime layout passed to `mdb-export` and used to parse the date columns
    pub datetime_format: String,

    /// Columns read as timestamps; every other text cell stays text
    pub date_columns: Vec<String>,
}

impl Default for MdbToolsConfig {
    fn default() -> Self {
        Self {
            tools_dir: None,
            datetime_format: DEFAULT_EXPORT_DATETIME_FORMAT.to_string(),
            date_columns: vec![WEATHER_DATE_COLUMN.to_string()],
        }
    }
}

impl MdbToolsConfig {
    /// Use executables from a specific directory
    pub fn with_tools_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tools_dir = Some(dir.into());
        self
    }

    /// Override the export timestamp layout
    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }

    pub fn is_date_column(&self, column: &str) -> bool {
        self.date_columns.iter().any(|c| c == column)
    }

    /// Program path for a tool name
    pub fn program(&self, tool: &str) -> PathBuf {
        match &self.tools_dir {
            Some(dir) => dir.join(tool),
            None => PathBuf::from(tool),
        }
    }

    pub fn mdb_tables(&self) -> PathBuf {
        self.program(MDB_TABLES)
    }

    pub fn mdb_export(&self) -> PathBuf {
        self.program(MDB_EXPORT)
    }
}
