//! Read-only access to the tables of an Ecofi database.
//!
//! The translator only needs three things from a desktop-database reader:
//! table names, a cursor over a whole table, and an equality lookup on an
//! integer column. [`Database`] captures that surface; [`Backend`] opens a
//! file into one. Handles are released on drop.

pub mod mdbtools;
pub mod memory;
pub mod value;

pub use mdbtools::{AccessVersion, MdbDatabase, MdbTools};
pub use memory::{MemoryDatabase, MemoryTable};
pub use value::{Row, Value, format_double};

use crate::error::{EcofiError, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// Cursor over table rows; an `Err` item stops the scan
pub type RowIter<'a> = Box<dyn Iterator<Item = Result<Row>> + 'a>;

/// An open, read-only database handle
pub trait Database {
    /// Names of all user tables
    fn table_names(&self) -> Result<BTreeSet<String>>;

    /// Column names of a table, in table order
    fn columns(&self, table: &str) -> Result<Vec<String>>;

    /// Every row of a table in native order
    fn rows(&self, table: &str) -> Result<RowIter<'_>>;

    /// Rows whose `column` equals `key`, starting from the top of the table
    ///
    /// Fails with [`EcofiError::InvalidLookup`] when the column does not exist.
    /// The default scans the whole table; backends with an index on `column`
    /// should override it.
    fn find_rows(&self, table: &str, column: &str, key: i64) -> Result<RowIter<'_>> {
        ensure_column(self, table, column)?;
        Ok(matching(self.rows(table)?, column, key))
    }
}

/// Opens a database file
pub trait Backend {
    type Database: Database;

    fn open(&self, path: &Path) -> Result<Self::Database>;
}

/// Fail with [`EcofiError::InvalidLookup`] unless `table` has `column`
pub(crate) fn ensure_column<D: Database + ?Sized>(
    database: &D,
    table: &str,
    column: &str,
) -> Result<()> {
    if database.columns(table)?.iter().any(|c| c == column) {
        Ok(())
    } else {
        Err(EcofiError::InvalidLookup {
            table: table.to_string(),
            column: column.to_string(),
        })
    }
}

/// Filter a cursor down to rows with `column == key`; errors pass through
pub(crate) fn matching<'a>(rows: RowIter<'a>, column: &str, key: i64) -> RowIter<'a> {
    let column = column.to_string();
    Box::new(rows.filter(move |row| match row {
        Ok(row) => row.get(&column).and_then(Value::as_int) == Some(key),
        Err(_) => true,
    }))
}
