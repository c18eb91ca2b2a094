//! In-memory tables with optional integer indexes.
//!
//! Backs the mdbtools reader once a table has been exported, and serves as a
//! fixture database in tests.

use super::{Backend, Database, Row, RowIter, ensure_column, matching};
use crate::error::{EcofiError, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use tracing::debug;

/// A table held in memory
///
/// Columns are kept in declaration order; a row may omit any of them (null).
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    columns: Vec<String>,
    rows: Vec<Row>,
    indexes: HashMap<String, HashMap<i64, Vec<usize>>>,
}

impl MemoryTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            indexes: HashMap::new(),
        }
    }

    /// Builder form of [`MemoryTable::push`]
    pub fn with_row(mut self, row: Row) -> Self {
        self.push(row);
        self
    }

    /// Builder form of [`MemoryTable::create_index`]
    pub fn with_index(mut self, column: &str) -> Self {
        self.create_index(column);
        self
    }

    /// Append a row; columns it introduces are added to the table
    pub fn push(&mut self, row: Row) {
        let position = self.rows.len();
        for (column, value) in row.iter() {
            if !self.columns.iter().any(|c| c == column) {
                self.columns.push(column.to_string());
            }
            if let (Some(index), Some(key)) = (self.indexes.get_mut(column), value.as_int()) {
                index.entry(key).or_default().push(position);
            }
        }
        self.rows.push(row);
    }

    /// Index an integer column; rows whose cell is null or non-integer are not indexed
    pub fn create_index(&mut self, column: &str) {
        let mut index: HashMap<i64, Vec<usize>> = HashMap::new();
        for (position, row) in self.rows.iter().enumerate() {
            if let Some(key) = row.get(column).and_then(|v| v.as_int()) {
                index.entry(key).or_default().push(position);
            }
        }
        debug!(
            "Indexed column {} over {} rows ({} distinct keys)",
            column,
            self.rows.len(),
            index.len()
        );
        self.indexes.insert(column.to_string(), index);
    }

    pub fn has_index(&self, column: &str) -> bool {
        self.indexes.contains_key(column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Positions of rows with `column == key`, `None` when the column has no index
    pub fn lookup(&self, column: &str, key: i64) -> Option<&[usize]> {
        self.indexes
            .get(column)
            .map(|index| index.get(&key).map_or(&[][..], Vec::as_slice))
    }
}

/// A database whose tables all live in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: BTreeMap<String, MemoryTable>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: impl Into<String>, table: MemoryTable) -> Self {
        self.insert_table(name, table);
        self
    }

    pub fn insert_table(&mut self, name: impl Into<String>, table: MemoryTable) {
        self.tables.insert(name.into(), table);
    }

    fn require(&self, name: &str) -> Result<&MemoryTable> {
        self.tables.get(name).ok_or_else(|| EcofiError::TableNotFound {
            table: name.to_string(),
        })
    }
}

impl Database for MemoryDatabase {
    fn table_names(&self) -> Result<BTreeSet<String>> {
        Ok(self.tables.keys().cloned().collect())
    }

    fn columns(&self, table: &str) -> Result<Vec<String>> {
        Ok(self.require(table)?.columns().to_vec())
    }

    fn rows(&self, table: &str) -> Result<RowIter<'_>> {
        let table = self.require(table)?;
        Ok(Box::new(table.rows().iter().cloned().map(Ok::<Row, EcofiError>)))
    }

    fn find_rows(&self, table: &str, column: &str, key: i64) -> Result<RowIter<'_>> {
        ensure_column(self, table, column)?;
        let source = self.require(table)?;
        match source.lookup(column, key) {
            Some(positions) => Ok(Box::new(
                positions
                    .iter()
                    .map(move |&i| -> Result<Row> { Ok(source.rows()[i].clone()) }),
            )),
            None => Ok(matching(self.rows(table)?, column, key)),
        }
    }
}

/// Opening any path yields a copy of the fixture database
impl Backend for MemoryDatabase {
    type Database = MemoryDatabase;

    fn open(&self, _path: &Path) -> Result<MemoryDatabase> {
        Ok(self.clone())
    }
}
