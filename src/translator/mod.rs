//! Ecofi weather database to ACE dataset translation.
//!
//! Single synchronous pass over one file:
//! open, probe for `ws`/`wdataday`, walk the stations, join each one's daily
//! rows by station code, rename and convert fields, and append the finished
//! station to the dataset. Every failure is logged and turned into an early
//! return with whatever has been built; nothing propagates to the caller.

pub mod daily;
pub mod emitter;
pub mod mapping;
pub mod station;

#[cfg(test)]
pub mod tests;

use crate::ace::AceDataset;
use crate::constants::{DAILY_TABLE, STATION_TABLE};
use crate::error::{EcofiError, Result};
use crate::models::{TranslationFailure, TranslationStats};
use crate::source::{Backend, Database, MdbTools};
use std::fs::{self, File};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};

/// Translate an Ecofi file with the mdbtools reader
///
/// Always returns a dataset; it is empty when the file cannot be read or
/// lacks the weather tables.
pub fn read(path: impl AsRef<Path>) -> AceDataset {
    EcofiTranslator::new(MdbTools::default()).read(path)
}

/// Translator bound to a database backend
#[derive(Debug, Clone, Default)]
pub struct EcofiTranslator<B = MdbTools> {
    backend: B,
}

impl<B: Backend> EcofiTranslator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn read(&self, path: impl AsRef<Path>) -> AceDataset {
        self.read_with_stats(path).0
    }

    /// Translate a file and report what was produced
    ///
    /// The database handle is dropped before this returns, on every path.
    pub fn read_with_stats(&self, path: impl AsRef<Path>) -> (AceDataset, TranslationStats) {
        let start_time = Instant::now();
        let mut dataset = AceDataset::new();
        let mut stats = TranslationStats::default();

        match open(&self.backend, path.as_ref()) {
            Some(database) => {
                if has_weather_tables(Some(&database)) {
                    debug!("Found the weather tables");
                    translate_weather_tables(&database, &mut dataset, &mut stats);
                } else {
                    error!("Unable to process data. Unable to find ws and wdataday tables");
                    stats.failure = Some(TranslationFailure::SchemaMissing);
                }
            }
            None => stats.failure = Some(TranslationFailure::FileUnreadable),
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();
        debug!(
            "Translation finished: {} stations, {} daily records, {} skipped in {}ms",
            stats.stations_emitted,
            stats.daily_records,
            stats.stations_skipped,
            stats.processing_time_ms
        );
        (dataset, stats)
    }
}

/// Open a database read-only, logging and returning `None` on any failure
pub fn open<B: Backend>(backend: &B, path: &Path) -> Option<B::Database> {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    match open_readable(backend, &path) {
        Ok(database) => {
            info!("Translating ecofi file: {}", path.display());
            Some(database)
        }
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

fn open_readable<B: Backend>(backend: &B, path: &Path) -> Result<B::Database> {
    let unreadable = |reason: String| EcofiError::FileUnreadable {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(path).map_err(|e| unreadable(e.to_string()))?;
    if !metadata.is_file() {
        return Err(unreadable("not a regular file".to_string()));
    }
    File::open(path).map_err(|e| unreadable(e.to_string()))?;
    backend.open(path).map_err(|e| unreadable(e.to_string()))
}

/// True iff both `ws` and `wdataday` exist (exact, case-sensitive names)
pub fn has_weather_tables<D: Database + ?Sized>(database: Option<&D>) -> bool {
    let Some(database) = database else {
        return false;
    };
    match database.table_names() {
        Ok(names) => names.contains(STATION_TABLE) && names.contains(DAILY_TABLE),
        Err(e) => {
            error!("IO Error: {}", e);
            false
        }
    }
}

/// Translate every station of an open database into `dataset`
///
/// Stops at the first failure, leaving completed stations in place and
/// recording the failure kind in `stats`.
pub fn translate_weather_tables<D: Database + ?Sized>(
    database: &D,
    dataset: &mut AceDataset,
    stats: &mut TranslationStats,
) {
    if let Err(err) = station::translate_stations(database, dataset, stats) {
        let failure = classify(&err);
        match failure {
            TranslationFailure::JoinBroken => error!(
                "Unable to process data. Unable to find relationship between weather tables"
            ),
            TranslationFailure::SchemaMissing => {
                error!("Unable to process data. Unable to find ws and wdataday tables")
            }
            _ => error!("Error reading tables: {}", err),
        }
        stats.failure = Some(failure);
    }
}

fn classify(err: &EcofiError) -> TranslationFailure {
    match err {
        EcofiError::InvalidLookup { .. } => TranslationFailure::JoinBroken,
        EcofiError::TableNotFound { .. } => TranslationFailure::SchemaMissing,
        _ => TranslationFailure::ReadFailed,
    }
}
