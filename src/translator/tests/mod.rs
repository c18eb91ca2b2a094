//! Translation tests over fixture databases
//!
//! Fixtures are in-memory `ws`/`wdataday` tables opened through the
//! `Backend` seam, so every test runs the same path as a real file.


use crate::ace::AceDataset;
use crate::models::TranslationStats;
use crate::source::{Backend, MemoryDatabase, MemoryTable, Row};
use crate::translator::EcofiTranslator;
use chrono::NaiveDate;
use std::io;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

pub const STATION_COLUMNS: [&str; 9] = [
    "wscode",
    "wsname",
    "wslat",
    "wslong",
    "wsalt",
    "countrycode",
    "x_wgs84",
    "y_wgs84",
    "wstype",
];

pub const DAILY_COLUMNS: [&str; 15] = [
    "wscode",
    "weatherdate",
    "tmin",
    "tmax",
    "tmoy",
    "rhmin",
    "rhmax",
    "rainfall",
    "windtot",
    "radiation",
    "sunshine",
    "eto",
    "rhmoy",
    "windmax",
    "grad",
];

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A `ws` row with a station code and name
pub fn station(code: i64, name: &str) -> Row {
    Row::new().with("wscode", code).with("wsname", name)
}

/// A `wdataday` row with a station code and date
pub fn day(code: i64, date: NaiveDate) -> Row {
    Row::new().with("wscode", code).with("weatherdate", date)
}

pub fn station_table(rows: impl IntoIterator<Item = Row>) -> MemoryTable {
    rows.into_iter()
        .fold(MemoryTable::new(STATION_COLUMNS), MemoryTable::with_row)
}

pub fn daily_table(rows: impl IntoIterator<Item = Row>) -> MemoryTable {
    rows.into_iter()
        .fold(MemoryTable::new(DAILY_COLUMNS), MemoryTable::with_row)
}

pub fn weather_database(
    stations: impl IntoIterator<Item = Row>,
    days: impl IntoIterator<Item = Row>,
) -> MemoryDatabase {
    MemoryDatabase::new()
        .with_table("ws", station_table(stations))
        .with_table("wdataday", daily_table(days))
}

/// Translate through `backend` using a real (empty) file as the path
pub fn translate<B: Backend>(backend: B) -> (AceDataset, TranslationStats) {
    let file = NamedTempFile::new().unwrap();
    EcofiTranslator::new(backend).read_with_stats(file.path())
}

/// Shared buffer collecting formatted log lines
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Number of lines logged at `level` (e.g. `"ERROR"`)
    pub fn count(&self, level: &str) -> usize {
        self.contents()
            .lines()
            .filter(|line| line.split_whitespace().any(|word| word == level))
            .count()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber writing into a [`LogBuffer`]
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, LogBuffer) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_target(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer)
}
