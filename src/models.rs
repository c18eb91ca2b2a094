//! Translation outcome types.
//!
//! Translation never fails towards the caller; these types record what was
//! produced and, when a run stopped early, which failure kind stopped it.

use std::fmt;

/// Why a translation stopped before covering the whole station table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationFailure {
    /// Path not readable, or the reader could not open it
    FileUnreadable,
    /// `ws` or `wdataday` is missing
    SchemaMissing,
    /// The station code equality lookup was rejected by the reader
    JoinBroken,
    /// A read failed while iterating tables
    ReadFailed,
}

impl fmt::Display for TranslationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationFailure::FileUnreadable => write!(f, "file unreadable"),
            TranslationFailure::SchemaMissing => write!(f, "weather tables missing"),
            TranslationFailure::JoinBroken => write!(f, "station/daily relationship not found"),
            TranslationFailure::ReadFailed => write!(f, "read failed mid-scan"),
        }
    }
}

/// Translation statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationStats {
    /// Stations appended to the dataset
    pub stations_emitted: usize,
    /// `ws` rows skipped for a null station code
    pub stations_skipped: usize,
    /// Daily records attached to emitted stations
    pub daily_records: usize,
    /// Set when the run stopped early
    pub failure: Option<TranslationFailure>,
    pub processing_time_ms: u128,
}

impl TranslationStats {
    /// True when every station row was visited
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}
