//! Translation constants for the Ecofi to ACE mapping
//!
//! Table and column names of the Ecofi weather schema, the two field rename
//! tables and the unit conversion applied to wind. All names are matched
//! case-sensitively.

// =============================================================================
// Source Schema
// =============================================================================

/// Station table name
pub const STATION_TABLE: &str = "ws";

/// Daily observation table name
pub const DAILY_TABLE: &str = "wdataday";

/// Station code column; present in both tables, no declared relationship
pub const STATION_CODE_COLUMN: &str = "wscode";

/// Observation date column of the daily table (read as a date)
pub const WEATHER_DATE_COLUMN: &str = "weatherdate";

/// Wind run column of the daily table (read as a double, m/s)
pub const WIND_COLUMN: &str = "windtot";

// =============================================================================
// ACE Field Names
// =============================================================================

/// ACE station identifier field
pub const ACE_STATION_ID: &str = "wst_id";

/// ACE daily date field
pub const ACE_DATE: &str = "w_date";

/// ACE synthetic identifier of a weather component
pub const ACE_WEATHER_ID: &str = "wid";

/// ACE key for the daily record collection of a weather component
pub const ACE_DAILY_WEATHER: &str = "dailyWeather";

// =============================================================================
// Rename Tables
// =============================================================================

/// Station fields: `(ws column, ACE field)`
///
/// `countrycode` is a 2-character ISO code while `wst_loc_1` expects three
/// characters; it is passed through without lookup. `ecogi_y_wgs84` is spelled
/// as downstream consumers already key on it.
pub const STATION_FIELDS: &[(&str, &str)] = &[
    ("wsname", "wst_name"),
    ("wslat", "wst_lat"),
    ("wslong", "wst_long"),
    ("wsalt", "wst_elev"),
    ("countrycode", "wst_loc_1"),
    ("x_wgs84", "ecofi_x_wgs84"),
    ("y_wgs84", "ecogi_y_wgs84"),
    ("wstype", "ecofi_wstype"),
];

/// Daily fields: `(wdataday column, ACE field)`
pub const DAILY_FIELDS: &[(&str, &str)] = &[
    ("weatherdate", "w_date"),
    ("tmin", "tmin"),
    ("tmax", "tmax"),
    ("tmoy", "tavd"),
    ("rhmin", "rhumd"),
    ("rhmax", "rhuxd"),
    ("rainfall", "rain"),
    ("windtot", "wind"),
    ("radiation", "srad"),
    ("sunshine", "sunh"),
    ("eto", "eto"),
    ("rhmoy", "ecofi_rhmoy"),
    ("windmax", "ecofi_windmax"),
    ("grad", "ecofi_grad"),
];

// =============================================================================
// Unit Conversions
// =============================================================================

/// Seconds per day divided by metres per kilometre: m/s to km/day
pub const WIND_MS_TO_KM_PER_DAY: f64 = 86.4;

/// ISO basic calendar date, `YYYYMMDD`
pub const ACE_DATE_FORMAT: &str = "%Y%m%d";

// =============================================================================
// mdbtools
// =============================================================================

/// Lists table names of an Access file
pub const MDB_TABLES: &str = "mdb-tables";

/// Exports one table as CSV
pub const MDB_EXPORT: &str = "mdb-export";

/// Timestamp layout requested from `mdb-export`; polars parses it back as a datetime
pub const DEFAULT_EXPORT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
