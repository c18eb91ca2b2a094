//! Field renaming and value transforms.
//!
//! Null cells are skipped, so they never produce a key. Every other cell is
//! stored through [`UpdateFlags::TRANSLATED`]. Two daily columns need typed
//! reads: `weatherdate` becomes an ISO basic date and `windtot` is converted
//! from m/s to km/day.

use crate::ace::{AceRecord, AceWeather, UpdateFlags};
use crate::constants::{
    ACE_DATE_FORMAT, DAILY_FIELDS, STATION_FIELDS, WEATHER_DATE_COLUMN, WIND_COLUMN,
    WIND_MS_TO_KM_PER_DAY,
};
use crate::error::Result;
use crate::source::{Row, format_double};
use chrono::NaiveDateTime;

/// Copy the renamed station columns onto `station`
pub fn apply_station_fields(row: &Row, station: &mut AceWeather) {
    for (source, ace) in STATION_FIELDS {
        if let Some(value) = row.get(source) {
            station.update_with(ace, &value.to_string(), UpdateFlags::TRANSLATED);
        }
    }
}

/// Build a daily record from a `wdataday` row
pub fn daily_record(row: &Row) -> Result<AceRecord> {
    let mut record = AceRecord::new();
    for (source, ace) in DAILY_FIELDS {
        if let Some(value) = daily_value(row, source)? {
            record.update_with(ace, &value, UpdateFlags::TRANSLATED);
        }
    }
    Ok(record)
}

fn daily_value(row: &Row, column: &str) -> Result<Option<String>> {
    Ok(match column {
        WEATHER_DATE_COLUMN => row.get_date(column)?.map(format_ace_date),
        WIND_COLUMN => row.get_double(column)?.map(wind_km_per_day),
        _ => row.get(column).map(ToString::to_string),
    })
}

/// `YYYYMMDD`
pub fn format_ace_date(date: NaiveDateTime) -> String {
    date.format(ACE_DATE_FORMAT).to_string()
}

/// Wind run in m/s to km/day, rendered with the default double formatting
pub fn wind_km_per_day(metres_per_second: f64) -> String {
    format_double(metres_per_second * WIND_MS_TO_KM_PER_DAY)
}
