//! Station table walk.

use super::{daily, emitter, mapping};
use crate::ace::{AceDataset, AceWeather};
use crate::constants::{ACE_STATION_ID, STATION_CODE_COLUMN, STATION_TABLE};
use crate::error::Result;
use crate::models::TranslationStats;
use crate::source::{Database, Row};
use tracing::trace;

/// Translate and emit every `ws` row in native order
///
/// An error stops the walk; stations emitted before it stay in `dataset`.
pub fn translate_stations<D: Database + ?Sized>(
    database: &D,
    dataset: &mut AceDataset,
    stats: &mut TranslationStats,
) -> Result<()> {
    for row in database.rows(STATION_TABLE)? {
        let row = row?;
        trace!("Row data: {:?}", row);

        match translate_station(database, &row)? {
            Some(station) => {
                let days = station.daily_weather().len();
                emitter::emit(dataset, station)?;
                stats.stations_emitted += 1;
                stats.daily_records += days;
            }
            None => stats.stations_skipped += 1,
        }
    }
    Ok(())
}

/// Build one station with its daily series; `None` when `wscode` is null
pub fn translate_station<D: Database + ?Sized>(
    database: &D,
    row: &Row,
) -> Result<Option<AceWeather>> {
    let Some(code) = row.get_int(STATION_CODE_COLUMN)? else {
        return Ok(None);
    };

    let mut station = AceWeather::new();
    station.update(ACE_STATION_ID, &code.to_string());
    mapping::apply_station_fields(row, &mut station);
    station.set_daily_weather(daily::join_daily_records(database, code)?);

    Ok(Some(station))
}
