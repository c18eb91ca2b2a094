//! Station to daily rows join.
//!
//! `wdataday.wscode` refers to `ws.wscode` without a declared relationship,
//! so the join is a point lookup per station. Backends answer it from an
//! index when they have one and by scanning otherwise, which is
//! O(stations x daily rows) in the worst case.

use super::mapping;
use crate::ace::AceRecordCollection;
use crate::constants::{DAILY_TABLE, STATION_CODE_COLUMN};
use crate::error::Result;
use crate::source::Database;
use tracing::trace;

/// Daily records of one station, in the order the lookup yields them
pub fn join_daily_records<D: Database + ?Sized>(
    database: &D,
    code: i64,
) -> Result<AceRecordCollection> {
    let mut daily = AceRecordCollection::new();
    for row in database.find_rows(DAILY_TABLE, STATION_CODE_COLUMN, code)? {
        let row = row?;
        trace!("Daily row for station {}: {:?}", code, row);
        daily.add(mapping::daily_record(&row)?);
    }
    Ok(daily)
}
