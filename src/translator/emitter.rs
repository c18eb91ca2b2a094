//! Appends finished stations to the dataset.

use crate::ace::{AceDataset, AceWeather};
use crate::error::Result;
use tracing::debug;

/// Materialize `station` and append it; duplicates are kept as separate entries
pub fn emit(dataset: &mut AceDataset, mut station: AceWeather) -> Result<()> {
    let component = station.rebuild_component()?;
    debug!(
        "Emitting station {} (wid {}, {} daily records)",
        station.get("wst_id").unwrap_or_default(),
        station.id().unwrap_or_default(),
        station.daily_weather().len()
    );
    dataset.add_weather(&component)
}
