//! ACE (Agricultural Crop Experiments) weather data model.
//!
//! Only the weather side of ACE is modelled: datasets of stations, each with
//! string-valued fields and an ordered daily series.

pub mod dataset;
pub mod record;
pub mod weather;

pub use dataset::AceDataset;
pub use record::{AceRecord, AceRecordCollection, UpdateFlags};
pub use weather::AceWeather;
