//! ACE dataset container and JSON output.

use super::weather::AceWeather;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Ordered collection of weather stations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AceDataset {
    #[serde(default)]
    weathers: Vec<AceWeather>,
}

impl AceDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a serialized weather component (see [`AceWeather::rebuild_component`])
    pub fn add_weather(&mut self, component: &[u8]) -> Result<()> {
        let weather: AceWeather = serde_json::from_slice(component)?;
        self.weathers.push(weather);
        Ok(())
    }

    pub fn weathers(&self) -> &[AceWeather] {
        &self.weathers
    }

    pub fn len(&self) -> usize {
        self.weathers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weathers.is_empty()
    }

    /// Daily records across all stations
    pub fn daily_record_count(&self) -> usize {
        self.weathers
            .iter()
            .map(|weather| weather.daily_weather().len())
            .sum()
    }

    pub fn write_json<W: Write>(&self, writer: W, pretty: bool) -> Result<()> {
        if pretty {
            serde_json::to_writer_pretty(writer, self)?;
        } else {
            serde_json::to_writer(writer, self)?;
        }
        Ok(())
    }

    /// Write the dataset as JSON, creating parent directories as needed
    pub fn write_json_file(&self, path: &Path, pretty: bool) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer, pretty)?;
        writer.flush()?;
        debug!("Wrote {} weather stations to {}", self.len(), path.display());
        Ok(())
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}
