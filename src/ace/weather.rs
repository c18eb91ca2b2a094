//! ACE weather station component.

use super::record::{AceRecord, AceRecordCollection, UpdateFlags};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A weather station: scalar fields, a daily series and a synthetic id
///
/// Serializes in the ACE layout: `wid`, the station fields inline, and the
/// daily series under `dailyWeather`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AceWeather {
    #[serde(rename = "wid", default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(flatten)]
    fields: AceRecord,

    #[serde(rename = "dailyWeather", default)]
    daily: AceRecordCollection,
}

impl AceWeather {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a station field with [`UpdateFlags::DEFAULT`]
    pub fn update(&mut self, key: &str, value: &str) -> bool {
        self.fields.update(key, value)
    }

    pub fn update_with(&mut self, key: &str, value: &str, flags: UpdateFlags) -> bool {
        self.fields.update_with(key, value, flags)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &AceRecord {
        &self.fields
    }

    pub fn daily_weather(&self) -> &AceRecordCollection {
        &self.daily
    }

    pub fn daily_weather_mut(&mut self) -> &mut AceRecordCollection {
        &mut self.daily
    }

    pub fn set_daily_weather(&mut self, daily: AceRecordCollection) {
        self.daily = daily;
    }

    /// Identifier assigned by the last [`AceWeather::get_id`] or rebuild, if any
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Content-derived identifier, computed when missing or when `regenerate` is set
    pub fn get_id(&mut self, regenerate: bool) -> Result<&str> {
        if regenerate || self.id.is_none() {
            self.id = Some(self.content_hash()?);
        }
        Ok(self.id.as_deref().unwrap_or_default())
    }

    /// Refresh the id and return the serialized component
    pub fn rebuild_component(&mut self) -> Result<Vec<u8>> {
        self.get_id(true)?;
        Ok(serde_json::to_vec(self)?)
    }

    // SHA-256 over the fields and daily series, lowercase hex
    fn content_hash(&self) -> Result<String> {
        let content = serde_json::to_vec(&(&self.fields, &self.daily))?;
        let digest = Sha256::digest(&content);
        Ok(digest.iter().map(|byte| format!("{byte:02x}")).collect())
    }
}
