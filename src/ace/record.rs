//! Flat ACE records and ordered record collections.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How [`AceRecord::update_with`] merges a value into a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateFlags {
    /// Replace an existing value; otherwise keep the first one written
    pub overwrite: bool,
    /// Strip surrounding whitespace before storing
    pub trim: bool,
    /// Re-render numeric strings in canonical form (`045.50` becomes `45.5`)
    pub coerce_numeric: bool,
}

impl UpdateFlags {
    /// Plain assignment
    pub const DEFAULT: Self = Self {
        overwrite: true,
        trim: false,
        coerce_numeric: false,
    };

    /// Flags used for every translated source cell
    pub const TRANSLATED: Self = Self {
        overwrite: true,
        trim: true,
        coerce_numeric: false,
    };
}

impl Default for UpdateFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A flat map of ACE field names to string values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AceRecord {
    fields: BTreeMap<String, String>,
}

impl AceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field with [`UpdateFlags::DEFAULT`]
    pub fn update(&mut self, key: &str, value: &str) -> bool {
        self.update_with(key, value, UpdateFlags::DEFAULT)
    }

    /// Merge a value into the record; returns whether it was stored
    pub fn update_with(&mut self, key: &str, value: &str, flags: UpdateFlags) -> bool {
        if !flags.overwrite && self.fields.contains_key(key) {
            return false;
        }

        let value = if flags.trim { value.trim() } else { value };
        let value = if flags.coerce_numeric {
            canonical_number(value).unwrap_or_else(|| value.to_string())
        } else {
            value.to_string()
        };

        self.fields.insert(key.to_string(), value);
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn canonical_number(value: &str) -> Option<String> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.to_string())
}

/// Ordered collection of records, e.g. the daily series of a station
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AceRecordCollection {
    records: Vec<AceRecord>,
}

impl AceRecordCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: AceRecord) {
        self.records.push(record);
    }

    pub fn get(&self, index: usize) -> Option<&AceRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a AceRecordCollection {
    type Item = &'a AceRecord;
    type IntoIter = std::slice::Iter<'a, AceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<AceRecord> for AceRecordCollection {
    fn from_iter<I: IntoIterator<Item = AceRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
