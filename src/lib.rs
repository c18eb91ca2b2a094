//! Ecofi to ACE weather translator
//!
//! Reads the weather tables of an Ecofi database (Microsoft Access
//! `.accdb`/`.mdb`) and produces an ACE weather dataset.
//!
//! This library provides:
//! - A read-only table reader seam with in-memory and mdbtools backends
//! - The station/daily join on the undeclared `wscode` relationship
//! - Field renaming to the ACE vocabulary, ISO basic dates and wind in km/day
//! - The ACE weather model with JSON output
//!
//! ```no_run
//! let dataset = ecofi_ace::read("weather.accdb");
//! println!("{} weather stations", dataset.len());
//! ```

pub mod ace;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod source;
pub mod translator;

// Re-export commonly used types
pub use ace::{AceDataset, AceRecord, AceRecordCollection, AceWeather, UpdateFlags};
pub use config::MdbToolsConfig;
pub use error::{EcofiError, Result};
pub use models::{TranslationFailure, TranslationStats};
pub use translator::{EcofiTranslator, read};
