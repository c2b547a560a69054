//! Weather safety core: PM2.5 classification, outdoor safety scoring and a
//! persisted recent-search history, served as MCP tools.

pub mod air_quality;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatters;
pub mod history;
pub mod models;
pub mod safety;
pub mod service;

pub use air_quality::{classify, AirQualityCategory};
pub use error::Error;
pub use history::{FileStore, KeyValueStore, MemoryStore, SearchHistory, SearchHistoryStore};
pub use safety::{score, Advisory, SafetyAssessment, WeatherSnapshot};
pub use service::{Session, WeatherSafety};
