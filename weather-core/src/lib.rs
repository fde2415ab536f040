//! Core library for the weather records backend.
//!
//! This crate defines:
//! - Configuration & provider credentials handling
//! - Clients for the external geocoding/weather services
//! - The SQLite-backed record store
//! - Validation, orchestration and the export formatters
//!
//! It is used by `weather-server`, but can also be reused by other binaries
//! or services.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod provider;
pub mod service;
pub mod store;
pub mod validate;

pub use config::Config;
pub use error::{Result, WeatherError};
pub use export::{ExportFormat, ExportOutput};
pub use model::{Coordinates, RecordPatch, WeatherQuery, WeatherReading, WeatherRecord};
pub use provider::{HttpWeatherProvider, WeatherProvider};
pub use service::WeatherService;
pub use store::{NewRecord, RecordStore};
