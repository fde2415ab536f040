use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One stored weather query result.
///
/// `id` is assigned by the store on insert and never changes afterwards.
/// The date bounds travel as a pair in practice, but the schema permits
/// independent nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub id: i64,
    pub location: String,
    pub date_range_start: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
    /// Degrees Celsius; a single current reading or a period average.
    pub temperature: f64,
    pub weather_description: String,
}

/// Create request: a free-text location plus an optional date range.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherQuery {
    pub location: String,
    pub date_range_start: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
}

/// Update request: one optional slot per mutable field.
///
/// Applied in a fixed order: location first, then dates (which trigger a
/// re-fetch), then the explicit `temperature`/`weather_description`
/// overrides, so the overrides always win.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPatch {
    pub location: Option<String>,
    pub date_range_start: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
    pub temperature: Option<f64>,
    pub weather_description: Option<String>,
}

/// Normalized result of a provider lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub temperature: f64,
    pub description: String,
}

/// Latitude/longitude pair returned by the geocoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}
