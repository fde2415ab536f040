use std::sync::Arc;

use crate::error::{Result, WeatherError};
use crate::export::{self, ExportFormat, ExportOutput};
use crate::model::{RecordPatch, WeatherQuery, WeatherRecord};
use crate::provider::WeatherProvider;
use crate::store::{NewRecord, RecordStore};
use crate::validate::{validate_date_range, validate_location};

/// Orchestrates validators, the external provider and the record store.
///
/// The store is passed per call rather than owned: the server opens a
/// short-lived store for each request.
#[derive(Debug, Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Validate the query, resolve it against the provider and persist the
    /// result. The forecast path is taken iff both date bounds are present.
    pub async fn create(&self, store: &RecordStore, query: WeatherQuery) -> Result<WeatherRecord> {
        validate_date_range(query.date_range_start, query.date_range_end)?;
        if !validate_location(self.provider.as_ref(), &query.location).await {
            return Err(WeatherError::InvalidLocation);
        }

        let reading = match (query.date_range_start, query.date_range_end) {
            (Some(start), Some(end)) => {
                self.provider
                    .fetch_forecast(&query.location, start, end)
                    .await?
            }
            _ => self.provider.fetch_current_weather(&query.location).await?,
        };

        store.insert(&NewRecord {
            location: query.location,
            date_range_start: query.date_range_start,
            date_range_end: query.date_range_end,
            temperature: reading.temperature,
            weather_description: reading.description,
        })
    }

    pub fn list(&self, store: &RecordStore) -> Result<Vec<WeatherRecord>> {
        store.list()
    }

    pub fn get(&self, store: &RecordStore, id: i64) -> Result<WeatherRecord> {
        store.get(id)
    }

    /// Apply a patch: location first (re-validated), then dates (which
    /// re-validate the range and re-fetch the reading), then the explicit
    /// temperature/description overrides, which always win.
    ///
    /// Overrides are presence-based, so an explicit `0.0` temperature is
    /// honored.
    pub async fn update(
        &self,
        store: &RecordStore,
        id: i64,
        patch: RecordPatch,
    ) -> Result<WeatherRecord> {
        let mut record = store.get(id)?;
        let dates_changed = patch.date_range_start.is_some() || patch.date_range_end.is_some();

        if let Some(location) = patch.location {
            if !validate_location(self.provider.as_ref(), &location).await {
                return Err(WeatherError::InvalidLocation);
            }
            record.location = location;
        }

        if dates_changed {
            let start = patch.date_range_start.or(record.date_range_start);
            let end = patch.date_range_end.or(record.date_range_end);
            validate_date_range(start, end)?;
            record.date_range_start = start;
            record.date_range_end = end;

            let reading = match (start, end) {
                (Some(start), Some(end)) => {
                    self.provider
                        .fetch_forecast(&record.location, start, end)
                        .await?
                }
                _ => self.provider.fetch_current_weather(&record.location).await?,
            };
            record.temperature = reading.temperature;
            record.weather_description = reading.description;
        }

        if let Some(temperature) = patch.temperature {
            record.temperature = temperature;
        }
        if let Some(description) = patch.weather_description {
            record.weather_description = description;
        }

        store.update(&record)
    }

    pub fn delete(&self, store: &RecordStore, id: i64) -> Result<()> {
        store.delete(id)
    }

    /// Serialize the full current record set, unfiltered and unpaginated.
    pub fn export(&self, store: &RecordStore, format: ExportFormat) -> Result<ExportOutput> {
        let records = store.list()?;
        export::render(format, &records)
    }
}
