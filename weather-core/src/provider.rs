use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use crate::error::Result;
use crate::model::WeatherReading;
use crate::provider::{
    geocode::Geocoder, openmeteo::OpenMeteoClient, openweather::OpenWeatherClient,
};

pub mod geocode;
pub mod openmeteo;
pub mod openweather;
pub mod youtube;

/// Abstraction over the external weather/geocoding services.
///
/// The service layer picks between the two fetch operations based solely on
/// whether both date bounds are present: the forecast provider requires
/// coordinates and supports multi-day ranges, the current-weather provider
/// accepts a place name directly but has no range concept.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Instantaneous conditions for a free-text place name.
    async fn fetch_current_weather(&self, location: &str) -> Result<WeatherReading>;

    /// Mean temperature and first-day conditions over `[start, end]`.
    async fn fetch_forecast(
        &self,
        location: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WeatherReading>;

    /// True iff a current-weather lookup succeeds. Never fails: any error,
    /// network ones included, is downgraded to `false`.
    async fn check_location_exists(&self, location: &str) -> bool {
        match self.fetch_current_weather(location).await {
            Ok(_) => true,
            Err(e) => {
                log::error!("Location validation failed for {location}: {e}");
                false
            }
        }
    }
}

/// Live [`WeatherProvider`] composed of the real HTTP clients.
#[derive(Debug)]
pub struct HttpWeatherProvider {
    current: OpenWeatherClient,
    geocoder: Geocoder,
    forecast: OpenMeteoClient,
}

impl HttpWeatherProvider {
    pub fn new(openweather_api_key: String) -> Self {
        Self {
            current: OpenWeatherClient::new(openweather_api_key),
            geocoder: Geocoder::new(),
            forecast: OpenMeteoClient::new(),
        }
    }

    /// Compose from explicit clients; used by tests to point each endpoint
    /// at a mock server.
    pub fn with_clients(
        current: OpenWeatherClient,
        geocoder: Geocoder,
        forecast: OpenMeteoClient,
    ) -> Self {
        Self {
            current,
            geocoder,
            forecast,
        }
    }
}

#[async_trait]
impl WeatherProvider for HttpWeatherProvider {
    async fn fetch_current_weather(&self, location: &str) -> Result<WeatherReading> {
        self.current.current_weather(location).await
    }

    async fn fetch_forecast(
        &self,
        location: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WeatherReading> {
        let coords = self.geocoder.resolve(location).await?;
        self.forecast.daily_forecast(coords, start, end).await
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_leaves_short_bodies_alone() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_body_caps_long_bodies() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
    }
}
