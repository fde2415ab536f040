use reqwest::Client;
use serde::Deserialize;

use crate::error::{Result, WeatherError};
use crate::model::WeatherReading;
use crate::provider::truncate_body;

const OPENWEATHER_URL: &str = "https://api.openweathermap.org";

/// OpenWeatherMap current-conditions client. Takes a place name directly;
/// has no notion of a date range.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, OPENWEATHER_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    pub async fn current_weather(&self, location: &str) -> Result<WeatherReading> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                WeatherError::Upstream(format!("Failed to send request to OpenWeather: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Upstream(format!("Failed to read OpenWeather response body: {e}"))
        })?;

        log::info!("Current weather API status for {location}: {status}");

        if !status.is_success() {
            log::error!("Current weather API error: {}", truncate_body(&body));
            return Err(WeatherError::Upstream(format!(
                "Failed to fetch weather: status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::Upstream(format!("Failed to parse OpenWeather JSON: {e}"))
        })?;

        let description = parsed
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(WeatherReading {
            temperature: parsed.main.temp,
            description,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
}
