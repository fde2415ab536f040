use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{Result, WeatherError};
use crate::model::{Coordinates, WeatherReading};
use crate::provider::truncate_body;

const OPEN_METEO_URL: &str = "https://api.open-meteo.com";

/// Simplified WMO weather interpretation codes. Kept as data so new codes
/// can be added without touching call sites; unmapped codes read "unknown".
const WMO_CODES: &[(u32, &str)] = &[
    (0, "clear sky"),
    (1, "mainly clear"),
    (2, "partly cloudy"),
    (3, "overcast"),
    (45, "fog"),
    (51, "light drizzle"),
    (61, "light rain"),
    (80, "rain showers"),
];

fn describe_code(code: u32) -> &'static str {
    WMO_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, text)| *text)
        .unwrap_or("unknown")
}

/// Open-Meteo daily-forecast client. Requires coordinates; supports
/// multi-day ranges, historical since 1940 and up to 7 days ahead.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    #[serde(default)]
    temperature_2m_mean: Vec<f64>,
    #[serde(default)]
    weather_code: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    daily: OmDaily,
}

impl OpenMeteoClient {
    pub fn new() -> Self {
        Self::with_base_url(OPEN_METEO_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }

    /// Fetch the daily series over `[start, end]` and reduce it to one
    /// reading: the arithmetic mean of the daily mean temperatures, and the
    /// first day's weather code as the description.
    pub async fn daily_forecast(
        &self,
        coords: Coordinates,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WeatherReading> {
        let url = format!("{}/v1/forecast", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("daily", "temperature_2m_mean,weather_code".to_string()),
                ("start_date", start.to_string()),
                ("end_date", end.to_string()),
                ("timezone", "UTC".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                WeatherError::Upstream(format!("Failed to send request to Open-Meteo: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Upstream(format!("Failed to read Open-Meteo response body: {e}"))
        })?;

        log::info!("Forecast API status ({start} to {end}): {status}");

        if !status.is_success() {
            log::error!("Forecast API error: {}", truncate_body(&body));
            return Err(WeatherError::Upstream(format!(
                "Failed to fetch forecast: status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: OmForecastResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::Upstream(format!("Failed to parse Open-Meteo JSON: {e}"))
        })?;

        let temps = &parsed.daily.temperature_2m_mean;
        if temps.is_empty() {
            return Err(WeatherError::NoForecastData);
        }

        let average = temps.iter().sum::<f64>() / temps.len() as f64;
        let code = parsed.daily.weather_code.first().copied().unwrap_or(0);

        Ok(WeatherReading {
            temperature: average,
            description: format!("Forecast average: {}", describe_code(code)),
        })
    }
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}
