use reqwest::Client;
use serde::Deserialize;

use crate::error::{Result, WeatherError};
use crate::model::Coordinates;
use crate::provider::truncate_body;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
// Nominatim rejects requests without a User-Agent.
const USER_AGENT: &str = "weather-backend/0.1";

/// Free-text place name → first-match coordinates, via Nominatim.
#[derive(Debug, Clone)]
pub struct Geocoder {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    // Nominatim serializes coordinates as strings.
    lat: String,
    lon: String,
}

impl Geocoder {
    pub fn new() -> Self {
        Self::with_base_url(NOMINATIM_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }

    /// Resolve `location` to its first match, or fail with an upstream
    /// error when the service errors or knows no such place.
    pub async fn resolve(&self, location: &str) -> Result<Coordinates> {
        let url = format!("{}/search", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", location), ("format", "json"), ("limit", "1")])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| {
                WeatherError::Upstream(format!("Failed to send request to Nominatim: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Upstream(format!("Failed to read Nominatim response body: {e}"))
        })?;

        log::info!("Geocode API status for {location}: {status}");

        if !status.is_success() {
            log::error!("Geocode API error: {}", truncate_body(&body));
            return Err(WeatherError::Upstream(format!(
                "Failed to geocode location: status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let places: Vec<NominatimPlace> = serde_json::from_str(&body).map_err(|e| {
            WeatherError::Upstream(format!("Failed to parse Nominatim JSON: {e}"))
        })?;

        let place = places
            .first()
            .ok_or_else(|| WeatherError::Upstream("Location not found".to_string()))?;

        Ok(Coordinates {
            latitude: parse_coordinate(&place.lat, "lat")?,
            longitude: parse_coordinate(&place.lon, "lon")?,
        })
    }
}

impl Default for Geocoder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_coordinate(value: &str, field: &str) -> Result<f64> {
    value.parse().map_err(|_| {
        WeatherError::Upstream(format!("Nominatim returned a non-numeric {field}: {value}"))
    })
}
