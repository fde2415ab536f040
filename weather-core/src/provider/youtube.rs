use reqwest::Client;
use serde::Deserialize;

use crate::error::{Result, WeatherError};
use crate::provider::truncate_body;

const YOUTUBE_URL: &str = "https://www.googleapis.com";

/// Video-search collaborator: looks up travel videos for a location via the
/// YouTube Data API. Not wired into any HTTP endpoint. Returns an empty
/// list when no API key is configured.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct YtSnippet {
    title: String,
}

#[derive(Debug, Deserialize)]
struct YtItem {
    snippet: YtSnippet,
}

#[derive(Debug, Deserialize)]
struct YtSearchResponse {
    #[serde(default)]
    items: Vec<YtItem>,
}

impl YoutubeClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, YOUTUBE_URL.to_string())
    }

    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    /// Titles of travel videos about `location`.
    pub async fn search_travel_videos(&self, location: &str) -> Result<Vec<String>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };

        let url = format!("{}/youtube/v3/search", self.base_url);
        let query = format!("{location} travel");

        let res = self
            .http
            .get(&url)
            .query(&[("part", "snippet"), ("q", &query), ("key", api_key)])
            .send()
            .await
            .map_err(|e| {
                WeatherError::Upstream(format!("Failed to send request to YouTube: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Upstream(format!("Failed to read YouTube response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(WeatherError::Upstream(format!(
                "YouTube search failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: YtSearchResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Upstream(format!("Failed to parse YouTube JSON: {e}")))?;

        Ok(parsed.items.into_iter().map(|i| i.snippet.title).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_client_returns_no_videos() {
        let client = YoutubeClient::new(None);
        let videos = client.search_travel_videos("Paris").await.unwrap();
        assert!(videos.is_empty());
    }
}
