use thiserror::Error;

/// Errors surfaced by the weather service and its collaborators.
///
/// The first seven variants form the user-facing contract and map onto
/// HTTP 400/404 in `weather-server`; the remaining ones are internal
/// plumbing failures.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Start date must be before end date")]
    InvalidRange,

    #[error("Forecast range cannot exceed 7 days")]
    RangeTooLong,

    #[error("Invalid location")]
    InvalidLocation,

    /// Non-success response from an external provider. The message carries
    /// the provider's status and (truncated) body.
    #[error("{0}")]
    Upstream(String),

    #[error(
        "No forecast data available for the date range. \
         Open-Meteo supports historical data since 1940 and forecasts up to 7 days ahead"
    )]
    NoForecastData,

    #[error("Record not found")]
    NotFound,

    #[error("Unsupported format '{0}'. Supported formats: json, csv, pdf, xml, markdown")]
    UnsupportedFormat(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render export: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, WeatherError>;
