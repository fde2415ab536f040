//! HTTP endpoints for the weather record CRUD + export operations.
//!
//! Mounted under `/weather`, plus the top-level `/info` endpoint; every
//! other path falls through to the embedded frontend.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use weather_core::{
    ExportFormat, ExportOutput, RecordPatch, RecordStore, WeatherError, WeatherQuery,
    WeatherRecord, WeatherService,
};

use crate::assets;

pub struct AppState {
    service: WeatherService,
    database: PathBuf,
}

impl AppState {
    /// Request-scoped store: each handler opens its own connection and
    /// drops it when the response is produced.
    fn store(&self) -> Result<RecordStore, ApiError> {
        Ok(RecordStore::open(&self.database)?)
    }
}

/// Maps `WeatherError` onto an HTTP status plus a `{"detail": ...}` body.
struct ApiError(WeatherError);

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            WeatherError::NotFound => StatusCode::NOT_FOUND,
            WeatherError::InvalidRange
            | WeatherError::RangeTooLong
            | WeatherError::InvalidLocation
            | WeatherError::Upstream(_)
            | WeatherError::NoForecastData
            | WeatherError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            WeatherError::Database(_) | WeatherError::Io(_) | WeatherError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("Request failed: {}", self.0);
        }
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

async fn create_record(
    State(state): State<Arc<AppState>>,
    Json(query): Json<WeatherQuery>,
) -> ApiResult<Json<WeatherRecord>> {
    let store = state.store()?;
    Ok(Json(state.service.create(&store, query).await?))
}

async fn list_records(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<WeatherRecord>>> {
    let store = state.store()?;
    Ok(Json(state.service.list(&store)?))
}

async fn read_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<WeatherRecord>> {
    let store = state.store()?;
    Ok(Json(state.service.get(&store, id)?))
}

async fn update_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(patch): Json<RecordPatch>,
) -> ApiResult<Json<WeatherRecord>> {
    let store = state.store()?;
    Ok(Json(state.service.update(&store, id, patch).await?))
}

async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let store = state.store()?;
    state.service.delete(&store, id)?;
    Ok(Json(json!({ "detail": "Record deleted" })))
}

async fn export_records(
    State(state): State<Arc<AppState>>,
    Path(format): Path<String>,
) -> ApiResult<Response> {
    let format = ExportFormat::try_from(format.as_str())?;
    let store = state.store()?;

    let response = match state.service.export(&store, format)? {
        ExportOutput::Text(text) => {
            ([(header::CONTENT_TYPE, format.content_type())], text).into_response()
        }
        ExportOutput::Binary(bytes) => (
            [
                (header::CONTENT_TYPE, format.content_type()),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=weather_records.pdf",
                ),
            ],
            bytes,
        )
            .into_response(),
    };
    Ok(response)
}

async fn info() -> Json<serde_json::Value> {
    Json(json!({
        "description": "Weather records backend: stores location/date-range \
                        weather queries and exports them as json, csv, pdf, \
                        xml or markdown."
    }))
}

/// Build the application router. Static frontend assets are served for any
/// path the API doesn't claim.
pub fn router(service: WeatherService, database: PathBuf) -> Router {
    let state = Arc::new(AppState { service, database });

    let weather = Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/export/{format}", get(export_records))
        .route(
            "/{id}",
            get(read_record).put(update_record).delete(delete_record),
        );

    Router::new()
        .nest("/weather", weather)
        .route("/info", get(info))
        .fallback(assets::static_handler)
        .with_state(state)
}
