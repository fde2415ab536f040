use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Top-level configuration stored on disk.
///
/// Provider credentials live here (or in the environment) and are handed
/// to the client constructors explicitly, so tests can substitute stubs.
///
/// Example TOML:
/// ```toml
/// openweather_api_key = "..."
/// bind = "127.0.0.1:8000"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// API key for the OpenWeatherMap current-conditions service.
    pub openweather_api_key: Option<String>,

    /// Optional API key for the YouTube video-search collaborator.
    pub youtube_api_key: Option<String>,

    /// Path to the SQLite database file; defaults to the platform data dir.
    pub database: Option<PathBuf>,

    /// Socket address the server listens on; defaults to 127.0.0.1:8000.
    pub bind: Option<String>,
}

impl Config {
    /// Load config from the default location, or return defaults if no file
    /// exists yet. `OPENWEATHER_API_KEY` and `YOUTUBE_API_KEY` environment
    /// variables override file values.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from an explicit path, with the same environment
    /// overrides as [`Config::load`].
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            // First run: no config file, rely on env vars and defaults.
            Self::default()
        };

        cfg.apply_overrides(
            std::env::var("OPENWEATHER_API_KEY").ok(),
            std::env::var("YOUTUBE_API_KEY").ok(),
        );

        Ok(cfg)
    }

    fn apply_overrides(&mut self, openweather: Option<String>, youtube: Option<String>) {
        if let Some(key) = openweather.filter(|k| !k.is_empty()) {
            self.openweather_api_key = Some(key);
        }
        if let Some(key) = youtube.filter(|k| !k.is_empty()) {
            self.youtube_api_key = Some(key);
        }
    }

    /// The OpenWeatherMap key, required for live use.
    pub fn openweather_api_key(&self) -> Result<&str> {
        self.openweather_api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: set the OPENWEATHER_API_KEY environment variable, \
                 or add `openweather_api_key` to the config file."
            )
        })
    }

    /// Path to the SQLite database, defaulting to the platform data dir.
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database {
            return Ok(path.clone());
        }
        let dirs = project_dirs()?;
        Ok(dirs.data_dir().join("records.db"))
    }

    pub fn bind_addr(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-backend", "weather-server")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
