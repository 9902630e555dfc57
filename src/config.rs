// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local runs.

use chrono::NaiveDate;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_PORT: u16 = 5000;
pub(crate) const DEFAULT_API_URL: &str = "https://www.strava.com/api/v3";
const DEFAULT_AUTHORIZE_URL: &str = "https://www.strava.com/oauth/authorize";
const DEFAULT_ACTIVITY_TYPE: &str = "Hike";
const DEFAULT_SINCE_DATE: &str = "2025-01-01";
const DEFAULT_GOAL_MILES: f64 = 1500.0;
const DEFAULT_RUN_INTERVAL_MINUTES: u64 = 15;

const REFRESH_TOKEN_FILE: &str = "refresh_token.txt";
const ACTIVITIES_JSON_FILE: &str = "hiking_activities.json";
const ACTIVITIES_CSV_FILE: &str = "hiking_activities.csv";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- OAuth application ---
    /// Strava OAuth client ID
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Redirect URI registered with the Strava application
    pub redirect_uri: String,

    // --- Endpoints ---
    /// Strava REST API base (the token endpoint lives under it)
    pub strava_api_url: String,
    /// Strava interactive authorization page
    pub strava_authorize_url: String,
    /// Query service port
    pub port: u16,

    // --- Sync ---
    /// Directory holding the refresh token and both snapshots
    pub data_dir: PathBuf,
    /// Strava activity type kept by the fetcher
    pub activity_type: String,
    /// Activities before local midnight of this date are ignored
    pub since_date: NaiveDate,
    /// Yearly mileage goal reported after each cycle
    pub goal_miles: f64,
    /// Pause between sync cycles
    pub run_interval: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            redirect_uri: "http://localhost/exchange_token".to_string(),
            strava_api_url: DEFAULT_API_URL.to_string(),
            strava_authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("."),
            activity_type: DEFAULT_ACTIVITY_TYPE.to_string(),
            since_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            goal_miles: DEFAULT_GOAL_MILES,
            run_interval: Duration::from_secs(DEFAULT_RUN_INTERVAL_MINUTES * 60),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let since_raw = env::var("SINCE_DATE").unwrap_or_else(|_| DEFAULT_SINCE_DATE.to_string());
        let since_date = NaiveDate::parse_from_str(since_raw.trim(), "%Y-%m-%d")
            .map_err(|e| ConfigError::Invalid("SINCE_DATE", e.to_string()))?;

        let run_interval_minutes = env::var("RUN_INTERVAL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RUN_INTERVAL_MINUTES);

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            redirect_uri: env::var("STRAVA_REDIRECT_URI")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_REDIRECT_URI"))?,
            strava_api_url: env::var("STRAVA_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            strava_authorize_url: env::var("STRAVA_AUTHORIZE_URL")
                .unwrap_or_else(|_| DEFAULT_AUTHORIZE_URL.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            activity_type: env::var("ACTIVITY_TYPE")
                .unwrap_or_else(|_| DEFAULT_ACTIVITY_TYPE.to_string()),
            since_date,
            goal_miles: env::var("GOAL_MILES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_GOAL_MILES),
            run_interval: Duration::from_secs(run_interval_minutes * 60),
        })
    }

    /// Config rooted at `data_dir`, otherwise the test defaults.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn refresh_token_path(&self) -> PathBuf {
        self.data_dir.join(REFRESH_TOKEN_FILE)
    }

    pub fn activities_json_path(&self) -> PathBuf {
        self.data_dir.join(ACTIVITIES_JSON_FILE)
    }

    pub fn activities_csv_path(&self) -> PathBuf {
        self.data_dir.join(ACTIVITIES_CSV_FILE)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
