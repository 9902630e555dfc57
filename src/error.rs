// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type shared by the sync cycle and the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Strava rejected a token exchange, or no authorization code could be obtained.
    #[error("Authorization failed: {0}")]
    Auth(String),

    /// Unrecoverable status while paging through activities.
    #[error("Activity fetch failed with HTTP {status}: {body}")]
    Fetch { status: u16, body: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Errors that cannot be recovered by waiting for the next cycle.
    ///
    /// Only a failed reauthorization qualifies: without a refresh token there
    /// is nothing left to retry with.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Auth(_))
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Auth(_) => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            AppError::Fetch { .. } | AppError::StravaApi(_) => {
                (StatusCode::BAD_GATEWAY, "strava_error".to_string())
            }
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Result type alias for services and handlers
pub type Result<T> = std::result::Result<T, AppError>;
