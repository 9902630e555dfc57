// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for OAuth token exchange and activity listing.
//!
//! Handles:
//! - Authorization URL construction
//! - Code and refresh-token exchange
//! - Paginated activity listing, surfacing rate limits (429) and
//!   expired tokens (401) as values instead of errors

use crate::config::DEFAULT_API_URL;
use crate::error::AppError;
use serde::Deserialize;

/// Scopes requested during interactive authorization.
const AUTHORIZE_SCOPES: &str = "read,activity:read,activity:read_all";

/// Header carrying the unix time at which the rate limit window resets.
pub const RATE_LIMIT_RESET_HEADER: &str = "X-RateLimit-Reset";

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_API_URL.to_string(),
            client_id,
            client_secret,
        }
    }

    /// Point the client at a different API root (the token endpoint moves with it).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the interactive authorization URL.
    ///
    /// `approval_prompt=force` makes Strava show the consent screen even if the
    /// athlete already approved the app, so a fresh refresh token is issued.
    pub fn authorize_url(&self, authorize_base: &str, redirect_uri: &str) -> String {
        format!(
            "{}?client_id={}&response_type=code&redirect_uri={}&approval_prompt=force&scope={}",
            authorize_base,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(AUTHORIZE_SCOPES),
        )
    }

    /// List one page of the athlete's activities.
    pub async fn list_activities(
        &self,
        access_token: &str,
        after: i64, // Unix timestamp
        page: u32,
        per_page: u32,
    ) -> Result<ActivityPage, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("after", after.to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        let status = response.status();

        if status.as_u16() == 429 {
            let reset_at = response
                .headers()
                .get(RATE_LIMIT_RESET_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<i64>().ok());
            tracing::warn!(page, ?reset_at, "Strava rate limit hit (429)");
            return Ok(ActivityPage::RateLimited { reset_at });
        }

        if status.as_u16() == 401 {
            return Ok(ActivityPage::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Fetch {
                status: status.as_u16(),
                body,
            });
        }

        let activities = response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))?;

        Ok(ActivityPage::Activities(activities))
    }

    /// Exchange an authorization code for an access/refresh token pair.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AppError> {
        self.token_request(&[("code", code), ("grant_type", "authorization_code")])
            .await
    }

    /// Exchange a refresh token for a new access/refresh token pair.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, AppError> {
        self.token_request(&[
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .await
    }

    /// POST to the token endpoint with the client credentials plus `params`.
    async fn token_request(&self, params: &[(&str, &str)]) -> Result<TokenResponse, AppError> {
        let mut form = vec![
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        form.extend_from_slice(params);

        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token exchange failed");
            return Err(AppError::Auth(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("Failed to parse token response: {}", e)))
    }
}

/// Outcome of a single activity-list request.
#[derive(Debug)]
pub enum ActivityPage {
    Activities(Vec<StravaActivitySummary>),
    /// 429; `reset_at` is `None` when the reset header is missing or garbled.
    RateLimited { reset_at: Option<i64> },
    /// 401; the access token is expired or revoked.
    Unauthorized,
}

/// Token response from Strava's OAuth endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Summary activity for list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivitySummary {
    pub id: u64,
    pub start_date: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Meters
    pub distance: f64,
    #[serde(default)]
    pub suffer_score: Option<serde_json::Number>,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
}
