// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use hike_tracker::config::Config;
use hike_tracker::routes::create_router;
use hike_tracker::error::Result;
use hike_tracker::services::{
    ActivityFetcher, AuthClient, AuthorizationCodeProvider, Clock, FetchPolicy, Scheduler,
    SnapshotStore, StravaClient,
};
use hike_tracker::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::MockServer;

/// Fixed "now" used by every test clock.
#[allow(dead_code)]
pub const NOW: i64 = 1_736_000_000;

/// Clock frozen at [`NOW`] that records sleeps instead of sleeping.
#[derive(Default)]
pub struct ManualClock {
    sleeps: Mutex<Vec<Duration>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        NOW
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Hands out a fixed code and remembers how it was asked.
pub struct StaticCodeProvider {
    code: String,
    calls: AtomicUsize,
    last_url: Mutex<Option<String>>,
}

#[allow(dead_code)]
impl StaticCodeProvider {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            calls: AtomicUsize::new(0),
            last_url: Mutex::new(None),
        }
    }

    /// Number of times a code was requested.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The authorization URL from the most recent request.
    pub fn last_url(&self) -> Option<String> {
        self.last_url.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthorizationCodeProvider for StaticCodeProvider {
    async fn authorization_code(&self, authorize_url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock().unwrap() = Some(authorize_url.to_string());
        Ok(self.code.clone())
    }
}

/// Mock Strava plus a scratch data directory.
#[allow(dead_code)]
pub struct TestEnv {
    pub server: MockServer,
    pub dir: TempDir,
    pub config: Config,
    pub client: StravaClient,
    pub codes: Arc<StaticCodeProvider>,
    pub clock: Arc<ManualClock>,
    pub auth: AuthClient,
}

#[allow(dead_code)]
impl TestEnv {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            strava_api_url: server.uri(),
            ..Config::with_data_dir(dir.path())
        };
        let client = StravaClient::new(
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
        )
        .with_base_url(server.uri());
        let codes = Arc::new(StaticCodeProvider::new("canned_code"));
        let clock = Arc::new(ManualClock::default());
        let auth = AuthClient::from_config(&config, client.clone(), codes.clone());

        Self {
            server,
            dir,
            config,
            client,
            codes,
            clock,
            auth,
        }
    }

    /// Seed the refresh token file.
    pub async fn store_refresh_token(&self, token: &str) {
        self.auth
            .token_store()
            .save(token)
            .await
            .expect("save refresh token");
    }

    pub async fn stored_refresh_token(&self) -> Option<String> {
        self.auth.token_store().load().await.expect("load refresh token")
    }

    pub fn fetcher(&self) -> ActivityFetcher {
        ActivityFetcher::new(
            self.client.clone(),
            self.auth.clone(),
            self.clock.clone(),
            self.config.activity_type.clone(),
        )
    }

    pub fn fetcher_with_policy(&self, policy: FetchPolicy) -> ActivityFetcher {
        self.fetcher().with_policy(policy)
    }

    pub fn snapshots(&self) -> SnapshotStore {
        SnapshotStore::from_config(&self.config)
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(
            &self.config,
            self.auth.clone(),
            self.fetcher(),
            self.snapshots(),
            self.clock.clone(),
        )
    }

    pub fn router(&self) -> axum::Router {
        let state = Arc::new(AppState {
            snapshots: self.snapshots(),
        });
        create_router(state)
    }

    /// `page` query values of every activity-list request, in order.
    pub async fn requested_pages(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == "/athlete/activities")
            .filter_map(|r| {
                r.url
                    .query_pairs()
                    .find(|(k, _)| k == "page")
                    .map(|(_, v)| v.into_owned())
            })
            .collect()
    }
}

/// A Strava list-endpoint activity.
#[allow(dead_code)]
pub fn strava_activity(id: u64, activity_type: &str, meters: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Activity {}", id),
        "start_date": format!("2025-02-{:02}T16:00:00Z", id % 28 + 1),
        "type": activity_type,
        "sport_type": activity_type,
        "distance": meters,
        "suffer_score": 20,
        "average_heartrate": 131.2,
    })
}

/// Token endpoint response body.
#[allow(dead_code)]
pub fn token_body(access: &str, refresh: &str) -> serde_json::Value {
    serde_json::json!({
        "token_type": "Bearer",
        "access_token": access,
        "refresh_token": refresh,
        "expires_at": NOW + 21_600,
        "expires_in": 21_600,
    })
}
