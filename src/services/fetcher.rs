// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Paginated activity fetch with inline rate-limit and token-expiry handling.

use crate::error::{AppError, Result};
use crate::models::Activity;
use crate::services::auth::{AccessToken, AuthClient};
use crate::services::clock::Clock;
use crate::services::strava::{ActivityPage, StravaClient};
use crate::time_utils;
use std::sync::Arc;
use std::time::Duration;

/// Limits for one fetch run.
///
/// Wait and refresh budgets apply per page and reset once a page succeeds.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    pub per_page: u32,
    /// Hard ceiling on pages, in case the API never returns an empty page.
    pub max_pages: u32,
    /// Wait used when a 429 carries no usable reset time.
    pub rate_limit_fallback: Duration,
    pub max_rate_limit_waits: u32,
    pub max_token_refreshes: u32,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            per_page: 200,
            max_pages: 50,
            rate_limit_fallback: Duration::from_secs(15 * 60),
            max_rate_limit_waits: 5,
            max_token_refreshes: 3,
        }
    }
}

/// Pages through the athlete's activities, keeping one activity type.
#[derive(Clone)]
pub struct ActivityFetcher {
    client: StravaClient,
    auth: AuthClient,
    clock: Arc<dyn Clock>,
    policy: FetchPolicy,
    activity_type: String,
}

impl ActivityFetcher {
    pub fn new(
        client: StravaClient,
        auth: AuthClient,
        clock: Arc<dyn Clock>,
        activity_type: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth,
            clock,
            policy: FetchPolicy::default(),
            activity_type: activity_type.into(),
        }
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch every matching activity started after `since` (unix timestamp).
    ///
    /// `token` is replaced in place whenever Strava reports it expired, so the
    /// caller keeps the refreshed token for later calls. Any error aborts the
    /// whole fetch and the pages gathered so far are dropped.
    pub async fn fetch(&self, token: &mut AccessToken, since: i64) -> Result<Vec<Activity>> {
        let mut activities = Vec::new();
        let mut page = 1;
        let mut rate_limit_waits = 0;
        let mut token_refreshes = 0;

        while page <= self.policy.max_pages {
            let response = self
                .client
                .list_activities(token.as_str(), since, page, self.policy.per_page)
                .await?;

            match response {
                ActivityPage::RateLimited { reset_at } => {
                    rate_limit_waits += 1;
                    if rate_limit_waits > self.policy.max_rate_limit_waits {
                        return Err(AppError::Fetch {
                            status: 429,
                            body: format!("still rate limited after {} waits", rate_limit_waits - 1),
                        });
                    }

                    let wait = match reset_at {
                        Some(reset_at) => time_utils::until(reset_at, self.clock.now_unix()),
                        None => self.policy.rate_limit_fallback,
                    };
                    tracing::warn!(
                        page,
                        wait_secs = wait.as_secs(),
                        "Rate limit reached, waiting before retrying page"
                    );
                    self.clock.sleep(wait).await;
                }
                ActivityPage::Unauthorized => {
                    token_refreshes += 1;
                    if token_refreshes > self.policy.max_token_refreshes {
                        return Err(AppError::Fetch {
                            status: 401,
                            body: format!(
                                "still unauthorized after {} token refreshes",
                                token_refreshes - 1
                            ),
                        });
                    }

                    tracing::info!(page, "Access token is invalid or expired, refreshing");
                    *token = self.auth.refresh().await?;
                }
                ActivityPage::Activities(summaries) => {
                    if summaries.is_empty() {
                        break;
                    }

                    let before = activities.len();
                    activities.extend(
                        summaries
                            .iter()
                            .filter(|s| s.activity_type == self.activity_type)
                            .map(Activity::from_summary),
                    );

                    tracing::debug!(
                        page,
                        fetched = summaries.len(),
                        kept = activities.len() - before,
                        activity_type = %self.activity_type,
                        "Fetched activity page"
                    );

                    page += 1;
                    rate_limit_waits = 0;
                    token_refreshes = 0;
                }
            }
        }

        if page > self.policy.max_pages {
            tracing::warn!(
                max_pages = self.policy.max_pages,
                "Stopped at page ceiling before reaching an empty page"
            );
        }

        tracing::info!(
            count = activities.len(),
            activity_type = %self.activity_type,
            "Finished fetching activities"
        );
        Ok(activities)
    }
}
