// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Periodic sync: refresh token, fetch activities, write snapshots.
//!
//! Cycles run back to back with a fixed sleep in between and never overlap.

use crate::config::Config;
use crate::error::Result;
use crate::models::CycleSummary;
use crate::services::auth::AuthClient;
use crate::services::clock::Clock;
use crate::services::fetcher::ActivityFetcher;
use crate::services::snapshot::SnapshotStore;
use crate::time_utils;
use std::sync::Arc;
use std::time::Duration;

/// Drives the sync cycle forever.
pub struct Scheduler {
    auth: AuthClient,
    fetcher: ActivityFetcher,
    snapshots: SnapshotStore,
    clock: Arc<dyn Clock>,
    /// Unix timestamp; only activities after it are fetched
    since: i64,
    goal_miles: f64,
    interval: Duration,
}

impl Scheduler {
    pub fn new(
        config: &Config,
        auth: AuthClient,
        fetcher: ActivityFetcher,
        snapshots: SnapshotStore,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            auth,
            fetcher,
            snapshots,
            clock,
            since: time_utils::local_midnight_timestamp(config.since_date),
            goal_miles: config.goal_miles,
            interval: config.run_interval,
        }
    }

    /// Run one refresh → fetch → write cycle.
    ///
    /// Nothing is written unless the fetch completes.
    pub async fn run_cycle(&self) -> Result<CycleSummary> {
        tracing::info!("Refreshing access token");
        let mut token = self.auth.refresh().await?;

        tracing::info!(since = self.since, "Fetching activities");
        let activities = self.fetcher.fetch(&mut token, self.since).await?;

        self.snapshots.write(&activities).await?;

        let summary = CycleSummary::from_activities(&activities, self.goal_miles);
        tracing::info!(
            activities = summary.activities,
            last_hike_miles = summary.most_recent_miles,
            total_miles = summary.total_miles,
            remaining_miles = summary.remaining_miles,
            "The last hike was {:.2} miles! The total distance covered this year is {:.2} and there are {:.2} miles remaining!",
            summary.most_recent_miles,
            summary.total_miles,
            summary.remaining_miles,
        );
        Ok(summary)
    }

    /// Run cycles until a fatal error.
    ///
    /// Non-fatal errors skip the current cycle; the next one starts after the
    /// usual interval.
    pub async fn run(&self) -> Result<()> {
        loop {
            match self.run_cycle().await {
                Ok(_) => {}
                Err(e) if e.is_fatal() => {
                    tracing::error!(error = %e, "Sync cycle failed fatally, stopping");
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Sync cycle failed, skipping until next run");
                }
            }

            tracing::info!(
                minutes = self.interval.as_secs() / 60,
                "Sleeping before the next run"
            );
            self.clock.sleep(self.interval).await;
        }
    }
}
