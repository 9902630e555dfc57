// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity record kept in the snapshots and served by the API.

use serde::{Deserialize, Serialize};

use crate::services::strava::StravaActivitySummary;

/// Meters in one statute mile.
pub const METERS_PER_MILE: f64 = 1609.34;

/// One fetched activity, projected to the fields we keep.
///
/// Field order matches the CSV snapshot header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Strava activity ID
    pub id: u64,
    /// Start date/time (ISO 8601)
    pub date: String,
    /// Activity type (Hike, Run, Ride, etc.)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Distance in miles
    pub distance: f64,
    /// Strava relative effort, when the athlete has it enabled; kept as
    /// Strava sent it (integer or float)
    pub suffer_score: Option<serde_json::Number>,
    pub average_heartrate: Option<f64>,
}

impl Activity {
    /// Project a Strava summary, converting meters to miles.
    pub fn from_summary(summary: &StravaActivitySummary) -> Self {
        Self {
            id: summary.id,
            date: summary.start_date.clone(),
            activity_type: summary.activity_type.clone(),
            distance: summary.distance / METERS_PER_MILE,
            suffer_score: summary.suffer_score.clone(),
            average_heartrate: summary.average_heartrate,
        }
    }
}
