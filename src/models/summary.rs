// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Per-cycle mileage summary, logged after every successful sync.

use crate::models::Activity;

/// Progress toward the mileage goal for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSummary {
    /// Number of activities in the snapshot
    pub activities: usize,
    /// Distance of the most recent activity (miles), zero when there is none
    pub most_recent_miles: f64,
    /// Sum of all distances (miles)
    pub total_miles: f64,
    /// Goal minus total; negative once the goal is exceeded
    pub remaining_miles: f64,
}

impl CycleSummary {
    pub fn from_activities(activities: &[Activity], goal_miles: f64) -> Self {
        let total_miles: f64 = activities.iter().map(|a| a.distance).sum();

        // ISO 8601 dates from Strava share one format, so string order is time order.
        // On equal dates the earliest-fetched activity wins.
        let most_recent_miles = activities
            .iter()
            .reduce(|latest, a| if a.date > latest.date { a } else { latest })
            .map(|a| a.distance)
            .unwrap_or(0.0);

        Self {
            activities: activities.len(),
            most_recent_miles,
            total_miles,
            remaining_miles: goal_miles - total_miles,
        }
    }
}
