// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Hike-Tracker: keep a local snapshot of Strava hikes and serve it over HTTP.
//!
//! A background loop pulls the athlete's activities from Strava on a fixed
//! interval, keeps one activity type, and writes JSON and CSV snapshots. A
//! small read-only API serves whatever snapshot is on disk.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use services::SnapshotStore;

/// Shared state for the query service.
///
/// Only file locations live here; live tokens stay with the sync loop.
pub struct AppState {
    pub snapshots: SnapshotStore,
}
