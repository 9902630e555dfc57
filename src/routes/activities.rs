// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only views of the latest activity snapshot.

use crate::error::Result;
use crate::services::snapshot::CsvRow;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/activities", get(get_activities))
        .route("/raw-activities", get(get_raw_activities))
}

/// Activities parsed from the CSV snapshot; every field is a string.
async fn get_activities(State(state): State<Arc<AppState>>) -> Result<Json<Vec<CsvRow>>> {
    let rows = state.snapshots.read_rows().await?;
    Ok(Json(rows))
}

/// The JSON snapshot as written by the last sync.
async fn get_raw_activities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>> {
    let raw = state.snapshots.read_raw().await?;
    Ok(Json(raw))
}
