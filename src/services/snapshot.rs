// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON and CSV snapshots of the latest fetched activities.
//!
//! Each write replaces both files wholesale. Readers open the files per
//! request, so a read racing a write may see a truncated file.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Activity;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const CSV_HEADER: [&str; 6] = [
    "id",
    "date",
    "type",
    "distance",
    "suffer_score",
    "average_heartrate",
];

/// A CSV row keyed by column header; every value is a string.
pub type CsvRow = BTreeMap<String, String>;

/// Location of the two snapshot files.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    json_path: PathBuf,
    csv_path: PathBuf,
}

impl SnapshotStore {
    pub fn new(json_path: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        Self {
            json_path: json_path.into(),
            csv_path: csv_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.activities_json_path(), config.activities_csv_path())
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Replace both snapshots with `activities`.
    pub async fn write(&self, activities: &[Activity]) -> Result<()> {
        let json = to_pretty_json(activities)?;
        write_file(&self.json_path, &json).await?;
        tracing::info!(
            path = %self.json_path.display(),
            count = activities.len(),
            "JSON snapshot written"
        );

        let csv = to_csv(activities)?;
        write_file(&self.csv_path, &csv).await?;
        tracing::info!(
            path = %self.csv_path.display(),
            count = activities.len(),
            "CSV snapshot written"
        );

        Ok(())
    }

    /// The JSON snapshot, parsed but otherwise untouched.
    pub async fn read_raw(&self) -> Result<serde_json::Value> {
        let bytes = read_file(&self.json_path, "Raw activities file not found.").await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Storage(format!("Invalid JSON in {}: {}", self.json_path.display(), e))
        })
    }

    /// The CSV snapshot as header-keyed string maps.
    pub async fn read_rows(&self) -> Result<Vec<CsvRow>> {
        let bytes = read_file(&self.csv_path, "Activities file not found.").await?;
        csv::Reader::from_reader(bytes.as_slice())
            .deserialize()
            .collect::<std::result::Result<Vec<CsvRow>, _>>()
            .map_err(|e| {
                AppError::Storage(format!("Invalid CSV in {}: {}", self.csv_path.display(), e))
            })
    }
}

/// Serialize with 4-space indentation.
fn to_pretty_json(activities: &[Activity]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    activities
        .serialize(&mut serializer)
        .map_err(|e| AppError::Storage(format!("Failed to serialize activities: {}", e)))?;
    Ok(buf)
}

/// Serialize with a header row; `None` becomes an empty cell.
fn to_csv(activities: &[Activity]) -> Result<Vec<u8>> {
    let csv_err = |e: csv::Error| AppError::Storage(format!("Failed to write CSV: {}", e));

    // Header is written by hand so an empty snapshot still has one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(csv_err)?;
    for activity in activities {
        writer.serialize(activity).map_err(csv_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Storage(format!("Failed to flush CSV: {}", e)))
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create {}: {}", parent.display(), e)))?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", path.display(), e)))
}

async fn read_file(path: &Path, not_found: &str) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::NotFound(not_found.to_string()),
        _ => AppError::Storage(format!("Failed to read {}: {}", path.display(), e)),
    })
}
