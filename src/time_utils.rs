// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time conversion.

use chrono::{Local, NaiveDate, TimeZone};
use std::time::Duration;

/// Unix timestamp of local midnight at the start of `date`.
///
/// When midnight does not exist locally (DST gap) the earliest valid instant
/// of the day is used instead.
pub fn local_midnight_timestamp(date: NaiveDate) -> i64 {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    match Local.from_local_datetime(&midnight) {
        chrono::LocalResult::Single(dt) => dt.timestamp(),
        chrono::LocalResult::Ambiguous(earliest, _) => earliest.timestamp(),
        chrono::LocalResult::None => midnight.and_utc().timestamp(),
    }
}

/// Time left until `reset_at`, clamped at zero.
pub fn until(reset_at: i64, now: i64) -> Duration {
    Duration::from_secs(reset_at.saturating_sub(now).max(0) as u64)
}
