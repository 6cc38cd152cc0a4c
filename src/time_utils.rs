// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Last timestamp handed out by [`monotonic_now`], in microseconds.
static LAST_ISSUED_MICROS: AtomicI64 = AtomicI64::new(0);

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a UTC timestamp with fixed microsecond precision.
///
/// Fixed width keeps lexicographic order equal to chronological order, which
/// the stores rely on when sorting by `createdAt`.
pub fn format_utc_rfc3339_micros(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time, strictly increasing across calls within this process.
pub fn monotonic_now() -> DateTime<Utc> {
    let wall = Utc::now().timestamp_micros();
    let previous = LAST_ISSUED_MICROS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(wall.max(last + 1))
        })
        .unwrap_or(wall);
    let issued = wall.max(previous + 1);

    DateTime::from_timestamp_micros(issued).unwrap_or_else(Utc::now)
}
