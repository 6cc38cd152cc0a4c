// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cached per-country COVID statistics.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Entry in the `covid_cache` collection, keyed by `country_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CovidCacheEntry {
    /// Normalized lookup key (trimmed, upper-case)
    pub country_key: String,
    /// Country name as reported upstream
    pub country: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub cases: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub deaths: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub recovered: u64,
    /// When the entry was fetched (RFC3339)
    pub created_at: String,
}
