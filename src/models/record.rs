// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Saved snapshot records.

use crate::models::user::UserSummary;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Recorded when a write reached the handler without an API key.
pub const UNKNOWN_API_KEY: &str = "unknown";

/// Stored record in the `records` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Document ID
    #[serde(rename = "_id")]
    pub id: String,
    /// Owning user ID (None for anonymous saves)
    pub user: Option<String>,
    /// API key that authenticated the write
    pub api_key_used: String,
    /// Arbitrary client payload
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub data: serde_json::Value,
    /// Creation time (RFC3339, microsecond precision)
    pub created_at: String,
}

/// Record as returned by the list endpoint, with the owner resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: Option<UserSummary>,
    pub api_key_used: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub data: serde_json::Value,
    pub created_at: String,
}

impl PopulatedRecord {
    pub fn new(record: Record, owner: Option<UserSummary>) -> Self {
        Self {
            id: record.id,
            user: owner,
            api_key_used: record.api_key_used,
            data: record.data,
            created_at: record.created_at,
        }
    }
}
