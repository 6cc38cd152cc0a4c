// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! COVID statistics proxy with a per-country document cache.
//!
//! Handles:
//! - Fetching country statistics from the public disease.sh API
//! - Caching one snapshot per country in the `covid_cache` collection
//! - Deciding when a cached snapshot is stale ([`ExpiryPolicy`])

use crate::db::Database;
use crate::error::AppError;
use crate::models::CovidCacheEntry;
use crate::time_utils::format_utc_rfc3339;
use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::time::Duration as StdDuration;

const UPSTREAM_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// When a cached snapshot must be refetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Cached values are served forever. This reproduces the historical
    /// behavior and means numbers never update once fetched.
    Never,
    /// Entries older than the given age are refetched on the next request.
    MaxAge(Duration),
}

impl ExpiryPolicy {
    pub fn is_fresh(&self, entry: &CovidCacheEntry, now: DateTime<Utc>) -> bool {
        match self {
            ExpiryPolicy::Never => true,
            ExpiryPolicy::MaxAge(max_age) => DateTime::parse_from_rfc3339(&entry.created_at)
                .map(|created| now - created.with_timezone(&Utc) <= *max_age)
                // Unparseable timestamps count as stale so they get rewritten.
                .unwrap_or(false),
        }
    }
}

/// Statistics returned by `GET {base}/{country}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamCovidStats {
    pub country: String,
    pub cases: u64,
    #[serde(default)]
    pub deaths: u64,
    #[serde(default)]
    pub recovered: u64,
}

/// HTTP client for the public COVID statistics API.
#[derive(Clone)]
pub struct CovidClient {
    http: reqwest::Client,
    base_url: String,
}

impl CovidClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .context("failed building COVID API HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch current statistics for a country code or name.
    pub async fn fetch(&self, country: &str) -> Result<UpstreamCovidStats, AppError> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(country));

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("COVID API request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid COVID API response: {}", e)))
    }
}

/// The `covid_cache` collection seen through an expiry policy.
#[derive(Clone)]
pub struct CovidCache {
    db: Database,
    policy: ExpiryPolicy,
}

impl CovidCache {
    pub fn new(db: Database, policy: ExpiryPolicy) -> Self {
        Self { db, policy }
    }

    pub fn policy(&self) -> ExpiryPolicy {
        self.policy
    }

    /// Cached entry for `key` if present and still fresh.
    pub async fn get(&self, key: &str) -> Result<Option<CovidCacheEntry>, AppError> {
        let entry = self.db.get_covid_entry(key).await?;
        Ok(entry.filter(|e| self.policy.is_fresh(e, Utc::now())))
    }

    pub async fn put(&self, entry: &CovidCacheEntry) -> Result<(), AppError> {
        self.db.set_covid_entry(entry).await
    }
}

/// Get-or-fetch over the cache and the upstream API.
#[derive(Clone)]
pub struct CovidService {
    client: CovidClient,
    cache: CovidCache,
}

impl CovidService {
    pub fn new(base_url: &str, db: Database, policy: ExpiryPolicy) -> anyhow::Result<Self> {
        if policy == ExpiryPolicy::Never {
            tracing::warn!(
                "COVID cache has no expiry; cached statistics are never refreshed \
                 (set COVID_CACHE_MAX_AGE_SECS to enable refresh)"
            );
        }

        Ok(Self {
            client: CovidClient::new(base_url)?,
            cache: CovidCache::new(db, policy),
        })
    }

    /// Return the cached snapshot for `country`, fetching and storing it on a miss.
    pub async fn get_or_fetch(&self, country: &str) -> Result<CovidCacheEntry, AppError> {
        let key = normalize_country_key(country);

        if let Some(entry) = self.cache.get(&key).await? {
            tracing::debug!(country = %key, "COVID cache hit");
            return Ok(entry);
        }

        tracing::info!(country = %key, "COVID cache miss, fetching upstream");
        let stats = self.client.fetch(country.trim()).await?;

        let entry = CovidCacheEntry {
            country_key: key,
            country: stats.country,
            cases: stats.cases,
            deaths: stats.deaths,
            recovered: stats.recovered,
            created_at: format_utc_rfc3339(Utc::now()),
        };
        self.cache.put(&entry).await?;

        Ok(entry)
    }
}

/// Cache key for a requested country: trimmed, upper-case.
pub fn normalize_country_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}
