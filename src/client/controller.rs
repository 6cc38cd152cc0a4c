// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard orchestration: country picker, selection, save, records view.
//!
//! Every selection bumps a generation counter. A response is applied only if
//! its generation is still the latest when it arrives, so a slow answer for
//! an earlier pick can never overwrite a newer one.

use crate::client::aggregate::{aggregate, Aggregate};
use crate::client::backend::{BackendClient, SavedRecord};
use crate::client::config::DashboardConfig;
use crate::client::error::ClientError;
use crate::client::public_api::{CountryOption, PublicApiClient};
use futures_util::future::try_join;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

pub const COUNTRY_LIST_FALLBACK_MESSAGE: &str =
    "Failed to load countries from API. Using fallback list.";
pub const SAVE_SUCCESS_MESSAGE: &str = "Record saved successfully!";

/// Shown when the country list API is unreachable.
pub const FALLBACK_COUNTRIES: [(&str, &str); 10] = [
    ("United States", "US"),
    ("United Kingdom", "GB"),
    ("Canada", "CA"),
    ("Australia", "AU"),
    ("Germany", "DE"),
    ("France", "FR"),
    ("Japan", "JP"),
    ("India", "IN"),
    ("Brazil", "BR"),
    ("Sri Lanka", "LK"),
];

pub fn fallback_countries() -> Vec<CountryOption> {
    FALLBACK_COUNTRIES
        .iter()
        .map(|(name, code)| CountryOption::new(name, code))
        .collect()
}

/// State of the saved-records view.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RecordsView {
    #[default]
    NotLoaded,
    Loaded(Vec<SavedRecord>),
    Failed,
}

/// Everything the UI needs to draw itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub countries: Vec<CountryOption>,
    pub last_updated: Option<String>,
    /// Dismissible error banner
    pub banner: Option<String>,
    pub success: Option<String>,
    /// Non-fatal problems (auto-save failures)
    pub warning: Option<String>,
    pub selected: Option<String>,
    /// Currently displayed aggregate; None hides the dashboard
    pub dashboard: Option<Aggregate>,
    pub records: RecordsView,
}

/// What happened to one country selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// Empty selection; dashboard hidden
    Cleared,
    /// Aggregate displayed; `saved` reports the auto-save result
    Rendered { saved: bool },
    /// Fetch failed; message is in the banner
    Failed(String),
    /// A newer selection started while this one was in flight
    Stale,
}

pub struct DashboardController {
    api: PublicApiClient,
    backend: BackendClient,
    generation: AtomicU64,
    view: RwLock<ViewState>,
}

impl DashboardController {
    pub fn new(config: &DashboardConfig) -> Result<Self, ClientError> {
        Ok(Self::with_clients(
            PublicApiClient::new(&config.covid_api_base, &config.country_api_base)?,
            BackendClient::new(&config.api_url, &config.api_key, &config.token)?,
        ))
    }

    pub fn with_clients(api: PublicApiClient, backend: BackendClient) -> Self {
        Self {
            api,
            backend,
            generation: AtomicU64::new(0),
            view: RwLock::new(ViewState::default()),
        }
    }

    /// Snapshot of the current view.
    pub async fn view(&self) -> ViewState {
        self.view.read().await.clone()
    }

    /// Load the country picker, falling back to a fixed list on any failure.
    pub async fn init(&self) -> Vec<CountryOption> {
        match self.api.fetch_countries().await {
            Ok(countries) => {
                let mut view = self.view.write().await;
                view.countries = countries.clone();
                view.last_updated = Some(crate::time_utils::format_utc_rfc3339(
                    chrono::Utc::now(),
                ));
                view.banner = None;
                tracing::info!(count = countries.len(), "Loaded country list");
                countries
            }
            Err(e) => {
                tracing::warn!(error = %e, "Country list unavailable, using fallback");
                let countries = fallback_countries();
                let mut view = self.view.write().await;
                view.countries = countries.clone();
                view.banner = Some(COUNTRY_LIST_FALLBACK_MESSAGE.to_string());
                countries
            }
        }
    }

    /// Fetch, merge, display, and auto-save one country.
    pub async fn select_country(&self, code: &str) -> SelectionOutcome {
        let code = code.trim();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut view = self.view.write().await;
            view.dashboard = None;
            if code.is_empty() {
                view.selected = None;
                return SelectionOutcome::Cleared;
            }
            view.banner = None;
            view.success = None;
            view.warning = None;
        }

        // Both calls must succeed; no partial rendering.
        let result = try_join(self.api.fetch_covid(code), self.api.fetch_country(code)).await;

        let aggregate = {
            let mut view = self.view.write().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(code, generation, "Discarding stale selection response");
                return SelectionOutcome::Stale;
            }

            match result {
                Ok((covid, country)) => {
                    let now_ms = chrono::Utc::now().timestamp_millis();
                    let aggregate = aggregate(&covid, &country, now_ms);
                    view.selected = Some(code.to_string());
                    view.dashboard = Some(aggregate.clone());
                    aggregate
                }
                Err(e) => {
                    let message = format!("Failed to fetch data: {}", e);
                    tracing::warn!(code, error = %e, "Country fetch failed");
                    view.banner = Some(message.clone());
                    return SelectionOutcome::Failed(message);
                }
            }
        };

        // Display and persistence fail independently.
        let saved = match self.backend.save_record(&aggregate).await {
            Ok(record) => {
                tracing::debug!(record_id = %record.id, "Auto-saved aggregate");
                self.view.write().await.success = Some(SAVE_SUCCESS_MESSAGE.to_string());
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Backend save failed");
                self.view.write().await.warning = Some(format!("Backend save failed: {}", e));
                false
            }
        };

        SelectionOutcome::Rendered { saved }
    }

    /// Save the displayed aggregate again.
    pub async fn save_current(&self) -> Result<SavedRecord, ClientError> {
        let current = self.view.read().await.dashboard.clone();
        let Some(aggregate) = current else {
            self.view.write().await.banner = Some(ClientError::NothingToSave.to_string());
            return Err(ClientError::NothingToSave);
        };

        match self.backend.save_record(&aggregate).await {
            Ok(record) => {
                self.view.write().await.success = Some(SAVE_SUCCESS_MESSAGE.to_string());
                Ok(record)
            }
            Err(e) => {
                self.view.write().await.banner =
                    Some("Failed to save record to backend".to_string());
                Err(e)
            }
        }
    }

    /// Reload the full list of saved records.
    pub async fn view_records(&self) -> RecordsView {
        let records = match self.backend.list_records().await {
            Ok(records) => RecordsView::Loaded(records),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load records");
                RecordsView::Failed
            }
        };

        self.view.write().await.records = records.clone();
        records
    }

    /// Clear all of the user's records once `confirm` agrees.
    ///
    /// Returns `Ok(false)` when the user declined.
    pub async fn clear_records<F>(&self, confirm: F) -> Result<bool, ClientError>
    where
        F: FnOnce() -> bool,
    {
        if !confirm() {
            return Ok(false);
        }

        match self.backend.clear_records().await {
            Ok(response) => {
                tracing::info!(deleted = response.deleted, "Records cleared");
                self.view_records().await;
                Ok(true)
            }
            Err(e) => {
                self.view.write().await.banner = Some(format!("Failed to clear records: {}", e));
                Err(e)
            }
        }
    }

    pub async fn dismiss_banner(&self) {
        self.view.write().await.banner = None;
    }
}
