// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard client: the frontend side of the tracker.
//!
//! Pulls COVID statistics and country metadata from the public APIs, merges
//! them into an [`Aggregate`], and saves snapshots through the Record Service.

pub mod aggregate;
pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod public_api;
pub mod render;

pub use aggregate::{aggregate, Aggregate};
pub use backend::{BackendClient, SavedRecord};
pub use config::DashboardConfig;
pub use controller::{DashboardController, RecordsView, SelectionOutcome, ViewState};
pub use error::ClientError;
pub use public_api::{CountryOption, PublicApiClient};
