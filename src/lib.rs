// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! COVID Tracker: country COVID-19 snapshots with saved records.
//!
//! This crate provides the backend API (records, COVID cache proxy, Google
//! login) and the `client` library used by the `dashboard` frontend binary.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use middleware::auth::AuthGate;
use services::{CovidService, GoogleOAuthClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub auth: AuthGate,
    pub covid_service: CovidService,
    pub google_oauth: GoogleOAuthClient,
}

impl AppState {
    /// Wire all services from a loaded configuration and an opened database.
    pub fn new(config: Config, db: Database) -> anyhow::Result<Self> {
        let auth = AuthGate::new(config.auth_config());
        let covid_service = CovidService::new(
            &config.covid_api_base,
            db.clone(),
            config.covid_cache_policy(),
        )?;
        let google_oauth = GoogleOAuthClient::new(config.google_oauth_config())?;

        Ok(Self {
            config,
            db,
            auth,
            covid_service,
            google_oauth,
        })
    }
}
