// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard client configuration.

use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_API_KEY: &str = "my-api-key-123";
pub const COVID_API_BASE: &str = "https://disease.sh/v3/covid-19/countries";
pub const COUNTRY_API_BASE: &str = "https://restcountries.com/v3.1";

/// Where the dashboard reads public data and saves records.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Record Service base URL
    pub api_url: String,
    /// Value sent as `x-api-key`
    pub api_key: String,
    /// Bearer token (from /dev/generate-token or the login callback)
    pub token: String,
    pub covid_api_base: String,
    pub country_api_base: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            token: String::new(),
            covid_api_base: COVID_API_BASE.to_string(),
            country_api_base: COUNTRY_API_BASE.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load from `DASHBOARD_*` variables, falling back to local defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Self {
            api_url: env::var("DASHBOARD_API_URL").unwrap_or(defaults.api_url),
            api_key: env::var("DASHBOARD_API_KEY").unwrap_or(defaults.api_key),
            token: env::var("DASHBOARD_TOKEN").unwrap_or(defaults.token),
            covid_api_base: env::var("COVID_API_BASE").unwrap_or(defaults.covid_api_base),
            country_api_base: env::var("COUNTRY_API_BASE").unwrap_or(defaults.country_api_base),
        }
    }
}
