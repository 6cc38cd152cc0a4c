// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Clients for the two public APIs: disease.sh and REST Countries.

use crate::client::error::ClientError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const COUNTRY_LIST_FIELDS: &str = "name,cca2,flags,capital,population,currencies,region";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryName {
    #[serde(default)]
    pub common: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Flags {
    #[serde(default)]
    pub png: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Currency {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Country document from REST Countries v3.1. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryMetadata {
    #[serde(default)]
    pub name: Option<CountryName>,
    #[serde(default)]
    pub cca2: Option<String>,
    #[serde(default)]
    pub capital: Option<Vec<String>>,
    #[serde(default)]
    pub population: Option<f64>,
    /// Keyed by ISO 4217 code
    #[serde(default)]
    pub currencies: Option<BTreeMap<String, Currency>>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub flags: Option<Flags>,
}

/// Country statistics from disease.sh. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CovidCountryStats {
    #[serde(default)]
    pub cases: Option<f64>,
    #[serde(default)]
    pub today_cases: Option<f64>,
    #[serde(default)]
    pub deaths: Option<f64>,
    #[serde(default)]
    pub today_deaths: Option<f64>,
    #[serde(default)]
    pub recovered: Option<f64>,
    #[serde(default)]
    pub active: Option<f64>,
    #[serde(default)]
    pub cases_per_one_million: Option<f64>,
    /// Last upstream update (epoch milliseconds)
    #[serde(default)]
    pub updated: Option<i64>,
}

/// Entry in the country picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryOption {
    pub name: String,
    pub code: String,
}

impl CountryOption {
    pub fn new(name: &str, code: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
        }
    }
}

/// HTTP client for both public APIs.
#[derive(Clone)]
pub struct PublicApiClient {
    http: reqwest::Client,
    covid_base: String,
    country_base: String,
}

/// Case- and accent-insensitive sort key, so "Åland Islands" files under A.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

impl PublicApiClient {
    pub fn new(covid_base: &str, country_base: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

        Ok(Self {
            http,
            covid_base: covid_base.trim_end_matches('/').to_string(),
            country_base: country_base.trim_end_matches('/').to_string(),
        })
    }

    /// All countries, sorted by common name.
    pub async fn fetch_countries(&self) -> Result<Vec<CountryOption>, ClientError> {
        let url = format!("{}/all", self.country_base);
        let response = self
            .http
            .get(&url)
            .query(&[("fields", COUNTRY_LIST_FIELDS)])
            .send()
            .await?;
        let countries: Vec<CountryMetadata> = Self::check_response_json(response).await?;

        let mut options: Vec<CountryOption> = countries
            .into_iter()
            .filter_map(|c| {
                let name = c.name.and_then(|n| n.common)?;
                let code = c.cca2?;
                Some(CountryOption { name, code })
            })
            .collect();
        options.sort_by_cached_key(|c| (collation_key(&c.name), c.name.clone()));

        Ok(options)
    }

    pub async fn fetch_covid(&self, code: &str) -> Result<CovidCountryStats, ClientError> {
        let url = format!("{}/{}", self.covid_base, urlencoding::encode(code));
        self.get_json(&url).await
    }

    /// Metadata for one country (`/alpha/{code}` returns a one-element array).
    pub async fn fetch_country(&self, code: &str) -> Result<CountryMetadata, ClientError> {
        let url = format!("{}/alpha/{}", self.country_base, urlencoding::encode(code));
        let countries: Vec<CountryMetadata> = self.get_json(&url).await?;
        countries
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Empty(code.to_string()))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ClientError> {
        let response = self.http.get(url).send().await?;
        Self::check_response_json(response).await
    }

    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}
