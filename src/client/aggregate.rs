// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Merge country metadata and COVID statistics into one display snapshot.

use crate::client::public_api::{CountryMetadata, CovidCountryStats};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const NOT_AVAILABLE: &str = "N/A";

/// The snapshot shown on the dashboard and saved as a record's `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub country_info: CountryInfo,
    pub covid_stats: CovidStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CountryInfo {
    pub name: String,
    pub capital: String,
    pub population: String,
    pub currency: String,
    pub region: String,
    /// Flag image URL, empty when unknown
    pub flag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CovidStats {
    pub cases: String,
    pub today_cases: String,
    pub deaths: String,
    pub today_deaths: String,
    pub recovered: String,
    pub active: String,
    pub cases_per_one_million: String,
    /// Upstream update time (epoch milliseconds)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub updated: i64,
}

/// Build the aggregate. `now_ms` stands in for a missing `updated` field.
pub fn aggregate(covid: &CovidCountryStats, country: &CountryMetadata, now_ms: i64) -> Aggregate {
    let currency = country
        .currencies
        .as_ref()
        .and_then(|currencies| currencies.iter().next())
        .map(|(code, currency)| {
            format!(
                "{} ({})",
                currency.name.as_deref().unwrap_or(NOT_AVAILABLE),
                code
            )
        })
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let country_info = CountryInfo {
        name: text_or_na(country.name.as_ref().and_then(|n| n.common.as_deref())),
        capital: text_or_na(
            country
                .capital
                .as_ref()
                .and_then(|c| c.first())
                .map(String::as_str),
        ),
        // Zero population reads as unknown.
        population: country
            .population
            .filter(|p| *p != 0.0)
            .map(format_number)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        currency,
        region: text_or_na(country.region.as_deref()),
        flag: country
            .flags
            .as_ref()
            .and_then(|f| f.png.clone())
            .unwrap_or_default(),
    };

    let covid_stats = CovidStats {
        cases: number_or_na(covid.cases),
        today_cases: number_or_na(covid.today_cases),
        deaths: number_or_na(covid.deaths),
        today_deaths: number_or_na(covid.today_deaths),
        recovered: number_or_na(covid.recovered),
        active: number_or_na(covid.active),
        cases_per_one_million: number_or_na(covid.cases_per_one_million),
        updated: covid.updated.unwrap_or(now_ms),
    };

    Aggregate {
        country_info,
        covid_stats,
    }
}

fn text_or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn number_or_na(value: Option<f64>) -> String {
    value
        .map(format_number)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Format with thousands separators and at most three fraction digits,
/// e.g. `1234567.25` becomes `1,234,567.25`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let abs = value.abs();
    let mut whole = abs.trunc() as u64;
    let mut millis = ((abs - abs.trunc()) * 1000.0).round() as u64;
    if millis >= 1000 {
        whole += 1;
        millis = 0;
    }

    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if millis > 0 {
        out.push('.');
        out.push_str(format!("{:03}", millis).trim_end_matches('0'));
    }

    if value < 0.0 && (whole > 0 || millis > 0) {
        out.insert(0, '-');
    }
    out
}
