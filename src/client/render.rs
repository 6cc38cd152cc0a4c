// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plain-text rendering of the dashboard and the saved-records view.

use crate::client::aggregate::{Aggregate, NOT_AVAILABLE};
use crate::client::backend::SavedRecord;
use crate::client::controller::{RecordsView, ViewState};

fn render_rows(rows: &[(&str, &str)]) -> String {
    rows.iter()
        .map(|(label, value)| format!("  {:<18}{}\n", format!("{}:", label), value))
        .collect()
}

pub fn render_dashboard(aggregate: &Aggregate) -> String {
    let country = &aggregate.country_info;
    let covid = &aggregate.covid_stats;

    let flag = if country.flag.is_empty() {
        String::new()
    } else {
        format!("  Flag of {}: {}\n", country.name, country.flag)
    };

    let info = render_rows(&[
        ("Capital", country.capital.as_str()),
        ("Population", country.population.as_str()),
        ("Currency", country.currency.as_str()),
        ("Region", country.region.as_str()),
    ]);
    let stats = render_rows(&[
        ("Cases", covid.cases.as_str()),
        ("Today's cases", covid.today_cases.as_str()),
        ("Deaths", covid.deaths.as_str()),
        ("Today's deaths", covid.today_deaths.as_str()),
        ("Recovered", covid.recovered.as_str()),
        ("Active", covid.active.as_str()),
        ("Cases / million", covid.cases_per_one_million.as_str()),
    ]);

    format!("{}\n{}{}\n{}", country.name, flag, info, stats)
}

pub fn render_records(records: &RecordsView) -> String {
    match records {
        RecordsView::NotLoaded => "Loading saved records...\n".to_string(),
        RecordsView::Failed => "Failed to load records\n".to_string(),
        RecordsView::Loaded(records) if records.is_empty() => "No records found.\n".to_string(),
        RecordsView::Loaded(records) => records.iter().map(render_record).collect(),
    }
}

/// One record; tolerates payloads that are not aggregates.
fn render_record(record: &SavedRecord) -> String {
    let field = |section: &str, key: &str| {
        record
            .data
            .get(section)
            .and_then(|s| s.get(key))
            .and_then(|v| v.as_str())
            .filter(|v| !v.is_empty())
            .unwrap_or(NOT_AVAILABLE)
            .to_string()
    };

    let created = chrono::DateTime::parse_from_rfc3339(&record.created_at)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|_| record.created_at.clone());

    format!(
        "{} ({})\n  Cases: {}  Deaths: {}  Recovered: {}  Active: {}\n",
        field("countryInfo", "name"),
        created,
        field("covidStats", "cases"),
        field("covidStats", "deaths"),
        field("covidStats", "recovered"),
        field("covidStats", "active"),
    )
}

/// Banner, success, and warning lines, in that order.
pub fn render_messages(view: &ViewState) -> String {
    [
        ("error", &view.banner),
        ("ok", &view.success),
        ("warn", &view.warning),
    ]
    .into_iter()
    .filter_map(|(tag, message)| {
        message
            .as_ref()
            .map(|message| format!("[{}] {}\n", tag, message))
    })
    .collect()
}
