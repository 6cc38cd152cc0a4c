// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard controller against fake public APIs and a real backend router.

use axum::{
    extract::Path,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use covid_tracker::client::{
    BackendClient, DashboardController, PublicApiClient, RecordsView, SelectionOutcome,
};
use covid_tracker::client::controller::{COUNTRY_LIST_FALLBACK_MESSAGE, SAVE_SUCCESS_MESSAGE};
use serde_json::{json, Value};
use std::time::Duration;

mod common;

const API_KEY: &str = "test_api_key";

/// Fake disease.sh + REST Countries on one server.
///
/// `SLOW` answers after a delay; `XX` is unknown; `NC` has no currency.
async fn spawn_public_apis() -> String {
    async fn covid(Path(code): Path<String>) -> Result<Json<Value>, StatusCode> {
        match code.as_str() {
            "XX" => Err(StatusCode::NOT_FOUND),
            "SLOW" => {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Ok(Json(json!({ "cases": 1, "deaths": 0, "updated": 1 })))
            }
            _ => Ok(Json(json!({
                "cases": 33803572,
                "todayCases": 0,
                "deaths": 74694,
                "todayDeaths": 0,
                "recovered": 0,
                "active": 33728878,
                "casesPerOneMillion": 269493.5,
                "updated": 1700000000000i64
            }))),
        }
    }

    async fn all() -> Json<Value> {
        Json(json!([
            { "name": { "common": "japan" }, "cca2": "JP" },
            { "name": { "common": "Zimbabwe" }, "cca2": "ZW" },
            { "name": { "common": "Brazil" }, "cca2": "BR" },
            { "name": { "common": "Réunion" }, "cca2": "RE" },
            { "name": { "common": "Antarctica" } },
            { "name": { "common": "Albania" }, "cca2": "AL" },
            { "name": { "common": "Russia" }, "cca2": "RU" },
            { "name": { "common": "Åland Islands" }, "cca2": "AX" },
            { "name": { "common": "Canada" }, "cca2": "CA" }
        ]))
    }

    async fn alpha(Path(code): Path<String>) -> Result<Json<Value>, StatusCode> {
        match code.as_str() {
            "XX" => Err(StatusCode::NOT_FOUND),
            "NC" => Ok(Json(json!([{
                "name": { "common": "Nowhere" },
                "cca2": "NC",
                "population": 0
            }]))),
            _ => Ok(Json(json!([{
                "name": { "common": "Japan" },
                "cca2": "JP",
                "capital": ["Tokyo"],
                "population": 125836021,
                "currencies": { "JPY": { "name": "Japanese yen", "symbol": "¥" } },
                "region": "Asia",
                "flags": { "png": "https://flagcdn.com/w320/jp.png" }
            }]))),
        }
    }

    let router = Router::new()
        .route("/covid/{code}", get(covid))
        .route("/countries/all", get(all))
        .route("/countries/alpha/{code}", get(alpha));
    common::spawn_mock_server(router).await
}

struct Harness {
    controller: DashboardController,
    backend: common::TestApp,
}

/// Controller wired to the fake public APIs and a live in-memory backend.
async fn harness_with_key(api_key: &str) -> Harness {
    let public = spawn_public_apis().await;
    let backend = common::create_test_app();
    let backend_url = common::spawn_mock_server(backend.router.clone()).await;
    let token = backend
        .state
        .auth
        .issue_token("viewer", "viewer@example.com")
        .unwrap();

    let controller = DashboardController::with_clients(
        PublicApiClient::new(&format!("{}/covid", public), &format!("{}/countries", public))
            .unwrap(),
        BackendClient::new(&backend_url, api_key, &token).unwrap(),
    );

    Harness {
        controller,
        backend,
    }
}

async fn harness() -> Harness {
    harness_with_key(API_KEY).await
}

#[tokio::test]
async fn test_init_loads_sorted_country_list() {
    let h = harness().await;

    let countries = h.controller.init().await;
    let names: Vec<&str> = countries.iter().map(|c| c.name.as_str()).collect();

    // Entries without a code are dropped; sorting ignores case and accents.
    assert_eq!(
        names,
        vec![
            "Åland Islands",
            "Albania",
            "Brazil",
            "Canada",
            "japan",
            "Réunion",
            "Russia",
            "Zimbabwe"
        ]
    );
    let view = h.controller.view().await;
    assert!(view.banner.is_none());
    assert!(view.last_updated.is_some());
}

#[tokio::test]
async fn test_init_falls_back_when_api_unreachable() {
    let controller = DashboardController::with_clients(
        PublicApiClient::new("http://127.0.0.1:1/covid", "http://127.0.0.1:1/countries").unwrap(),
        BackendClient::new("http://127.0.0.1:1", API_KEY, "t").unwrap(),
    );

    let countries = controller.init().await;

    assert_eq!(countries.len(), 10);
    assert_eq!(countries[0].code, "US");
    let view = controller.view().await;
    assert_eq!(view.banner.as_deref(), Some(COUNTRY_LIST_FALLBACK_MESSAGE));
}

#[tokio::test]
async fn test_select_renders_and_auto_saves() {
    let h = harness().await;

    let outcome = h.controller.select_country("JP").await;
    assert_eq!(outcome, SelectionOutcome::Rendered { saved: true });

    let view = h.controller.view().await;
    let dashboard = view.dashboard.expect("dashboard shown");
    assert_eq!(dashboard.country_info.name, "Japan");
    assert_eq!(dashboard.country_info.capital, "Tokyo");
    assert_eq!(dashboard.country_info.population, "125,836,021");
    assert_eq!(dashboard.country_info.currency, "Japanese yen (JPY)");
    assert_eq!(dashboard.covid_stats.cases, "33,803,572");
    assert_eq!(dashboard.covid_stats.recovered, "0");
    assert_eq!(dashboard.covid_stats.cases_per_one_million, "269,493.5");
    assert_eq!(view.selected.as_deref(), Some("JP"));
    assert_eq!(view.success.as_deref(), Some(SAVE_SUCCESS_MESSAGE));
    assert!(view.warning.is_none());

    let saved = h.backend.store.list_records_for_user("viewer");
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].data["countryInfo"]["name"], "Japan");
    assert_eq!(saved[0].api_key_used, API_KEY);
}

#[tokio::test]
async fn test_missing_currency_and_zero_population_show_na() {
    let h = harness().await;

    h.controller.select_country("NC").await;

    let dashboard = h.controller.view().await.dashboard.unwrap();
    assert_eq!(dashboard.country_info.currency, "N/A");
    assert_eq!(dashboard.country_info.population, "N/A");
    assert_eq!(dashboard.country_info.capital, "N/A");
    assert_eq!(dashboard.country_info.flag, "");
}

#[tokio::test]
async fn test_save_failure_keeps_dashboard_and_warns() {
    let h = harness_with_key("wrong-key").await;

    let outcome = h.controller.select_country("JP").await;
    assert_eq!(outcome, SelectionOutcome::Rendered { saved: false });

    let view = h.controller.view().await;
    assert!(view.dashboard.is_some());
    assert!(view.success.is_none());
    assert_eq!(
        view.warning.as_deref(),
        Some("Backend save failed: Invalid API key")
    );
    assert!(h.backend.store.list_records_for_user("viewer").is_empty());
}

#[tokio::test]
async fn test_failed_fetch_shows_banner_without_dashboard() {
    let h = harness().await;

    let outcome = h.controller.select_country("XX").await;
    assert!(matches!(outcome, SelectionOutcome::Failed(_)));

    let view = h.controller.view().await;
    assert!(view.dashboard.is_none());
    assert!(view
        .banner
        .as_deref()
        .is_some_and(|b| b.starts_with("Failed to fetch data: ")));
    assert!(h.backend.store.list_records_for_user("viewer").is_empty());

    h.controller.dismiss_banner().await;
    assert!(h.controller.view().await.banner.is_none());
}

#[tokio::test]
async fn test_empty_selection_hides_dashboard() {
    let h = harness().await;

    h.controller.select_country("JP").await;
    let outcome = h.controller.select_country("").await;

    assert_eq!(outcome, SelectionOutcome::Cleared);
    let view = h.controller.view().await;
    assert!(view.dashboard.is_none());
    assert!(view.selected.is_none());
}

#[tokio::test]
async fn test_latest_selection_wins() {
    let h = harness().await;

    let (slow, fast) = tokio::join!(h.controller.select_country("SLOW"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.controller.select_country("JP").await
    });

    assert_eq!(slow, SelectionOutcome::Stale);
    assert_eq!(fast, SelectionOutcome::Rendered { saved: true });

    let view = h.controller.view().await;
    assert_eq!(view.selected.as_deref(), Some("JP"));
    assert_eq!(view.dashboard.unwrap().country_info.name, "Japan");
    // Only the winning selection was saved.
    assert_eq!(h.backend.store.list_records_for_user("viewer").len(), 1);
}

#[tokio::test]
async fn test_save_current_without_dashboard() {
    let h = harness().await;

    let result = h.controller.save_current().await;

    assert!(matches!(
        result,
        Err(covid_tracker::client::ClientError::NothingToSave)
    ));
    assert_eq!(
        h.controller.view().await.banner.as_deref(),
        Some("No data to save!")
    );
}

#[tokio::test]
async fn test_save_current_stores_another_copy() {
    let h = harness().await;

    h.controller.select_country("JP").await;
    let record = h.controller.save_current().await.unwrap();

    assert_eq!(record.data["countryInfo"]["name"], "Japan");
    assert_eq!(h.backend.store.list_records_for_user("viewer").len(), 2);
}

#[tokio::test]
async fn test_view_and_clear_records() {
    let h = harness().await;
    h.controller.select_country("JP").await;

    let RecordsView::Loaded(records) = h.controller.view_records().await else {
        panic!("records should load");
    };
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user["displayName"], Value::Null);

    // Declined: nothing is deleted.
    assert!(!h.controller.clear_records(|| false).await.unwrap());
    assert_eq!(h.backend.store.list_records_for_user("viewer").len(), 1);

    assert!(h.controller.clear_records(|| true).await.unwrap());
    assert!(h.backend.store.list_records_for_user("viewer").is_empty());
    assert_eq!(h.controller.view().await.records, RecordsView::Loaded(vec![]));
}

#[tokio::test]
async fn test_records_view_failure() {
    let h = harness_with_key("wrong-key").await;

    assert_eq!(h.controller.view_records().await, RecordsView::Failed);

    let result = h.controller.clear_records(|| true).await;
    assert!(result.is_err());
    assert_eq!(
        h.controller.view().await.banner.as_deref(),
        Some("Failed to clear records: Invalid API key")
    );
}
