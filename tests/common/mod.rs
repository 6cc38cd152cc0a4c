// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use covid_tracker::config::Config;
use covid_tracker::db::{Database, MemoryStore};
use covid_tracker::routes::create_router;
use covid_tracker::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection (Firestore emulator).
#[allow(dead_code)]
pub async fn test_db() -> Database {
    let config = Config {
        storage_backend: covid_tracker::config::StorageBackend::Firestore,
        ..Config::test_default()
    };
    Database::connect(&config)
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Handles returned by the test app constructors.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub store: MemoryStore,
}

/// Create a test app backed by a fresh in-memory store.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with(Config::test_default())
}

/// Create a test app with a customized config (upstream URLs, APP_ENV, ...).
#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> TestApp {
    let store = MemoryStore::new();
    let db = Database::from_memory(store.clone());
    let state = Arc::new(AppState::new(config, db).expect("Failed to build app state"));

    TestApp {
        router: create_router(state.clone()),
        state,
        store,
    }
}

/// Create a test app whose database is unreachable.
#[allow(dead_code)]
pub fn create_offline_app() -> axum::Router {
    let state = Arc::new(
        AppState::new(Config::test_default(), Database::new_mock())
            .expect("Failed to build app state"),
    );
    create_router(state)
}

/// Serve `router` on an ephemeral local port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_mock_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("Mock server has no address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    format!("http://{}", addr)
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
